//! CLI commands
//!
//! Implementations behind the `run`, `list`, `doctor` and `config`
//! subcommands.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::browser::{AgentBrowser, BrowserDriver};
use crate::core::{Config, Result, ScenarioReport, VerifyError};
use crate::scenarios;

/// How long the preflight request may take
const PREFLIGHT_TIMEOUT: Duration = Duration::from_secs(5);

/// Check that the dev server answers HTTP at `url`
pub async fn preflight(url: &str) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(PREFLIGHT_TIMEOUT)
        .build()?;

    // Any HTTP response means the server is up; the scenarios judge content
    match client.get(url).send().await {
        Ok(resp) => {
            tracing::debug!("preflight {} -> {}", url, resp.status());
            Ok(())
        }
        Err(e) => Err(VerifyError::TargetUnreachable {
            url: url.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Options for the `run` subcommand
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Scenario names; empty runs all
    pub scenarios: Vec<String>,
    pub skip_preflight: bool,
    /// Open captured screenshots in the system viewer
    pub open: bool,
}

/// Run the selected scenarios against the configured target
pub async fn run(config: &Config, options: &RunOptions) -> Result<Vec<ScenarioReport>> {
    let selected = scenarios::select(&options.scenarios)?;

    if !AgentBrowser::is_available(&config.browser.program).await {
        return Err(VerifyError::DriverNotFound(config.browser.program.clone()));
    }

    if !options.skip_preflight {
        preflight(&config.target.base_url).await?;
    }

    let reports = scenarios::run_all(&selected, config, |config, name| {
        Arc::new(AgentBrowser::from_config(config, name)) as Arc<dyn BrowserDriver>
    })
    .await;

    if options.open {
        open_screenshots(&reports);
    }

    Ok(reports)
}

fn open_screenshots(reports: &[ScenarioReport]) {
    for path in reports.iter().flat_map(|r| r.screenshots.iter()) {
        let target = path.to_string_lossy();
        if let Err(e) = webbrowser::open(&target) {
            tracing::warn!("could not open {}: {}", target, e);
        }
    }
}

/// Scenario names with descriptions
pub fn list_text() -> String {
    let mut output = String::from("Scenarios:\n");
    for scenario in scenarios::registry() {
        output.push_str(&format!(
            "  {:<12} {}\n",
            scenario.name(),
            scenario.description()
        ));
    }
    output
}

/// Environment check for `doctor`
#[derive(Debug, Clone)]
pub struct DoctorReport {
    pub program: String,
    pub driver_available: bool,
    pub target: String,
    /// `None` when reachable, otherwise the reason
    pub target_error: Option<String>,
}

impl DoctorReport {
    pub fn healthy(&self) -> bool {
        self.driver_available && self.target_error.is_none()
    }

    pub fn render(&self) -> String {
        let driver = if self.driver_available {
            "installed".to_string()
        } else {
            "missing (npm install -g agent-browser && agent-browser install)".to_string()
        };
        let target = match &self.target_error {
            None => "reachable".to_string(),
            Some(reason) => format!("unreachable ({})", reason),
        };
        format!(
            "simverify doctor:\n\
             ─────────────────────────────\n\
             Browser CLI:  {} {}\n\
             Target:       {} {}",
            self.program, driver, self.target, target
        )
    }
}

/// Check the automation CLI and the target
pub async fn doctor(config: &Config) -> DoctorReport {
    DoctorReport {
        program: config.browser.program.clone(),
        driver_available: AgentBrowser::is_available(&config.browser.program).await,
        target: config.target.base_url.clone(),
        target_error: preflight(&config.target.base_url)
            .await
            .err()
            .map(|e| e.to_string()),
    }
}

/// Print or write the effective configuration
pub fn config_command(config: &Config, init: Option<&Path>) -> Result<String> {
    let content = config.to_toml()?;
    match init {
        Some(path) => {
            config.save_to(path)?;
            Ok(format!("Config written to {}", path.display()))
        }
        None => Ok(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_mentions_every_scenario() {
        let text = list_text();
        assert!(text.contains("collection"));
        assert!(text.contains("idmc"));
    }

    #[test]
    fn test_doctor_render() {
        let report = DoctorReport {
            program: "agent-browser".to_string(),
            driver_available: false,
            target: "http://localhost:5173".to_string(),
            target_error: None,
        };
        assert!(!report.healthy());
        let text = report.render();
        assert!(text.contains("missing"));
        assert!(text.contains("reachable"));
    }

    #[test]
    fn test_config_command_init_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let msg = config_command(&Config::default(), Some(&path)).unwrap();
        assert!(msg.contains("Config written"));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_preflight_unreachable() {
        // Port 9 (discard) is closed on test machines
        let err = preflight("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, VerifyError::TargetUnreachable { .. }));
    }

    #[tokio::test]
    async fn test_run_rejects_unknown_scenario_first() {
        let options = RunOptions {
            scenarios: vec!["nope".to_string()],
            ..Default::default()
        };
        let err = run(&Config::default(), &options).await.unwrap_err();
        assert!(matches!(err, VerifyError::UnknownScenario(_)));
    }
}
