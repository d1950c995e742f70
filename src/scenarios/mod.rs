//! Verification scenarios and the runner that executes them
//!
//! A scenario only describes the happy path and returns errors with `?`.
//! The runner is the one place failures are handled: it logs the
//! diagnostic, takes a failure screenshot and always closes the browser.

pub mod collection;
pub mod idmc;

use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::browser::{BrowserDriver, Page};
use crate::core::{Config, Outcome, Result, ScenarioReport, VerifyError};

pub use collection::CollectionSettings;
pub use idmc::IdmcFeatures;

/// A fixed UI flow against the application under test
#[async_trait]
pub trait Scenario: Send + Sync {
    /// Short name used on the command line
    fn name(&self) -> &'static str;

    /// One-line description for `list`
    fn description(&self) -> &'static str;

    /// Run the flow and return the screenshots it captured
    async fn run(&self, page: &Page, base_url: &str) -> Result<Vec<PathBuf>>;

    /// File name for the screenshot taken when the flow fails
    fn failure_screenshot(&self) -> String {
        format!("{}_failed.png", self.name())
    }
}

/// All scenarios, in run order
pub fn registry() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(CollectionSettings) as Box<dyn Scenario>,
        Box::new(IdmcFeatures),
    ]
}

/// Look up a scenario by name
pub fn find(name: &str) -> Result<Box<dyn Scenario>> {
    registry()
        .into_iter()
        .find(|s| s.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| VerifyError::UnknownScenario(name.to_string()))
}

/// Resolve names to scenarios; no names means all of them
pub fn select(names: &[String]) -> Result<Vec<Box<dyn Scenario>>> {
    if names.is_empty() {
        return Ok(registry());
    }
    names.iter().map(|n| find(n)).collect()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run one scenario on its own page and always release the browser
pub async fn run_scenario(
    scenario: &dyn Scenario,
    driver: Arc<dyn BrowserDriver>,
    config: &Config,
) -> ScenarioReport {
    let started = Instant::now();
    let page = Page::new(
        driver,
        config.timing.clone(),
        config.browser.viewport,
        config.output.screenshot_dir.clone(),
    );

    tracing::info!("▶ {}: {}", scenario.name(), scenario.description());

    let result = AssertUnwindSafe(scenario.run(&page, &config.target.base_url))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| {
            Err(VerifyError::Other(format!(
                "scenario panicked: {}",
                panic_message(payload.as_ref())
            )))
        });

    let mut screenshots = Vec::new();
    let outcome = match result {
        Ok(shots) => {
            screenshots.extend(shots);
            tracing::info!("✔ {} passed", scenario.name());
            Outcome::Passed
        }
        Err(err) => {
            tracing::error!("✘ {} failed: {}", scenario.name(), err);
            match page.screenshot(&scenario.failure_screenshot()).await {
                Ok(path) => screenshots.push(path),
                Err(e) => tracing::warn!("failure screenshot not captured: {}", e),
            }
            Outcome::Failed {
                reason: err.to_string(),
                missing: err.missing_element().map(str::to_string),
            }
        }
    };

    if let Err(e) = page.close().await {
        tracing::warn!("closing browser for {} failed: {}", scenario.name(), e);
    }

    ScenarioReport {
        scenario: scenario.name().to_string(),
        outcome,
        screenshots,
        console: page.console(),
        elapsed_ms: started.elapsed().as_millis() as u64,
    }
}

/// Run scenarios one after another, each on a fresh driver from `connect`
pub async fn run_all<F>(
    scenarios: &[Box<dyn Scenario>],
    config: &Config,
    connect: F,
) -> Vec<ScenarioReport>
where
    F: Fn(&Config, &str) -> Arc<dyn BrowserDriver>,
{
    let mut reports = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let driver = connect(config, scenario.name());
        reports.push(run_scenario(scenario.as_ref(), driver, config).await);
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order() {
        let names: Vec<_> = registry().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["collection", "idmc"]);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("IDMC").unwrap().name(), "idmc");
        assert!(matches!(
            find("billing"),
            Err(VerifyError::UnknownScenario(_))
        ));
    }

    #[test]
    fn test_select_defaults_to_all() {
        assert_eq!(select(&[]).unwrap().len(), 2);
        let picked = select(&["collection".to_string()]).unwrap();
        assert_eq!(picked.len(), 1);
        assert!(select(&["collection".to_string(), "nope".to_string()]).is_err());
    }

    #[test]
    fn test_failure_screenshot_name() {
        assert_eq!(IdmcFeatures.failure_screenshot(), "idmc_failed.png");
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }
}
