//! Browser executor - wraps the agent-browser CLI
//!
//! Every driver operation is one CLI invocation against a named session.
//! The CLI keeps the browser alive between invocations.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::process::Command;

use crate::browser::{BrowserDriver, Selector};
use crate::core::{Config, ConsoleEntry, ConsoleKind, Result, VerifyError, Viewport};

/// Driver for browser automation via the agent-browser CLI
pub struct AgentBrowser {
    /// Executable to invoke
    program: String,
    /// Session name for isolation
    session_name: String,
    /// Whether to run in headed mode
    headed: bool,
    /// Upper bound for a single command
    command_timeout: Duration,
    /// Set once `close` has been issued
    closed: AtomicBool,
}

impl AgentBrowser {
    /// Create a new executor for a session
    pub fn new(program: impl Into<String>, session_name: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            session_name: session_name.into(),
            headed: false,
            command_timeout: Duration::from_secs(30),
            closed: AtomicBool::new(false),
        }
    }

    /// Create an executor for one scenario from configuration
    pub fn from_config(config: &Config, scenario: &str) -> Self {
        let mut executor = Self::new(&config.browser.program, config.session_name(scenario));
        executor.set_headed(config.browser.headed);
        executor.set_command_timeout(config.command_timeout());
        executor
    }

    /// Set headed mode
    pub fn set_headed(&mut self, headed: bool) {
        self.headed = headed;
    }

    pub fn set_command_timeout(&mut self, timeout: Duration) {
        self.command_timeout = timeout;
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Check if the CLI is installed
    pub async fn is_available(program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn base_args(&self) -> Vec<String> {
        let mut args = vec!["--session".to_string(), self.session_name.clone()];
        if self.headed {
            args.push("--headed".to_string());
        }
        args
    }

    /// Run an agent-browser command
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.base_args());
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        tracing::debug!(session = %self.session_name, ?args, "agent-browser");

        let output = match tokio::time::timeout(self.command_timeout, cmd.output()).await {
            Ok(result) => result.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VerifyError::DriverNotFound(self.program.clone())
                } else {
                    VerifyError::browser(format!("Failed to run {}: {}", self.program, e))
                }
            })?,
            Err(_) => {
                return Err(VerifyError::CommandTimeout {
                    command: args.join(" "),
                    timeout: self.command_timeout,
                })
            }
        };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(VerifyError::browser(format!(
                "{} {} failed: {}",
                self.program,
                args.first().copied().unwrap_or_default(),
                stderr.trim()
            )))
        }
    }
}

/// Last non-empty line of CLI output
fn last_line(output: &str) -> &str {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .unwrap_or("")
}

/// Parse the output of `get count`
pub(crate) fn parse_count(output: &str) -> Result<usize> {
    let line = last_line(output);
    line.parse::<usize>()
        .map_err(|_| VerifyError::browser(format!("unexpected count output: '{}'", line)))
}

/// Parse the output of `is visible`
pub(crate) fn parse_bool(output: &str) -> Result<bool> {
    match last_line(output).to_ascii_lowercase().as_str() {
        "true" | "yes" => Ok(true),
        "false" | "no" => Ok(false),
        other => Err(VerifyError::browser(format!(
            "unexpected boolean output: '{}'",
            other
        ))),
    }
}

/// Parse the output of `console` / `errors` into entries
pub(crate) fn parse_console(output: &str, kind: ConsoleKind) -> Vec<ConsoleEntry> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| {
            let lower = l.to_ascii_lowercase();
            !(lower.starts_with("no console") || lower.starts_with("no errors")
                || lower.starts_with("no page errors"))
        })
        .map(|l| ConsoleEntry {
            kind,
            text: l.to_string(),
        })
        .collect()
}

#[async_trait]
impl BrowserDriver for AgentBrowser {
    async fn open(&self, url: &str) -> Result<()> {
        self.run_command(&["open", url]).await?;
        Ok(())
    }

    async fn set_viewport(&self, viewport: Viewport) -> Result<()> {
        let width = viewport.width.to_string();
        let height = viewport.height.to_string();
        self.run_command(&["set", "viewport", width.as_str(), height.as_str()])
            .await?;
        Ok(())
    }

    async fn count(&self, selector: &Selector) -> Result<usize> {
        let output = self.run_command(&["get", "count", selector.as_str()]).await?;
        parse_count(&output)
    }

    async fn is_visible(&self, selector: &Selector) -> Result<bool> {
        let output = self
            .run_command(&["is", "visible", selector.first().as_str()])
            .await?;
        parse_bool(&output)
    }

    async fn click(&self, selector: &Selector) -> Result<()> {
        self.run_command(&["click", selector.first().as_str()])
            .await?;
        Ok(())
    }

    async fn scroll_into_view(&self, selector: &Selector) -> Result<()> {
        self.run_command(&["scrollintoview", selector.first().as_str()])
            .await?;
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run_command(&["screenshot", &*path]).await?;
        Ok(())
    }

    async fn drain_console(&self) -> Result<Vec<ConsoleEntry>> {
        let console = self.run_command(&["console", "--clear"]).await?;
        let errors = self.run_command(&["errors", "--clear"]).await?;

        let mut entries = parse_console(&console, ConsoleKind::Console);
        entries.extend(parse_console(&errors, ConsoleKind::PageError));
        Ok(entries)
    }

    async fn close(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Ok(());
        }
        // left unset on failure so Drop still retries
        self.run_command(&["close"]).await?;
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "agent-browser"
    }
}

impl Drop for AgentBrowser {
    fn drop(&mut self) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        tracing::warn!(session = %self.session_name, "browser dropped while open; closing");
        let _ = std::process::Command::new(&self.program)
            .args(self.base_args())
            .arg("close")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }
}
