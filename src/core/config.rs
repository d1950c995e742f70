//! Configuration management for simverify
//!
//! Supports environment variables, a config file, and runtime overrides.
//!
//! Config file location: ~/.config/simverify/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::{Result, VerifyError};
use crate::core::types::Viewport;

/// Main configuration for simverify
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Application under test
    #[serde(default)]
    pub target: TargetConfig,
    /// Browser automation configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Fixed delays and wait budgets
    #[serde(default)]
    pub timing: TimingConfig,
    /// Where artifacts are written
    #[serde(default)]
    pub output: OutputConfig,
}

/// The running web application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL of the dev server (default: http://localhost:5173)
    pub base_url: String,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Automation CLI to invoke
    pub program: String,
    /// Prefix for per-scenario session names
    pub session_prefix: String,
    /// Whether to run in headed mode (visible browser)
    pub headed: bool,
    /// Viewport used for rendering and screenshots
    #[serde(default)]
    pub viewport: Viewport,
    /// Upper bound for a single automation command in ms
    pub command_timeout_ms: u64,
}

/// Delays let client-side rendering settle; wait budgets bound assertions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay after the initial page load
    pub page_settle_ms: u64,
    /// Delay after each navigation click
    pub step_settle_ms: u64,
    /// Delay before screenshotting a freshly rendered graph
    pub render_settle_ms: u64,
    /// Default budget for visibility assertions
    pub expect_timeout_ms: u64,
    /// Polling interval for visibility assertions
    pub poll_interval_ms: u64,
    /// Budget for the first meaningful render after load
    pub initial_render_timeout_ms: u64,
}

/// Artifact output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for PNG screenshots
    pub screenshot_dir: PathBuf,
}

/// `base_url` reduced to its site root, with a trailing slash
pub fn root_url(base_url: &str) -> Result<String> {
    let url = url::Url::parse(base_url)?;
    Ok(url.join("/")?.to_string())
}

fn parse_flag(value: &str) -> bool {
    value == "true" || value == "1"
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| parse_flag(&v))
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("SIMVERIFY_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            program: env::var("SIMVERIFY_BROWSER").unwrap_or_else(|_| "agent-browser".to_string()),
            session_prefix: env::var("SIMVERIFY_SESSION")
                .unwrap_or_else(|_| "simverify".to_string()),
            headed: env_flag("SIMVERIFY_HEADED").unwrap_or(false),
            viewport: Viewport::default(),
            command_timeout_ms: 30000,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            page_settle_ms: 5000,
            step_settle_ms: 1000,
            render_settle_ms: 2000,
            expect_timeout_ms: 5000,
            poll_interval_ms: 100,
            initial_render_timeout_ms: 10000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: env::var("SIMVERIFY_SCREENSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("verification")),
        }
    }
}

impl TimingConfig {
    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn step_settle(&self) -> Duration {
        Duration::from_millis(self.step_settle_ms)
    }

    pub fn render_settle(&self) -> Duration {
        Duration::from_millis(self.render_settle_ms)
    }

    pub fn expect_timeout(&self) -> Duration {
        Duration::from_millis(self.expect_timeout_ms)
    }

    pub fn initial_render_timeout(&self) -> Duration {
        Duration::from_millis(self.initial_render_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// No settle delays and short budgets, for tests.
    /// The first-render budget stays ten times the default one.
    pub fn instant() -> Self {
        Self {
            page_settle_ms: 0,
            step_settle_ms: 0,
            render_settle_ms: 0,
            expect_timeout_ms: 50,
            poll_interval_ms: 5,
            initial_render_timeout_ms: 500,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("simverify")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = match path {
            // An explicit path must exist
            Some(p) => Self::load_from_file(p)?,
            None => {
                let default_path = Self::config_file();
                if default_path.exists() {
                    Self::load_from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// Overlay `SIMVERIFY_*` environment variables on the current values
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SIMVERIFY_BASE_URL") {
            self.target.base_url = url;
        }
        if let Some(program) = var("SIMVERIFY_BROWSER") {
            self.browser.program = program;
        }
        if let Some(prefix) = var("SIMVERIFY_SESSION") {
            self.browser.session_prefix = prefix;
        }
        if let Some(headed) = var("SIMVERIFY_HEADED") {
            self.browser.headed = parse_flag(&headed);
        }
        if let Some(dir) = var("SIMVERIFY_SCREENSHOT_DIR") {
            self.output.screenshot_dir = PathBuf::from(dir);
        }
    }

    /// Load configuration from a file only
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            VerifyError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text; missing sections take defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| VerifyError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every run fail in confusing ways
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.target.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(VerifyError::config(format!(
                "base_url must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if self.browser.program.trim().is_empty() {
            return Err(VerifyError::config("browser.program is empty"));
        }
        if self.browser.viewport.width == 0 || self.browser.viewport.height == 0 {
            return Err(VerifyError::config("browser.viewport must be non-zero"));
        }
        Ok(())
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    VerifyError::config(format!("Failed to create config dir: {}", e))
                })?;
            }
        }

        fs::write(path, self.to_toml()?)
            .map_err(|e| VerifyError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| VerifyError::config(format!("Failed to serialize config: {}", e)))
    }

    /// The root page URL, always with a trailing slash
    pub fn root_url(&self) -> Result<String> {
        root_url(&self.target.base_url)
    }

    /// Session name for one scenario
    pub fn session_name(&self, scenario: &str) -> String {
        format!("{}-{}", self.browser.session_prefix, scenario)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.browser.command_timeout_ms)
    }
}
