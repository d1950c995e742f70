//! Custom error types for simverify
//!
//! Every failure inside a scenario is one of these variants and flows up to
//! the scenario runner with `?`.

use std::time::Duration;

use thiserror::Error;

/// Main error type for verification runs
#[derive(Error, Debug)]
pub enum VerifyError {
    /// A lookup matched zero elements
    #[error("{what} not found (selector: {selector})")]
    ElementNotFound { what: String, selector: String },

    /// An element never became visible before the deadline
    #[error("{what} not visible within {}ms (selector: {selector})", .timeout.as_millis())]
    NotVisible {
        what: String,
        selector: String,
        timeout: Duration,
    },

    /// Browser automation errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// The automation CLI is not installed
    #[error("{0} not found. Install with: npm install -g agent-browser && agent-browser install")]
    DriverNotFound(String),

    /// A single automation command hung
    #[error("browser command '{command}' timed out after {}ms", .timeout.as_millis())]
    CommandTimeout { command: String, timeout: Duration },

    /// The application under test did not answer
    #[error("Target {url} is not reachable: {reason}. Is the dev server running?")]
    TargetUnreachable { url: String, reason: String },

    /// No scenario with that name
    #[error("Unknown scenario '{0}'. Run `simverify list` for the available ones")]
    UnknownScenario(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL parsing errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for verification operations
pub type Result<T> = std::result::Result<T, VerifyError>;

impl VerifyError {
    /// Create a not-found error for a described element
    pub fn not_found(what: impl Into<String>, selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            what: what.into(),
            selector: selector.into(),
        }
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The human description of the element this error is about, if any
    pub fn missing_element(&self) -> Option<&str> {
        match self {
            Self::ElementNotFound { what, .. } | Self::NotVisible { what, .. } => Some(what),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_element() {
        let err = VerifyError::not_found("Data Hub tab", "button:has-text(\"Data Hub\")");
        assert!(err.to_string().starts_with("Data Hub tab not found"));
        assert_eq!(err.missing_element(), Some("Data Hub tab"));
    }

    #[test]
    fn test_not_visible_reports_timeout() {
        let err = VerifyError::NotVisible {
            what: "Simulator title".to_string(),
            selector: "text=Data Pipeline Simulator".to_string(),
            timeout: Duration::from_secs(10),
        };
        assert!(err.to_string().contains("10000ms"));
        assert_eq!(err.missing_element(), Some("Simulator title"));
    }

    #[test]
    fn test_browser_error_has_no_element() {
        assert!(VerifyError::browser("boom").missing_element().is_none());
    }
}
