//! Shared types used across simverify modules
//!
//! Contains the viewport, console capture entries and scenario reports.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Simulated browser window size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Where a captured browser message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleKind {
    /// `console.*` output
    Console,
    /// Uncaught page-level error
    PageError,
}

impl std::fmt::Display for ConsoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsoleKind::Console => write!(f, "Console"),
            ConsoleKind::PageError => write!(f, "Page Error"),
        }
    }
}

/// A single browser console line or page error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub kind: ConsoleKind,
    pub text: String,
}

impl ConsoleEntry {
    pub fn console(text: impl Into<String>) -> Self {
        Self {
            kind: ConsoleKind::Console,
            text: text.into(),
        }
    }

    pub fn page_error(text: impl Into<String>) -> Self {
        Self {
            kind: ConsoleKind::PageError,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for ConsoleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.text)
    }
}

/// How a scenario ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed {
        /// Diagnostic message
        reason: String,
        /// Description of the element that was missing or hidden
        #[serde(skip_serializing_if = "Option::is_none")]
        missing: Option<String>,
    },
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

/// Result of running one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub scenario: String,
    /// Pass or fail with diagnostic
    pub outcome: Outcome,
    /// Screenshots written, in capture order (includes failure captures)
    pub screenshots: Vec<PathBuf>,
    /// Console messages and page errors seen during the run
    pub console: Vec<ConsoleEntry>,
    /// Wall-clock duration
    pub elapsed_ms: u64,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.outcome.is_passed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_entry_display() {
        assert_eq!(ConsoleEntry::console("ready").to_string(), "Console: ready");
        assert_eq!(
            ConsoleEntry::page_error("x is undefined").to_string(),
            "Page Error: x is undefined"
        );
    }

    #[test]
    fn test_outcome_json_shape() {
        let failed = Outcome::Failed {
            reason: "Topic label not found".to_string(),
            missing: Some("Topic label".to_string()),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["missing"], "Topic label");

        let passed = serde_json::to_value(Outcome::Passed).unwrap();
        assert_eq!(passed["status"], "passed");
    }
}
