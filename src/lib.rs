//! simverify - headless-browser verification flows
//!
//! Drives a headless browser through fixed UI flows of the Data Pipeline
//! Simulator dev server and captures screenshots for visual review.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, logging and error handling
//! - **Browser**: Driver trait, agent-browser executor, selectors, page handle
//! - **Scenarios**: The UI flows and the runner that executes them
//! - **CLI**: Subcommand implementations and run summaries
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use simverify::browser::AgentBrowser;
//! use simverify::scenarios::{self, IdmcFeatures};
//! use simverify::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load(None).unwrap();
//!     let driver = Arc::new(AgentBrowser::from_config(&config, "idmc"));
//!     let report = scenarios::run_scenario(&IdmcFeatures, driver, &config).await;
//!     println!("{:?}", report.outcome);
//! }
//! ```

pub mod browser;
pub mod cli;
pub mod core;
pub mod scenarios;

// Re-export commonly used items
pub use crate::core::{Config, Result, ScenarioReport, VerifyError};
pub use scenarios::Scenario;
