//! Core module - shared infrastructure for simverify
//!
//! This module contains foundational types, configuration, logging and
//! error handling used throughout the crate.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::Config;
pub use error::{Result, VerifyError};
pub use types::*;
