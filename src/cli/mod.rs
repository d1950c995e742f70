//! CLI module - command implementations and output formatting

pub mod commands;
pub mod report;

pub use commands::{DoctorReport, RunOptions};
