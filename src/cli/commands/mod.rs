//! CLI command implementations

pub mod calc;
pub mod catalog;
pub mod completions;
pub mod config;
pub mod history;
pub mod report;
