//! Display formatting for terminal output
//!
//! Renders import results and validation reports for the CLI.

pub mod import;

pub use import::{format_import_result, format_validation_report};
