//! Configuration module for Pennywise
//!
//! This module provides configuration management including:
//! - Platform path resolution for the database, settings and audit log
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::PennywisePaths;
pub use settings::Settings;
