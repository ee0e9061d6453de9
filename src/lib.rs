//! Pennywise - backup, restore and export for a personal finance tracker
//!
//! This library moves the tracker's eight entity tables in and out of
//! versioned JSON snapshots, optional AES-256-GCM envelopes, and CSV.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Entity records and the snapshot schema
//! - `storage`: The `EntityStore` seam with in-memory and SQLite stores
//! - `crypto`: Password-based envelope encryption
//! - `export`: Snapshot, scoped and CSV exports
//! - `import`: Validation plus the replace and merge strategies
//! - `audit`: Append-only log of exports and imports
//! - `display`: Terminal rendering of import results
//! - `cli`: Command handlers used by the `pennywise` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use pennywise::export::ExportService;
//! use pennywise::import::{ImportRequest, ImportService};
//! use pennywise::storage::MemoryStore;
//!
//! let source = MemoryStore::new();
//! let snapshot = ExportService::new(&source).export_full()?;
//!
//! let target = MemoryStore::new();
//! let body = serde_json::to_value(&snapshot)?;
//! let result = ImportService::new(&target).import(ImportRequest::from_value(body)?);
//! assert!(result.success);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod storage;

pub use error::{PennywiseError, PennywiseResult};
