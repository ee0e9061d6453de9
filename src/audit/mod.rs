//! Audit logging for Pennywise
//!
//! Every export, import and validation run appends one entry to an
//! append-only audit log. The log is line-delimited JSON (JSONL), one
//! complete `AuditEntry` per line.
//!
//! # Example
//!
//! ```rust,ignore
//! use pennywise::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let result = ImportService::new(&store).import(request);
//! logger.log(&AuditEntry::import(&result, encrypted, Some(path)))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
