//! Core data models for Pennywise
//!
//! This module contains the eight entity records of the finance tracker, the
//! `Record` union used by the storage layer, and the versioned snapshot
//! schema that backups are written in.

pub mod account;
pub mod bill;
pub mod budget;
pub mod category;
pub mod goal;
pub mod ids;
pub mod record;
pub mod recurring;
pub mod snapshot;
pub mod transaction;

pub use account::Account;
pub use bill::Bill;
pub use budget::Budget;
pub use category::Category;
pub use goal::{Goal, GoalContribution};
pub use ids::generate_id;
pub use record::{EntityKind, Record, Reference};
pub use recurring::RecurringPattern;
pub use snapshot::{
    DateRange, ExportScope, Snapshot, SnapshotData, SnapshotMetadata, SNAPSHOT_VERSION,
    SUPPORTED_VERSIONS,
};
pub use transaction::Transaction;
