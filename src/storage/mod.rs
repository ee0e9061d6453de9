//! Storage layer for Pennywise
//!
//! The backup engine reaches the eight relational tables only through the
//! `EntityStore` trait. Both the export and import paths take the store as an
//! explicit dependency, so tests run against `MemoryStore` and the binary
//! runs against `SqliteStore`.
//!
//! All mutation goes through `EntityStore::atomically`: the closure receives
//! a `StoreTransaction`, and the store commits when the closure returns `Ok`
//! and rolls back when it returns `Err`. The store does no locking across
//! calls beyond what its own transaction isolation gives; callers that need
//! imports to be mutually exclusive serialize them above this layer.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::collections::BTreeMap;

use crate::error::PennywiseResult;
use crate::models::{EntityKind, Record};

/// Writes available inside an atomic unit of work
pub trait StoreTransaction {
    /// Check whether a record with `id` exists in `kind`'s table
    fn exists(&self, kind: EntityKind, id: &str) -> PennywiseResult<bool>;

    /// Insert a record; fails on a primary-key conflict
    fn insert(&mut self, record: &Record) -> PennywiseResult<()>;

    /// Delete every row of a table, returning how many were removed
    fn delete_all(&mut self, kind: EntityKind) -> PennywiseResult<usize>;
}

/// Unit of work executed by `EntityStore::atomically`
pub type AtomicWork<'w> = dyn FnMut(&mut dyn StoreTransaction) -> PennywiseResult<()> + 'w;

/// Rows of several tables, keyed by kind
pub type TableSet = BTreeMap<EntityKind, Vec<Record>>;

/// Read/write access to the eight entity tables
pub trait EntityStore: Send + Sync {
    /// All rows of a table in insertion order
    fn select_all(&self, kind: EntityKind) -> PennywiseResult<Vec<Record>>;

    /// Check whether a record with `id` exists in `kind`'s table
    fn exists(&self, kind: EntityKind, id: &str) -> PennywiseResult<bool>;

    /// Read every table in `kinds` as of one point in time
    ///
    /// No unit of work commits between the reads of two tables, so
    /// references between the returned rows are as consistent as the
    /// store itself. Every requested kind is present in the result.
    fn select_consistent(&self, kinds: &[EntityKind]) -> PennywiseResult<TableSet>;

    /// Run `work` inside one transaction
    ///
    /// Commits if `work` returns `Ok`; rolls back and returns the error
    /// otherwise. Nothing written by a rolled-back unit is ever visible.
    fn atomically(&self, work: &mut AtomicWork<'_>) -> PennywiseResult<()>;

    /// Number of rows in a table
    fn count(&self, kind: EntityKind) -> PennywiseResult<usize> {
        Ok(self.select_all(kind)?.len())
    }

    /// Insert a single record in its own transaction
    fn insert(&self, record: &Record) -> PennywiseResult<()> {
        self.atomically(&mut |tx| tx.insert(record))
    }
}
