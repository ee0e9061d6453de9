//! In-memory entity store
//!
//! Keeps every table as an insertion-ordered vector behind a `RwLock`. A unit
//! of work runs against a staged copy of the tables, which replaces the live
//! tables only when the work succeeds.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{EntityKind, Record};

use super::{AtomicWork, EntityStore, StoreTransaction, TableSet};

#[derive(Debug, Clone, Default)]
struct Table {
    rows: Vec<Record>,
    ids: HashSet<String>,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    tables: HashMap<EntityKind, Table>,
}

impl Tables {
    fn table(&self, kind: EntityKind) -> Option<&Table> {
        self.tables.get(&kind)
    }

    fn rows(&self, kind: EntityKind) -> Vec<Record> {
        self.table(kind).map(|t| t.rows.clone()).unwrap_or_default()
    }

    fn exists(&self, kind: EntityKind, id: &str) -> bool {
        self.table(kind).map_or(false, |t| t.ids.contains(id))
    }

    fn insert(&mut self, record: &Record) -> PennywiseResult<()> {
        let kind = record.kind();
        let table = self.tables.entry(kind).or_default();

        if table.ids.contains(record.id()) {
            return Err(PennywiseError::duplicate(kind.display_name(), record.id()));
        }

        table.ids.insert(record.id().to_string());
        table.rows.push(record.clone());
        Ok(())
    }

    fn delete_all(&mut self, kind: EntityKind) -> usize {
        self.tables
            .remove(&kind)
            .map(|t| t.rows.len())
            .unwrap_or(0)
    }
}

/// Entity store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PennywiseResult<std::sync::RwLockReadGuard<'_, Tables>> {
        self.data
            .read()
            .map_err(|e| PennywiseError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> PennywiseResult<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.data
            .write()
            .map_err(|e| PennywiseError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

struct MemoryTransaction<'a> {
    staged: &'a mut Tables,
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn exists(&self, kind: EntityKind, id: &str) -> PennywiseResult<bool> {
        Ok(self.staged.exists(kind, id))
    }

    fn insert(&mut self, record: &Record) -> PennywiseResult<()> {
        self.staged.insert(record)
    }

    fn delete_all(&mut self, kind: EntityKind) -> PennywiseResult<usize> {
        Ok(self.staged.delete_all(kind))
    }
}

impl EntityStore for MemoryStore {
    fn select_all(&self, kind: EntityKind) -> PennywiseResult<Vec<Record>> {
        Ok(self.read()?.rows(kind))
    }

    fn exists(&self, kind: EntityKind, id: &str) -> PennywiseResult<bool> {
        Ok(self.read()?.exists(kind, id))
    }

    fn select_consistent(&self, kinds: &[EntityKind]) -> PennywiseResult<TableSet> {
        // One guard for every table; units of work wait for it
        let data = self.read()?;
        Ok(kinds.iter().map(|kind| (*kind, data.rows(*kind))).collect())
    }

    fn count(&self, kind: EntityKind) -> PennywiseResult<usize> {
        Ok(self.read()?.table(kind).map_or(0, |t| t.rows.len()))
    }

    fn atomically(&self, work: &mut AtomicWork<'_>) -> PennywiseResult<()> {
        // The write guard is held for the whole unit so concurrent units
        // cannot interleave with the staged copy.
        let mut live = self.write()?;
        let mut staged = (*live).clone();

        work(&mut MemoryTransaction {
            staged: &mut staged,
        })?;

        *live = staged;
        Ok(())
    }
}
