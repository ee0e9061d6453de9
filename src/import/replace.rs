//! Replace strategy
//!
//! Wipes all eight tables and loads the snapshot in their place, inside a
//! single atomic unit. Any failure rolls the whole unit back and the
//! dataset is left exactly as it was.

use crate::error::PennywiseResult;
use crate::models::{EntityKind, SnapshotData};
use crate::storage::EntityStore;

use super::{ImportSummary, RecordOutcome};

/// Delete children first, insert parents first
pub fn replace_all<S: EntityStore + ?Sized>(
    store: &S,
    data: &SnapshotData,
) -> PennywiseResult<ImportSummary> {
    let mut summary = ImportSummary::default();

    store.atomically(&mut |tx| {
        summary = ImportSummary::default();

        for kind in EntityKind::DELETE_ORDER {
            let removed = tx.delete_all(kind)?;
            tracing::debug!(table = kind.table(), removed, "cleared table");
        }

        for kind in EntityKind::insert_order() {
            for record in data.records(kind) {
                tx.insert(&record)?;
                summary.record(kind, RecordOutcome::Added);
            }
        }
        Ok(())
    })?;

    Ok(summary)
}
