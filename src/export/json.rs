//! Snapshot assembly
//!
//! Reads the collections a scope asks for out of the store and packs them
//! into a fresh `Snapshot`. Metadata is derived from the filtered data.

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{DateRange, EntityKind, ExportScope, Record, Snapshot, SnapshotData};
use crate::storage::{EntityStore, TableSet};

/// Read `kinds` from one consistent point, applying the date range to
/// transactions
pub(crate) fn read_tables<S: EntityStore + ?Sized>(
    store: &S,
    kinds: &[EntityKind],
    date_range: Option<&DateRange>,
) -> PennywiseResult<TableSet> {
    let mut tables = store.select_consistent(kinds).map_err(|e| {
        let names: Vec<_> = kinds.iter().map(|k| k.table()).collect();
        PennywiseError::Export(format!("Failed to read {}: {}", names.join(", "), e))
    })?;

    if let (Some(range), Some(transactions)) =
        (date_range, tables.get_mut(&EntityKind::Transaction))
    {
        transactions.retain(|r| matches!(r, Record::Transaction(t) if range.contains(t.date)));
    }
    Ok(tables)
}

/// Build a snapshot of the collections `scope` includes
///
/// Collections outside the scope are left empty. When a date range is
/// given only transactions dated inside it are kept.
pub fn build_snapshot<S: EntityStore + ?Sized>(
    store: &S,
    scope: ExportScope,
    date_range: Option<&DateRange>,
) -> PennywiseResult<Snapshot> {
    let kinds: Vec<_> = EntityKind::ALL
        .into_iter()
        .filter(|kind| scope.includes(*kind))
        .collect();

    let mut data = SnapshotData::default();
    for (_, records) in read_tables(store, &kinds, date_range)? {
        for record in records {
            data.push(record);
        }
    }

    Ok(Snapshot::new(scope, data))
}
