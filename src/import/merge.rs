//! Merge strategy
//!
//! Purely additive: records whose id already exists are skipped, records
//! pointing at a missing parent are rejected, everything else is inserted.
//! Parents load before children so references inside the same snapshot
//! resolve.
//!
//! Two error channels run through here. A bad record becomes a
//! `RecordError` and the merge moves on; those records are simply absent
//! from the commit. A failure of the store itself escapes as `Err`, which
//! rolls back the whole unit.

use crate::error::PennywiseResult;
use crate::models::{EntityKind, Record, SnapshotData};
use crate::storage::{EntityStore, StoreTransaction};

use super::{ImportSummary, RecordError, RecordOutcome};

/// Outcome of one merged record; `Err` is a per-record rejection
pub type MergeOutcome = Result<RecordOutcome, RecordError>;

fn merge_record(tx: &mut dyn StoreTransaction, record: &Record) -> PennywiseResult<MergeOutcome> {
    let kind = record.kind();

    if tx.exists(kind, record.id())? {
        return Ok(Ok(RecordOutcome::Skipped));
    }

    for reference in record.references() {
        if !tx.exists(reference.target, reference.id)? {
            return Ok(Err(RecordError::referential(
                kind,
                record.id(),
                reference.field,
                reference.target,
                reference.id,
            )));
        }
    }

    Ok(match tx.insert(record) {
        Ok(()) => Ok(RecordOutcome::Added),
        Err(err) => Err(RecordError::persistence(kind, record.id(), &err)),
    })
}

/// Merge `data` into the store
///
/// Returns the counts and the per-record errors of a committed merge, or
/// the store error that rolled it back.
pub fn merge_all<S: EntityStore + ?Sized>(
    store: &S,
    data: &SnapshotData,
) -> PennywiseResult<(ImportSummary, Vec<RecordError>)> {
    let mut summary = ImportSummary::default();
    let mut errors = Vec::new();

    store.atomically(&mut |tx| {
        summary = ImportSummary::default();
        errors.clear();

        for kind in EntityKind::MERGE_ORDER {
            for record in data.records(kind) {
                match merge_record(tx, &record)? {
                    Ok(outcome) => summary.record(kind, outcome),
                    Err(rejection) => {
                        tracing::warn!(
                            entity = kind.as_str(),
                            id = record.id(),
                            reason = %rejection.message,
                            "record rejected"
                        );
                        errors.push(rejection);
                    }
                }
            }
        }
        Ok(())
    })?;

    Ok((summary, errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ErrorKind;
    use crate::models::{GoalContribution, Transaction};
    use crate::storage::testing::{sample_records, seeded_store, FaultyStore};
    use crate::storage::MemoryStore;

    fn dataset(records: Vec<Record>) -> SnapshotData {
        let mut data = SnapshotData::default();
        for record in records {
            data.push(record);
        }
        data
    }

    #[test]
    fn test_merge_into_empty_store_adds_everything() {
        let store = MemoryStore::new();
        let (summary, errors) = merge_all(&store, &dataset(sample_records())).unwrap();

        assert!(errors.is_empty());
        assert_eq!(summary.total_added(), 12);
        assert_eq!(summary.get(EntityKind::Transaction).added, 3);
    }

    #[test]
    fn test_merge_twice_skips_everything() {
        let store = MemoryStore::new();
        let data = dataset(sample_records());
        merge_all(&store, &data).unwrap();

        let (summary, errors) = merge_all(&store, &data).unwrap();
        assert!(errors.is_empty());
        assert_eq!(summary.total_added(), 0);
        for kind in EntityKind::ALL {
            assert_eq!(summary.get(kind).skipped, data.len(kind), "{}", kind);
        }
    }

    #[test]
    fn test_existing_records_are_left_untouched() {
        let store = seeded_store();
        let mut renamed = Transaction::new("acc-1", -1.0, 0)
            .with_id("txn-1")
            .with_description("Changed");
        renamed.amount = 999.0;

        let (summary, _) = merge_all(&store, &dataset(vec![renamed.into()])).unwrap();
        assert_eq!(summary.get(EntityKind::Transaction).skipped, 1);

        let stored = store.select_all(EntityKind::Transaction).unwrap();
        let Record::Transaction(first) = &stored[0] else {
            panic!("expected a transaction");
        };
        assert_eq!(first.description, "Market");
    }

    #[test]
    fn test_missing_parent_rejects_only_that_record() {
        let store = seeded_store();
        let records = vec![
            Transaction::new("acc-404", 10.0, 0).with_id("txn-orphan").into(),
            Transaction::new("acc-2", 20.0, 0).with_id("txn-ok").into(),
            GoalContribution::new("goal-404", 5.0, 0).with_id("gc-orphan").into(),
        ];

        let (summary, errors) = merge_all(&store, &dataset(records)).unwrap();

        assert_eq!(summary.get(EntityKind::Transaction).added, 1);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, ErrorKind::Referential);
        assert_eq!(errors[0].id, "txn-orphan");
        assert_eq!(errors[0].field.as_deref(), Some("account_id"));
        assert!(errors[0].message.contains("acc-404"));
        assert_eq!(errors[1].field.as_deref(), Some("goal_id"));

        assert!(store.exists(EntityKind::Transaction, "txn-ok").unwrap());
        assert!(!store.exists(EntityKind::Transaction, "txn-orphan").unwrap());
    }

    #[test]
    fn test_parents_in_same_snapshot_resolve() {
        let store = MemoryStore::new();
        // Children listed before parents still merge cleanly
        let mut records = sample_records();
        records.reverse();

        let (summary, errors) = merge_all(&store, &dataset(records)).unwrap();
        assert!(errors.is_empty());
        assert_eq!(summary.total_added(), 12);
    }

    #[test]
    fn test_insert_failure_is_caught_per_record() {
        let store = FaultyStore {
            failing_insert: Some("txn-2"),
            ..Default::default()
        };

        let (summary, errors) = merge_all(&store, &dataset(sample_records())).unwrap();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Persistence);
        assert_eq!(errors[0].id, "txn-2");
        assert_eq!(summary.total_added(), 11);
        assert!(store.exists(EntityKind::Transaction, "txn-1").unwrap());
        assert!(!store.exists(EntityKind::Transaction, "txn-2").unwrap());
    }

    #[test]
    fn test_store_failure_rolls_back_whole_merge() {
        let store = FaultyStore {
            failing_lookup: Some(EntityKind::Goal),
            ..Default::default()
        };

        let result = merge_all(&store, &dataset(sample_records()));

        assert!(result.is_err());
        for kind in EntityKind::ALL {
            assert_eq!(store.count(kind).unwrap(), 0, "{}", kind);
        }
    }
}
