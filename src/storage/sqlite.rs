//! SQLite entity store
//!
//! Eight typed tables keyed by `id`. References between tables are soft:
//! the schema declares no foreign keys, the backup engine checks them.
//! Rows are read back in rowid order, which is insertion order.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{ffi, params, Connection, Row, TransactionBehavior};

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{
    Account, Bill, Budget, Category, EntityKind, Goal, GoalContribution, Record,
    RecurringPattern, Transaction,
};

use super::{AtomicWork, EntityStore, StoreTransaction, TableSet};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    balance REAL NOT NULL DEFAULT 0,
    currency TEXT NOT NULL,
    institution TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    color TEXT,
    icon TEXT,
    created_at INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS recurring_patterns (
    id TEXT PRIMARY KEY NOT NULL,
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    type TEXT NOT NULL,
    frequency TEXT NOT NULL,
    next_date INTEGER,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY NOT NULL,
    account_id TEXT NOT NULL,
    category_id TEXT,
    amount REAL NOT NULL,
    type TEXT NOT NULL,
    description TEXT NOT NULL,
    notes TEXT,
    date INTEGER NOT NULL,
    recurring_pattern_id TEXT,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
CREATE TABLE IF NOT EXISTS bills (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    amount REAL NOT NULL,
    due_date INTEGER NOT NULL,
    frequency TEXT NOT NULL,
    account_id TEXT,
    category_id TEXT,
    is_paid INTEGER NOT NULL DEFAULT 0,
    notes TEXT,
    created_at INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS budgets (
    id TEXT PRIMARY KEY NOT NULL,
    category_id TEXT NOT NULL,
    amount REAL NOT NULL,
    period TEXT NOT NULL,
    start_date INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS goals (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    target_amount REAL NOT NULL,
    current_amount REAL NOT NULL DEFAULT 0,
    deadline INTEGER,
    created_at INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS goal_contributions (
    id TEXT PRIMARY KEY NOT NULL,
    goal_id TEXT NOT NULL,
    amount REAL NOT NULL,
    date INTEGER NOT NULL,
    notes TEXT,
    created_at INTEGER NOT NULL
);
";

/// Entity store backed by a SQLite database file
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists
    pub fn open(path: &Path) -> PennywiseResult<Self> {
        let conn = Connection::open(path).map_err(|e| {
            PennywiseError::Storage(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> PennywiseResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> PennywiseResult<Self> {
        configure_connection(&conn)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the eight tables if they do not exist yet
    pub fn ensure_schema(&self) -> PennywiseResult<()> {
        self.lock().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("SQLite mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

fn configure_connection(conn: &Connection) -> PennywiseResult<()> {
    // In-memory databases stay in "memory" mode
    match conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
        row.get::<_, String>(0)
    }) {
        Ok(mode) => tracing::debug!(journal_mode = %mode, "connection configured"),
        Err(err) => tracing::warn!(error = %err, "could not switch journal mode to WAL"),
    }
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(())
}

/// Map an insert failure, surfacing primary-key conflicts as `Duplicate`
fn insert_error(err: rusqlite::Error, record: &Record) -> PennywiseError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            PennywiseError::duplicate(record.kind().display_name(), record.id())
        }
        _ => PennywiseError::Storage(format!(
            "Failed to insert {} {}: {}",
            record.kind(),
            record.id(),
            err
        )),
    }
}

fn exists_in(conn: &Connection, kind: EntityKind, id: &str) -> PennywiseResult<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", kind.table());
    let found: bool = conn.query_row(&sql, params![id], |row| row.get(0))?;
    Ok(found)
}

fn insert_into(conn: &Connection, record: &Record) -> PennywiseResult<()> {
    let result = match record {
        Record::Account(a) => conn.execute(
            "INSERT INTO accounts (id, name, type, balance, currency, institution, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                a.id,
                a.name,
                a.account_type,
                a.balance,
                a.currency,
                a.institution,
                a.is_active,
                a.created_at,
                a.updated_at
            ],
        ),
        Record::Category(c) => conn.execute(
            "INSERT INTO categories (id, name, type, color, icon, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![c.id, c.name, c.kind, c.color, c.icon, c.created_at],
        ),
        Record::RecurringPattern(p) => conn.execute(
            "INSERT INTO recurring_patterns (id, description, amount, type, frequency, next_date, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                p.id,
                p.description,
                p.amount,
                p.kind,
                p.frequency,
                p.next_date,
                p.is_active,
                p.created_at
            ],
        ),
        Record::Transaction(t) => conn.execute(
            "INSERT INTO transactions (id, account_id, category_id, amount, type, description, notes, date, recurring_pattern_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                t.id,
                t.account_id,
                t.category_id,
                t.amount,
                t.kind,
                t.description,
                t.notes,
                t.date,
                t.recurring_pattern_id,
                t.created_at
            ],
        ),
        Record::Bill(b) => conn.execute(
            "INSERT INTO bills (id, name, amount, due_date, frequency, account_id, category_id, is_paid, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                b.id,
                b.name,
                b.amount,
                b.due_date,
                b.frequency,
                b.account_id,
                b.category_id,
                b.is_paid,
                b.notes,
                b.created_at
            ],
        ),
        Record::Budget(b) => conn.execute(
            "INSERT INTO budgets (id, category_id, amount, period, start_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![b.id, b.category_id, b.amount, b.period, b.start_date, b.created_at],
        ),
        Record::Goal(g) => conn.execute(
            "INSERT INTO goals (id, name, target_amount, current_amount, deadline, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                g.id,
                g.name,
                g.target_amount,
                g.current_amount,
                g.deadline,
                g.created_at
            ],
        ),
        Record::GoalContribution(c) => conn.execute(
            "INSERT INTO goal_contributions (id, goal_id, amount, date, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![c.id, c.goal_id, c.amount, c.date, c.notes, c.created_at],
        ),
    };

    result.map(|_| ()).map_err(|e| insert_error(e, record))
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record::Account(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        account_type: row.get(2)?,
        balance: row.get(3)?,
        currency: row.get(4)?,
        institution: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    }))
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record::Category(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        color: row.get(3)?,
        icon: row.get(4)?,
        created_at: row.get(5)?,
    }))
}

fn pattern_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record::RecurringPattern(RecurringPattern {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        kind: row.get(3)?,
        frequency: row.get(4)?,
        next_date: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
    }))
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record::Transaction(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        category_id: row.get(2)?,
        amount: row.get(3)?,
        kind: row.get(4)?,
        description: row.get(5)?,
        notes: row.get(6)?,
        date: row.get(7)?,
        recurring_pattern_id: row.get(8)?,
        created_at: row.get(9)?,
    }))
}

fn bill_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record::Bill(Bill {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        due_date: row.get(3)?,
        frequency: row.get(4)?,
        account_id: row.get(5)?,
        category_id: row.get(6)?,
        is_paid: row.get(7)?,
        notes: row.get(8)?,
        created_at: row.get(9)?,
    }))
}

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record::Budget(Budget {
        id: row.get(0)?,
        category_id: row.get(1)?,
        amount: row.get(2)?,
        period: row.get(3)?,
        start_date: row.get(4)?,
        created_at: row.get(5)?,
    }))
}

fn goal_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record::Goal(Goal {
        id: row.get(0)?,
        name: row.get(1)?,
        target_amount: row.get(2)?,
        current_amount: row.get(3)?,
        deadline: row.get(4)?,
        created_at: row.get(5)?,
    }))
}

fn contribution_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record::GoalContribution(GoalContribution {
        id: row.get(0)?,
        goal_id: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        notes: row.get(4)?,
        created_at: row.get(5)?,
    }))
}

type RowMapper = fn(&Row<'_>) -> rusqlite::Result<Record>;

/// Column list and row mapper for one table
fn row_reader(kind: EntityKind) -> (&'static str, RowMapper) {
    match kind {
        EntityKind::Account => (
            "id, name, type, balance, currency, institution, is_active, created_at, updated_at",
            account_from_row,
        ),
        EntityKind::Category => ("id, name, type, color, icon, created_at", category_from_row),
        EntityKind::RecurringPattern => (
            "id, description, amount, type, frequency, next_date, is_active, created_at",
            pattern_from_row,
        ),
        EntityKind::Transaction => (
            "id, account_id, category_id, amount, type, description, notes, date, recurring_pattern_id, created_at",
            transaction_from_row,
        ),
        EntityKind::Bill => (
            "id, name, amount, due_date, frequency, account_id, category_id, is_paid, notes, created_at",
            bill_from_row,
        ),
        EntityKind::Budget => (
            "id, category_id, amount, period, start_date, created_at",
            budget_from_row,
        ),
        EntityKind::Goal => (
            "id, name, target_amount, current_amount, deadline, created_at",
            goal_from_row,
        ),
        EntityKind::GoalContribution => (
            "id, goal_id, amount, date, notes, created_at",
            contribution_from_row,
        ),
    }
}

fn select_from(conn: &Connection, kind: EntityKind) -> PennywiseResult<Vec<Record>> {
    let (columns, mapper) = row_reader(kind);
    let sql = format!("SELECT {} FROM {} ORDER BY rowid", columns, kind.table());

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], mapper)?;
    let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

struct SqliteTransaction<'a> {
    conn: &'a Connection,
}

impl StoreTransaction for SqliteTransaction<'_> {
    fn exists(&self, kind: EntityKind, id: &str) -> PennywiseResult<bool> {
        exists_in(self.conn, kind, id)
    }

    fn insert(&mut self, record: &Record) -> PennywiseResult<()> {
        insert_into(self.conn, record)
    }

    fn delete_all(&mut self, kind: EntityKind) -> PennywiseResult<usize> {
        let sql = format!("DELETE FROM {}", kind.table());
        Ok(self.conn.execute(&sql, [])?)
    }
}

impl EntityStore for SqliteStore {
    fn select_all(&self, kind: EntityKind) -> PennywiseResult<Vec<Record>> {
        select_from(&self.lock(), kind)
    }

    fn select_consistent(&self, kinds: &[EntityKind]) -> PennywiseResult<TableSet> {
        let mut conn = self.lock();
        // A deferred transaction pins one read snapshot across all tables,
        // including against writers on other connections
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;

        let mut tables = TableSet::new();
        for kind in kinds {
            tables.insert(*kind, select_from(&tx, *kind)?);
        }

        tx.commit()?;
        Ok(tables)
    }

    fn exists(&self, kind: EntityKind, id: &str) -> PennywiseResult<bool> {
        exists_in(&self.lock(), kind, id)
    }

    fn count(&self, kind: EntityKind) -> PennywiseResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table());
        let count: i64 = self.lock().query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn atomically(&self, work: &mut AtomicWork<'_>) -> PennywiseResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let outcome = work(&mut SqliteTransaction { conn: &tx });

        match outcome {
            Ok(()) => {
                tx.commit()
                    .map_err(|e| PennywiseError::Transaction(format!("Commit failed: {}", e)))?;
                Ok(())
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{merge_all, replace_all, ErrorKind};
    use crate::models::SnapshotData;
    use crate::storage::testing::sample_records;
    use tempfile::TempDir;

    fn dataset(records: Vec<Record>) -> SnapshotData {
        let mut data = SnapshotData::default();
        for record in records {
            data.push(record);
        }
        data
    }

    /// Make SQLite abort inserts into `table` whose `column` equals `value`
    fn reject_inserts(store: &SqliteStore, table: &str, column: &str, value: &str) {
        let sql = format!(
            "CREATE TRIGGER reject_{table} BEFORE INSERT ON {table}
             WHEN NEW.{column} = '{value}'
             BEGIN SELECT RAISE(ABORT, 'rejected by trigger'); END;"
        );
        store.lock().execute_batch(&sql).unwrap();
    }

    fn seeded() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .atomically(&mut |tx| {
                for record in sample_records() {
                    tx.insert(&record)?;
                }
                Ok(())
            })
            .unwrap();
        store
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        assert_eq!(store.count(EntityKind::Account).unwrap(), 0);
    }

    #[test]
    fn test_rows_round_trip_through_tables() {
        let store = seeded();
        let expected = sample_records();

        for kind in EntityKind::ALL {
            let want: Vec<_> = expected.iter().filter(|r| r.kind() == kind).cloned().collect();
            assert_eq!(store.select_all(kind).unwrap(), want, "table {}", kind.table());
        }
    }

    #[test]
    fn test_duplicate_is_reported() {
        let store = seeded();
        let dup = sample_records().remove(0);
        let err = store.insert(&dup).unwrap_err();
        assert!(matches!(err, PennywiseError::Duplicate { .. }));
    }

    #[test]
    fn test_rollback_discards_deletes_and_inserts() {
        let store = seeded();

        let result = store.atomically(&mut |tx| {
            for kind in EntityKind::DELETE_ORDER {
                tx.delete_all(kind)?;
            }
            tx.insert(&Account::new("New", "cash").with_id("acc-new").into())?;
            Err(PennywiseError::Storage("boom".into()))
        });

        assert!(result.is_err());
        assert!(store.exists(EntityKind::Account, "acc-1").unwrap());
        assert!(!store.exists(EntityKind::Account, "acc-new").unwrap());
        assert_eq!(store.count(EntityKind::Transaction).unwrap(), 3);
    }

    #[test]
    fn test_only_key_conflicts_are_duplicates() {
        let record = sample_records().remove(0);

        for code in [ffi::SQLITE_CONSTRAINT_PRIMARYKEY, ffi::SQLITE_CONSTRAINT_UNIQUE] {
            let err = rusqlite::Error::SqliteFailure(ffi::Error::new(code), None);
            assert!(matches!(insert_error(err, &record), PennywiseError::Duplicate { .. }));
        }

        for code in [ffi::SQLITE_CONSTRAINT_NOTNULL, ffi::SQLITE_CONSTRAINT_CHECK] {
            let err = rusqlite::Error::SqliteFailure(ffi::Error::new(code), None);
            assert!(matches!(insert_error(err, &record), PennywiseError::Storage(_)));
        }
    }

    #[test]
    fn test_consistent_read_matches_tables() {
        let store = seeded();
        let tables = store.select_consistent(&EntityKind::ALL).unwrap();

        assert_eq!(tables.len(), 8);
        for kind in EntityKind::ALL {
            assert_eq!(tables[&kind], store.select_all(kind).unwrap());
        }
    }

    #[test]
    fn test_consistent_read_ignores_uncommitted_writer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pennywise.sqlite3");
        let store = SqliteStore::open(&path).unwrap();
        store
            .insert(&Account::new("Checking", "checking").with_id("acc-1").into())
            .unwrap();

        // A second connection holds an open write transaction
        let mut writer = Connection::open(&path).unwrap();
        let tx = writer.transaction().unwrap();
        tx.execute("DELETE FROM accounts", []).unwrap();

        let tables = store.select_consistent(&[EntityKind::Account]).unwrap();
        assert_eq!(tables[&EntityKind::Account].len(), 1);

        tx.rollback().unwrap();
    }

    #[test]
    fn test_replace_into_sqlite_restores_dataset() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert(&Account::new("Old", "cash").with_id("acc-old").into())
            .unwrap();

        let summary = replace_all(&store, &dataset(sample_records())).unwrap();
        assert_eq!(summary.total_added(), 12);
        assert!(!store.exists(EntityKind::Account, "acc-old").unwrap());

        let expected = sample_records();
        for kind in EntityKind::ALL {
            let want: Vec<_> = expected.iter().filter(|r| r.kind() == kind).cloned().collect();
            assert_eq!(store.select_all(kind).unwrap(), want, "table {}", kind.table());
        }
    }

    #[test]
    fn test_late_replace_failure_rolls_back_sqlite() {
        let store = seeded();
        // Goal contributions load last
        reject_inserts(&store, "goal_contributions", "id", "gc-new");

        let records = vec![
            Account::new("Cash", "cash").with_id("acc-new").into(),
            Goal::new("Car", 5000.0).with_id("goal-new").into(),
            GoalContribution::new("goal-new", 10.0, 0)
                .with_id("gc-new")
                .into(),
        ];
        let err = replace_all(&store, &dataset(records)).unwrap_err();
        assert!(matches!(err, PennywiseError::Storage(_)));

        assert!(store.exists(EntityKind::Account, "acc-1").unwrap());
        assert!(!store.exists(EntityKind::Account, "acc-new").unwrap());
        assert!(!store.exists(EntityKind::Goal, "goal-new").unwrap());
        let total: usize = EntityKind::ALL
            .iter()
            .map(|kind| store.count(*kind).unwrap())
            .sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn test_merge_continues_after_rejected_insert() {
        let store = seeded();
        reject_inserts(&store, "transactions", "description", "reject me");

        let records = vec![
            Transaction::new("acc-1", -5.0, 0)
                .with_id("txn-a")
                .with_description("Coffee")
                .into(),
            Transaction::new("acc-1", -9.0, 0)
                .with_id("txn-bad")
                .with_description("reject me")
                .into(),
            Transaction::new("acc-2", 12.0, 0)
                .with_id("txn-c")
                .with_description("Interest")
                .into(),
        ];

        let (summary, errors) = merge_all(&store, &dataset(records)).unwrap();

        assert_eq!(summary.get(EntityKind::Transaction).added, 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Persistence);
        assert_eq!(errors[0].id, "txn-bad");

        // The rows around the failed statement were committed
        assert!(store.exists(EntityKind::Transaction, "txn-a").unwrap());
        assert!(store.exists(EntityKind::Transaction, "txn-c").unwrap());
        assert!(!store.exists(EntityKind::Transaction, "txn-bad").unwrap());
        assert_eq!(store.count(EntityKind::Transaction).unwrap(), 5);
    }

    #[test]
    fn test_merge_skips_existing_rows_in_sqlite() {
        let store = seeded();
        let (summary, errors) = merge_all(&store, &dataset(sample_records())).unwrap();

        assert!(errors.is_empty());
        assert_eq!(summary.total_added(), 0);
        assert_eq!(summary.total_skipped(), 12);
    }

    #[test]
    fn test_file_database_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pennywise.sqlite3");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .insert(&Category::new("Fuel").with_id("cat-fuel").into())
                .unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert!(reopened.exists(EntityKind::Category, "cat-fuel").unwrap());
    }

    #[test]
    fn test_file_database_uses_wal() {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&temp_dir.path().join("pennywise.sqlite3")).unwrap();

        let mode: String = store
            .lock()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }
}
