//! Versioned snapshot schema
//!
//! A `Snapshot` is the full (or scoped) serialization of the dataset. It is
//! built fresh on every export and consumed once by an import. Only
//! `version` decides whether a payload can be read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    Account, Bill, Budget, Category, EntityKind, Goal, GoalContribution, Record,
    RecurringPattern, Transaction,
};

/// Version written by this build
pub const SNAPSHOT_VERSION: u32 = 1;

/// Versions this build knows how to import
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Which collections an export includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    #[default]
    All,
    Transactions,
    Accounts,
    Categories,
}

impl ExportScope {
    /// Whether a collection is populated under this scope
    pub fn includes(&self, kind: EntityKind) -> bool {
        match self {
            Self::All => true,
            Self::Transactions => kind == EntityKind::Transaction,
            Self::Accounts => kind == EntityKind::Account,
            Self::Categories => kind == EntityKind::Category,
        }
    }

    /// Parse a scope name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(Self::All),
            "transactions" => Some(Self::Transactions),
            "accounts" => Some(Self::Accounts),
            "categories" => Some(Self::Categories),
            _ => None,
        }
    }
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Transactions => write!(f, "transactions"),
            Self::Accounts => write!(f, "accounts"),
            Self::Categories => write!(f, "categories"),
        }
    }
}

/// Inclusive range of epoch-millisecond timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: i64,
    pub end_date: i64,
}

impl DateRange {
    pub fn new(start_date: i64, end_date: i64) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Whether `timestamp` lies within `[start_date, end_date]`
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start_date && timestamp <= self.end_date
    }
}

/// The eight entity collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotData {
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub bills: Vec<Bill>,
    pub goals: Vec<Goal>,
    pub goal_contributions: Vec<GoalContribution>,
    pub budgets: Vec<Budget>,
    pub recurring_patterns: Vec<RecurringPattern>,
}

impl SnapshotData {
    /// Number of records in one collection
    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Account => self.accounts.len(),
            EntityKind::Category => self.categories.len(),
            EntityKind::Transaction => self.transactions.len(),
            EntityKind::Bill => self.bills.len(),
            EntityKind::Budget => self.budgets.len(),
            EntityKind::Goal => self.goals.len(),
            EntityKind::GoalContribution => self.goal_contributions.len(),
            EntityKind::RecurringPattern => self.recurring_patterns.len(),
        }
    }

    /// Total number of records across all collections
    pub fn total_records(&self) -> usize {
        EntityKind::ALL.iter().map(|kind| self.len(*kind)).sum()
    }

    /// Check if every collection is empty
    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }

    /// Clone one collection out as generic records, preserving order
    pub fn records(&self, kind: EntityKind) -> Vec<Record> {
        fn wrap<T: Clone + Into<Record>>(items: &[T]) -> Vec<Record> {
            items.iter().cloned().map(Into::into).collect()
        }

        match kind {
            EntityKind::Account => wrap(&self.accounts),
            EntityKind::Category => wrap(&self.categories),
            EntityKind::Transaction => wrap(&self.transactions),
            EntityKind::Bill => wrap(&self.bills),
            EntityKind::Budget => wrap(&self.budgets),
            EntityKind::Goal => wrap(&self.goals),
            EntityKind::GoalContribution => wrap(&self.goal_contributions),
            EntityKind::RecurringPattern => wrap(&self.recurring_patterns),
        }
    }

    /// Append a record to its collection
    pub fn push(&mut self, record: Record) {
        match record {
            Record::Account(r) => self.accounts.push(r),
            Record::Category(r) => self.categories.push(r),
            Record::Transaction(r) => self.transactions.push(r),
            Record::Bill(r) => self.bills.push(r),
            Record::Budget(r) => self.budgets.push(r),
            Record::Goal(r) => self.goals.push(r),
            Record::GoalContribution(r) => self.goal_contributions.push(r),
            Record::RecurringPattern(r) => self.recurring_patterns.push(r),
        }
    }
}

/// Derived counts, always equal to the collection lengths at creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub total_accounts: usize,
    pub total_transactions: usize,
    pub total_goals: usize,
    pub total_bills: usize,
}

impl SnapshotMetadata {
    /// Compute counts from the collections
    pub fn from_data(data: &SnapshotData) -> Self {
        Self {
            total_accounts: data.accounts.len(),
            total_transactions: data.transactions.len(),
            total_goals: data.goals.len(),
            total_bills: data.bills.len(),
        }
    }
}

/// Root backup artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Format version, the only field consulted for compatibility
    pub version: u32,

    /// Export timestamp (RFC 3339)
    pub exported_at: DateTime<Utc>,

    /// Which collections were populated
    #[serde(default)]
    pub scope: ExportScope,

    /// The collections
    pub data: SnapshotData,

    /// Derived counts
    #[serde(default)]
    pub metadata: SnapshotMetadata,
}

impl Snapshot {
    /// Build a snapshot at the current version, deriving metadata from `data`
    pub fn new(scope: ExportScope, data: SnapshotData) -> Self {
        let metadata = SnapshotMetadata::from_data(&data);
        Self {
            version: SNAPSHOT_VERSION,
            exported_at: Utc::now(),
            scope,
            data,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> SnapshotData {
        let mut data = SnapshotData::default();
        let account = Account::new("Checking", "checking").with_id("acc-1");
        data.push(Record::Account(account));
        data.push(Record::Transaction(
            Transaction::new("acc-1", -12.0, 1_000).with_id("t1"),
        ));
        data.push(Record::Transaction(
            Transaction::new("acc-1", -8.0, 2_000).with_id("t2"),
        ));
        data
    }

    #[test]
    fn test_metadata_matches_lengths() {
        let snapshot = Snapshot::new(ExportScope::All, sample_data());
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.metadata.total_accounts, 1);
        assert_eq!(snapshot.metadata.total_transactions, 2);
        assert_eq!(snapshot.metadata.total_goals, 0);
        assert!(SUPPORTED_VERSIONS.contains(&snapshot.version));
    }

    #[test]
    fn test_json_field_names() {
        let snapshot = Snapshot::new(ExportScope::Accounts, SnapshotData::default());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["scope"], "accounts");
        assert!(json["exportedAt"].is_string());
        assert!(json["data"]["goalContributions"].is_array());
        assert!(json["data"]["recurringPatterns"].is_array());
        assert_eq!(json["metadata"]["totalAccounts"], 0);
    }

    #[test]
    fn test_records_preserve_order() {
        let data = sample_data();
        let ids: Vec<_> = data
            .records(EntityKind::Transaction)
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert_eq!(data.total_records(), 3);
    }

    #[test]
    fn test_scope_includes() {
        assert!(ExportScope::All.includes(EntityKind::Goal));
        assert!(ExportScope::Accounts.includes(EntityKind::Account));
        assert!(!ExportScope::Accounts.includes(EntityKind::Transaction));
        assert_eq!(ExportScope::parse("Categories"), Some(ExportScope::Categories));
        assert_eq!(ExportScope::parse("bogus"), None);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(100, 200);
        assert!(range.contains(100));
        assert!(range.contains(200));
        assert!(!range.contains(99));
        assert!(!range.contains(201));
    }
}
