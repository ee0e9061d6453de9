//! Entity kinds and the record union
//!
//! `EntityKind` names the eight tables the backup engine moves around and
//! carries the orderings that keep soft foreign keys satisfied. `Record`
//! wraps one typed row so stores and strategies can treat all tables alike.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    Account, Bill, Budget, Category, Goal, GoalContribution, RecurringPattern, Transaction,
};

/// The eight entity collections of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Account,
    Category,
    Transaction,
    Bill,
    Budget,
    Goal,
    GoalContribution,
    RecurringPattern,
}

impl EntityKind {
    /// Every kind, in snapshot field order
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Account,
        EntityKind::Category,
        EntityKind::Transaction,
        EntityKind::Bill,
        EntityKind::Goal,
        EntityKind::GoalContribution,
        EntityKind::Budget,
        EntityKind::RecurringPattern,
    ];

    /// Children before parents
    pub const DELETE_ORDER: [EntityKind; 8] = [
        EntityKind::GoalContribution,
        EntityKind::Goal,
        EntityKind::Budget,
        EntityKind::Bill,
        EntityKind::Transaction,
        EntityKind::RecurringPattern,
        EntityKind::Category,
        EntityKind::Account,
    ];

    /// Parents before children, used when merging
    pub const MERGE_ORDER: [EntityKind; 8] = [
        EntityKind::Category,
        EntityKind::Account,
        EntityKind::RecurringPattern,
        EntityKind::Transaction,
        EntityKind::Bill,
        EntityKind::Budget,
        EntityKind::Goal,
        EntityKind::GoalContribution,
    ];

    /// Parents before children, used when replacing (reverse of `DELETE_ORDER`)
    pub fn insert_order() -> impl Iterator<Item = EntityKind> {
        Self::DELETE_ORDER.into_iter().rev()
    }

    /// Relational table name
    pub fn table(&self) -> &'static str {
        match self {
            Self::Account => "accounts",
            Self::Category => "categories",
            Self::Transaction => "transactions",
            Self::Bill => "bills",
            Self::Budget => "budgets",
            Self::Goal => "goals",
            Self::GoalContribution => "goal_contributions",
            Self::RecurringPattern => "recurring_patterns",
        }
    }

    /// Field name of the collection inside `Snapshot.data`
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Account => "accounts",
            Self::Category => "categories",
            Self::Transaction => "transactions",
            Self::Bill => "bills",
            Self::Budget => "budgets",
            Self::Goal => "goals",
            Self::GoalContribution => "goalContributions",
            Self::RecurringPattern => "recurringPatterns",
        }
    }

    /// Singular label used in error entries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Category => "category",
            Self::Transaction => "transaction",
            Self::Bill => "bill",
            Self::Budget => "budget",
            Self::Goal => "goal",
            Self::GoalContribution => "goal_contribution",
            Self::RecurringPattern => "recurring_pattern",
        }
    }

    /// Human-readable name, as used in storage errors
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Category => "Category",
            Self::Transaction => "Transaction",
            Self::Bill => "Bill",
            Self::Budget => "Budget",
            Self::Goal => "Goal",
            Self::GoalContribution => "Goal contribution",
            Self::RecurringPattern => "Recurring pattern",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A soft foreign key present on a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'a> {
    /// Field holding the reference (e.g. `account_id`)
    pub field: &'static str,
    /// Kind of the referenced parent
    pub target: EntityKind,
    /// Referenced id
    pub id: &'a str,
}

impl<'a> Reference<'a> {
    fn new(field: &'static str, target: EntityKind, id: &'a str) -> Self {
        Self { field, target, id }
    }
}

/// One row of any of the eight tables
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Account(Account),
    Category(Category),
    Transaction(Transaction),
    Bill(Bill),
    Budget(Budget),
    Goal(Goal),
    GoalContribution(GoalContribution),
    RecurringPattern(RecurringPattern),
}

impl Record {
    /// The table this record belongs to
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Account(_) => EntityKind::Account,
            Self::Category(_) => EntityKind::Category,
            Self::Transaction(_) => EntityKind::Transaction,
            Self::Bill(_) => EntityKind::Bill,
            Self::Budget(_) => EntityKind::Budget,
            Self::Goal(_) => EntityKind::Goal,
            Self::GoalContribution(_) => EntityKind::GoalContribution,
            Self::RecurringPattern(_) => EntityKind::RecurringPattern,
        }
    }

    /// Primary key
    pub fn id(&self) -> &str {
        match self {
            Self::Account(r) => &r.id,
            Self::Category(r) => &r.id,
            Self::Transaction(r) => &r.id,
            Self::Bill(r) => &r.id,
            Self::Budget(r) => &r.id,
            Self::Goal(r) => &r.id,
            Self::GoalContribution(r) => &r.id,
            Self::RecurringPattern(r) => &r.id,
        }
    }

    /// Parent references carried by this record; absent optional references
    /// are not listed
    pub fn references(&self) -> Vec<Reference<'_>> {
        let mut refs = Vec::new();
        match self {
            Self::Transaction(t) => {
                refs.push(Reference::new("account_id", EntityKind::Account, &t.account_id));
                if let Some(id) = &t.category_id {
                    refs.push(Reference::new("category_id", EntityKind::Category, id));
                }
                if let Some(id) = &t.recurring_pattern_id {
                    refs.push(Reference::new(
                        "recurring_pattern_id",
                        EntityKind::RecurringPattern,
                        id,
                    ));
                }
            }
            Self::Bill(b) => {
                if let Some(id) = &b.account_id {
                    refs.push(Reference::new("account_id", EntityKind::Account, id));
                }
                if let Some(id) = &b.category_id {
                    refs.push(Reference::new("category_id", EntityKind::Category, id));
                }
            }
            Self::Budget(b) => {
                refs.push(Reference::new("category_id", EntityKind::Category, &b.category_id));
            }
            Self::GoalContribution(c) => {
                refs.push(Reference::new("goal_id", EntityKind::Goal, &c.goal_id));
            }
            Self::Account(_) | Self::Category(_) | Self::Goal(_) | Self::RecurringPattern(_) => {}
        }
        refs
    }
}

macro_rules! impl_from_record {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Record {
                fn from(value: $variant) -> Self {
                    Record::$variant(value)
                }
            }
        )*
    };
}

impl_from_record!(
    Account,
    Category,
    Transaction,
    Bill,
    Budget,
    Goal,
    GoalContribution,
    RecurringPattern,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn created_at(record: &Record) -> i64 {
        match record {
            Record::Account(r) => r.created_at,
            Record::Category(r) => r.created_at,
            Record::Transaction(r) => r.created_at,
            Record::Bill(r) => r.created_at,
            Record::Budget(r) => r.created_at,
            Record::Goal(r) => r.created_at,
            Record::GoalContribution(r) => r.created_at,
            Record::RecurringPattern(r) => r.created_at,
        }
    }

    #[test]
    fn test_every_builder_stamps_creation_time() {
        let before = chrono::Utc::now().timestamp_millis();
        let records: Vec<Record> = vec![
            Account::new("Checking", "checking").into(),
            Category::new("Groceries").into(),
            Transaction::new("acc-1", -5.0, 0).into(),
            Bill::new("Rent", 1200.0, 0).into(),
            Budget::new("cat-1", 400.0, 0).into(),
            Goal::new("Vacation", 2000.0).into(),
            GoalContribution::new("goal-1", 150.0, 0).into(),
            RecurringPattern::new("Rent", -1200.0).into(),
        ];
        for record in &records {
            assert!(created_at(record) >= before, "{:?}", record.kind());
        }
    }

    #[test]
    fn test_delete_order_is_children_first() {
        let pos = |kind| {
            EntityKind::DELETE_ORDER
                .iter()
                .position(|k| *k == kind)
                .unwrap()
        };
        assert!(pos(EntityKind::GoalContribution) < pos(EntityKind::Goal));
        assert!(pos(EntityKind::Transaction) < pos(EntityKind::Account));
        assert!(pos(EntityKind::Budget) < pos(EntityKind::Category));
        assert!(pos(EntityKind::Transaction) < pos(EntityKind::RecurringPattern));
    }

    #[test]
    fn test_insert_order_reverses_delete_order() {
        let order: Vec<_> = EntityKind::insert_order().collect();
        assert_eq!(order.first(), Some(&EntityKind::Account));
        assert_eq!(order.last(), Some(&EntityKind::GoalContribution));
        assert_eq!(order.len(), 8);
    }

    #[test]
    fn test_names() {
        assert_eq!(EntityKind::GoalContribution.table(), "goal_contributions");
        assert_eq!(EntityKind::GoalContribution.collection(), "goalContributions");
        assert_eq!(EntityKind::RecurringPattern.as_str(), "recurring_pattern");
    }

    #[test]
    fn test_transaction_references() {
        let txn = Transaction::new("acc-1", 5.0, 0).with_category("cat-1");
        let record = Record::from(txn);
        let refs = record.references();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].field, "account_id");
        assert_eq!(refs[0].target, EntityKind::Account);
        assert_eq!(refs[1].id, "cat-1");
    }

    #[test]
    fn test_parentless_records_have_no_references() {
        let record = Record::from(Account::new("Checking", "checking"));
        assert!(record.references().is_empty());
        assert_eq!(record.kind(), EntityKind::Account);
    }
}
