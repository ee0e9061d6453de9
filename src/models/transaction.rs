//! Transaction model
//!
//! A single movement of money on an account, optionally categorized and
//! optionally generated from a recurring pattern.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ids::generate_id;

fn default_transaction_type() -> String {
    "expense".to_string()
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: String,

    /// The account this transaction belongs to
    pub account_id: String,

    /// Category (None when uncategorized)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    /// Amount in account currency
    pub amount: f64,

    /// "income", "expense" or "transfer"
    #[serde(rename = "type", default = "default_transaction_type")]
    pub kind: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Transaction date (epoch millis)
    #[serde(default)]
    pub date: i64,

    /// Pattern this transaction was generated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_pattern_id: Option<String>,

    /// Creation time (epoch millis)
    #[serde(default)]
    pub created_at: i64,
}

impl Transaction {
    /// Create a new uncategorized expense on `account_id`
    pub fn new(account_id: impl Into<String>, amount: f64, date: i64) -> Self {
        Self {
            id: generate_id("txn"),
            account_id: account_id.into(),
            category_id: None,
            amount,
            kind: default_transaction_type(),
            description: String::new(),
            notes: None,
            date,
            recurring_pattern_id: None,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the category
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction() {
        let txn = Transaction::new("acc-1", -42.5, 1_700_000_000_000)
            .with_category("cat-1")
            .with_description("Coffee");
        assert_eq!(txn.account_id, "acc-1");
        assert_eq!(txn.category_id.as_deref(), Some("cat-1"));
        assert_eq!(txn.description, "Coffee");
        assert!(txn.id.starts_with("txn_"));
    }

    #[test]
    fn test_optional_references_omitted() {
        let txn = Transaction::new("acc-1", 10.0, 0).with_id("t1");
        let json = serde_json::to_value(&txn).unwrap();
        assert!(json.get("category_id").is_none());
        assert!(json.get("recurring_pattern_id").is_none());
        assert_eq!(json["type"], "expense");
    }
}
