//! Category model
//!
//! Categories classify transactions, bills and budgets as income or expense.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ids::generate_id;

fn default_category_type() -> String {
    "expense".to_string()
}

/// A spending or income category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// "income" or "expense"
    #[serde(rename = "type", default = "default_category_type")]
    pub kind: String,

    /// Display color (hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Icon name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Creation time (epoch millis)
    #[serde(default)]
    pub created_at: i64,
}

impl Category {
    /// Create a new expense category
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id("cat"),
            name: name.into(),
            kind: default_category_type(),
            color: None,
            icon: None,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}
