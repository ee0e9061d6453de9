//! Recurring transaction patterns

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ids::generate_id;

fn default_pattern_type() -> String {
    "expense".to_string()
}

fn default_frequency() -> String {
    "monthly".to_string()
}

fn default_true() -> bool {
    true
}

/// A detected or user-defined recurring transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringPattern {
    /// Unique identifier
    pub id: String,

    /// Description shared by matching transactions
    #[serde(default)]
    pub description: String,

    /// Typical amount
    #[serde(default)]
    pub amount: f64,

    /// "income" or "expense"
    #[serde(rename = "type", default = "default_pattern_type")]
    pub kind: String,

    /// weekly, biweekly, monthly, yearly
    #[serde(default = "default_frequency")]
    pub frequency: String,

    /// Next expected occurrence (epoch millis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_date: Option<i64>,

    /// Whether the pattern is still tracked
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Creation time (epoch millis)
    #[serde(default)]
    pub created_at: i64,
}

impl RecurringPattern {
    /// Create a new monthly expense pattern
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        Self {
            id: generate_id("rp"),
            description: description.into(),
            amount,
            kind: default_pattern_type(),
            frequency: default_frequency(),
            next_date: None,
            is_active: true,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}
