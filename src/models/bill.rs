//! Bill model
//!
//! Upcoming or recurring obligations, optionally tied to an account and a
//! category.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ids::generate_id;

fn default_frequency() -> String {
    "monthly".to_string()
}

/// A bill to be paid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier
    pub id: String,

    /// Display name (e.g., "Rent")
    pub name: String,

    /// Amount due
    #[serde(default)]
    pub amount: f64,

    /// Due date (epoch millis)
    #[serde(default)]
    pub due_date: i64,

    /// once, weekly, monthly, yearly
    #[serde(default = "default_frequency")]
    pub frequency: String,

    /// Account the bill is paid from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    /// Category the bill is booked against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    /// Whether the current occurrence has been paid
    #[serde(default)]
    pub is_paid: bool,

    /// Notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation time (epoch millis)
    #[serde(default)]
    pub created_at: i64,
}

impl Bill {
    /// Create a new monthly bill
    pub fn new(name: impl Into<String>, amount: f64, due_date: i64) -> Self {
        Self {
            id: generate_id("bill"),
            name: name.into(),
            amount,
            due_date,
            frequency: default_frequency(),
            account_id: None,
            category_id: None,
            is_paid: false,
            notes: None,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bill_is_stamped_now() {
        let before = Utc::now().timestamp_millis();
        let bill = Bill::new("Rent", 1200.0, 1_710_028_800_000);
        assert!(bill.id.starts_with("bill_"));
        assert!(bill.created_at >= before);
        assert_ne!(bill.created_at, bill.due_date);
        assert_eq!(bill.frequency, "monthly");
    }
}
