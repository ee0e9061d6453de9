//! Budget model
//!
//! A spending limit for one category over a period.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ids::generate_id;

fn default_period() -> String {
    "monthly".to_string()
}

/// A category budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: String,

    /// Budgeted category
    pub category_id: String,

    /// Limit for the period
    #[serde(default)]
    pub amount: f64,

    /// weekly, monthly or yearly
    #[serde(default = "default_period")]
    pub period: String,

    /// First day of the budget (epoch millis)
    #[serde(default)]
    pub start_date: i64,

    /// Creation time (epoch millis)
    #[serde(default)]
    pub created_at: i64,
}

impl Budget {
    /// Create a new monthly budget for a category
    pub fn new(category_id: impl Into<String>, amount: f64, start_date: i64) -> Self {
        Self {
            id: generate_id("bud"),
            category_id: category_id.into(),
            amount,
            period: default_period(),
            start_date,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}
