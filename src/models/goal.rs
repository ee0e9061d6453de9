//! Savings goals and the contributions made towards them

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ids::generate_id;

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Amount to reach
    #[serde(default)]
    pub target_amount: f64,

    /// Amount saved so far
    #[serde(default)]
    pub current_amount: f64,

    /// Target date (epoch millis)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<i64>,

    /// Creation time (epoch millis)
    #[serde(default)]
    pub created_at: i64,
}

impl Goal {
    /// Create a new goal with nothing saved yet
    pub fn new(name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            id: generate_id("goal"),
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            deadline: None,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// A single payment into a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalContribution {
    /// Unique identifier
    pub id: String,

    /// Goal receiving the contribution
    pub goal_id: String,

    /// Amount contributed
    #[serde(default)]
    pub amount: f64,

    /// Contribution date (epoch millis)
    #[serde(default)]
    pub date: i64,

    /// Notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation time (epoch millis)
    #[serde(default)]
    pub created_at: i64,
}

impl GoalContribution {
    /// Create a new contribution to `goal_id`
    pub fn new(goal_id: impl Into<String>, amount: f64, date: i64) -> Self {
        Self {
            id: generate_id("gc"),
            goal_id: goal_id.into(),
            amount,
            date,
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
    fn test_new_goal_and_contribution_are_stamped_now() {
        let before = Utc::now().timestamp_millis();
        let goal = Goal::new("Vacation", 2000.0);
        let contribution = GoalContribution::new(&goal.id, 150.0, 1_708_387_200_000);

        assert!(goal.created_at >= before);
        assert_eq!(goal.current_amount, 0.0);
        assert!(contribution.created_at >= before);
        assert_ne!(contribution.created_at, contribution.date);
        assert_eq!(contribution.goal_id, goal.id);
    }
}
