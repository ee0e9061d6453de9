//! Account model
//!
//! Represents financial accounts (checking, savings, credit cards, etc.)

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ids::generate_id;

fn default_account_type() -> String {
    "checking".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_true() -> bool {
    true
}

/// A financial account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: String,

    /// Account name (e.g., "Chase Checking")
    pub name: String,

    /// Type of account (checking, savings, credit, cash, investment)
    #[serde(rename = "type", default = "default_account_type")]
    pub account_type: String,

    /// Current balance
    #[serde(default)]
    pub balance: f64,

    /// ISO currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Bank or institution holding the account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    /// Whether this account is still in use
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Creation time (epoch millis)
    #[serde(default)]
    pub created_at: i64,

    /// Last modification time (epoch millis)
    #[serde(default)]
    pub updated_at: i64,
}

impl Account {
    /// Create a new account with default values
    pub fn new(name: impl Into<String>, account_type: impl Into<String>) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            id: generate_id("acc"),
            name: name.into(),
            account_type: account_type.into(),
            balance: 0.0,
            currency: default_currency(),
            institution: None,
            is_active: true,
            created_at: now,
            updated_at: now,
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
    fn test_new_account() {
        let account = Account::new("Checking", "checking");
        assert_eq!(account.name, "Checking");
        assert!(account.id.starts_with("acc_"));
        assert!(account.is_active);
        assert_eq!(account.currency, "USD");
    }

    #[test]
    fn test_type_field_is_renamed() {
        let account = Account::new("Visa", "credit").with_id("acc-1");
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["type"], "credit");
        assert!(json.get("institution").is_none());
    }

    #[test]
    fn test_defaults_on_decode() {
        let account: Account =
            serde_json::from_str(r#"{"id":"a1","name":"Wallet"}"#).unwrap();
        assert_eq!(account.account_type, "checking");
        assert!(account.is_active);
        assert_eq!(account.balance, 0.0);
    }
}
