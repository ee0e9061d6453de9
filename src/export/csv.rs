//! CSV export of the transaction set
//!
//! One row per transaction, newest first, with account and category ids
//! resolved to names. Quoting follows RFC 4180.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use chrono::DateTime;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{Account, Category, Transaction};

/// Column headers, in order
pub const CSV_HEADER: [&str; 7] = [
    "Date",
    "Description",
    "Amount",
    "Type",
    "Account",
    "Category",
    "Notes",
];

/// Date rendering used in the `Date` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYear,
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYear,
    #[serde(rename = "YYYY-MM-DD")]
    Iso,
}

impl DateFormat {
    /// Parse a format name; anything unrecognized falls back to `MM/DD/YYYY`
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "DD/MM/YYYY" => Self::DayMonthYear,
            "YYYY-MM-DD" => Self::Iso,
            _ => Self::MonthDayYear,
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            Self::MonthDayYear => "%m/%d/%Y",
            Self::DayMonthYear => "%d/%m/%Y",
            Self::Iso => "%Y-%m-%d",
        }
    }

    /// Format an epoch-millisecond timestamp (UTC)
    pub fn format(&self, millis: i64) -> String {
        DateTime::from_timestamp_millis(millis)
            .map(|dt| dt.format(self.pattern()).to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MonthDayYear => write!(f, "MM/DD/YYYY"),
            Self::DayMonthYear => write!(f, "DD/MM/YYYY"),
            Self::Iso => write!(f, "YYYY-MM-DD"),
        }
    }
}

fn csv_error(err: impl fmt::Display) -> PennywiseError {
    PennywiseError::Export(format!("Failed to write CSV: {}", err))
}

/// Render transactions as a CSV document
///
/// A dangling account reference renders as `Unknown`, a dangling or absent
/// category as an empty field.
pub fn render_transactions_csv(
    transactions: &[Transaction],
    accounts: &[Account],
    categories: &[Category],
    date_format: DateFormat,
) -> PennywiseResult<String> {
    let account_names: HashMap<&str, &str> = accounts
        .iter()
        .map(|a| (a.id.as_str(), a.name.as_str()))
        .collect();
    let category_names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut rows: Vec<&Transaction> = transactions.iter().collect();
    rows.sort_by_key(|t| Reverse(t.date));

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(csv_error)?;

    for txn in rows {
        let account = account_names
            .get(txn.account_id.as_str())
            .copied()
            .unwrap_or("Unknown");
        let category = txn
            .category_id
            .as_deref()
            .and_then(|id| category_names.get(id).copied())
            .unwrap_or("");

        writer
            .write_record([
                date_format.format(txn.date).as_str(),
                txn.description.as_str(),
                format!("{:.2}", txn.amount).as_str(),
                txn.kind.as_str(),
                account,
                category,
                txn.notes.as_deref().unwrap_or(""),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}
