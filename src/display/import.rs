//! Import result display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::import::{ImportResult, ImportSummary, ValidationReport};
use crate::models::EntityKind;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Entity")]
    entity: &'static str,
    #[tabled(rename = "Added")]
    added: usize,
    #[tabled(rename = "Skipped")]
    skipped: usize,
}

fn summary_table(summary: &ImportSummary) -> String {
    let rows: Vec<SummaryRow> = summary
        .iter()
        .map(|(kind, counts)| SummaryRow {
            entity: kind.table(),
            added: counts.added,
            skipped: counts.skipped,
        })
        .collect();

    Table::new(rows)
        .with(Style::sharp())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

/// Format an import result: headline, per-table counts, then any errors
pub fn format_import_result(result: &ImportResult) -> String {
    let mut output = String::new();

    let headline = if result.success {
        format!("Import ({}) completed", result.mode)
    } else if result.is_partial() {
        format!(
            "Import ({}) completed with {} error(s)",
            result.mode,
            result.errors.len()
        )
    } else {
        format!("Import ({}) failed; no records were written", result.mode)
    };
    output.push_str(&headline);
    output.push('\n');

    if result.total_added() > 0 || result.summary.total_skipped() > 0 {
        output.push_str(&summary_table(&result.summary));
        output.push('\n');
        output.push_str(&format!(
            "Added {}, skipped {}\n",
            result.total_added(),
            result.summary.total_skipped()
        ));
    }

    if !result.errors.is_empty() {
        output.push_str("\nErrors:\n");
        for error in &result.errors {
            output.push_str(&format!("  {}\n", error));
        }
    }

    output
}

/// Format a dry-run validation report
pub fn format_validation_report(report: &ValidationReport) -> String {
    let mut output = String::new();

    output.push_str(&report.summary());
    output.push('\n');

    if report.encrypted {
        output.push_str("  Encrypted:   yes\n");
    }
    if let Some(exported_at) = &report.exported_at {
        output.push_str(&format!(
            "  Exported at: {}\n",
            exported_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    if report.valid {
        for kind in EntityKind::ALL {
            let count = report.counts.get(&kind).copied().unwrap_or(0);
            output.push_str(&format!("  {:<20} {:>6}\n", kind.collection(), count));
        }
    }

    for error in &report.errors {
        output.push_str(&format!("  {}\n", error));
    }

    output
}
