//! CLI command for exporting backups
//!
//! Writes a JSON snapshot (optionally encrypted) or a transactions CSV.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Args, ValueEnum};

use crate::audit::AuditEntry;
use crate::config::{PennywisePaths, Settings};
use crate::error::{PennywiseError, PennywiseResult};
use crate::export::{ExportFormat, ExportOptions, ExportOutput, ExportService};
use crate::models::{DateRange, ExportScope};
use crate::storage::EntityStore;

use super::{record_audit, resolve_password, CommandStatus};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// Versioned JSON snapshot
    Json,
    /// Transactions only, one row per transaction
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

/// Collections included in a JSON export
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    All,
    Transactions,
    Accounts,
    Categories,
}

impl From<ScopeArg> for ExportScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::All => ExportScope::All,
            ScopeArg::Transactions => ExportScope::Transactions,
            ScopeArg::Accounts => ExportScope::Accounts,
            ScopeArg::Categories => ExportScope::Categories,
        }
    }
}

/// Arguments of `pennywise export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file, or a directory to write a dated backup into
    pub output: PathBuf,

    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: FormatArg,

    /// Collections to include
    #[arg(short, long, value_enum, default_value = "all")]
    pub scope: ScopeArg,

    /// Only include transactions on or after this day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Only include transactions on or before this day (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Encrypt the backup (password from PENNYWISE_PASSWORD or a prompt)
    #[arg(short, long)]
    pub encrypt: bool,

    /// CSV date column format (MM/DD/YYYY, DD/MM/YYYY or YYYY-MM-DD)
    #[arg(long)]
    pub date_format: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Handle the export command
pub fn handle_export_command(
    store: &dyn EntityStore,
    paths: &PennywisePaths,
    settings: &Settings,
    args: ExportArgs,
) -> PennywiseResult<CommandStatus> {
    let date_range = parse_range(args.from.as_deref(), args.to.as_deref())?;
    let password = if args.encrypt {
        resolve_password(true)?
    } else {
        None
    };

    let options = ExportOptions {
        format: args.format.into(),
        scope: args.scope.into(),
        date_range,
        encrypted: args.encrypt,
        password,
        date_format: Some(
            args.date_format
                .unwrap_or_else(|| settings.date_format.to_string()),
        ),
    };

    let output = ExportService::new(store).export(&options)?;
    let target = resolve_target(&args.output, &output);
    let bytes = output.to_bytes(settings.pretty_json || args.pretty)?;

    fs::write(&target, &bytes).map_err(|e| {
        PennywiseError::Export(format!("Failed to write {}: {}", target.display(), e))
    })?;

    let records = match &output {
        ExportOutput::Json(snapshot) => snapshot.data.total_records(),
        _ => 0,
    };
    let format = match options.format {
        ExportFormat::Json => "json",
        ExportFormat::Csv => "csv",
    };

    record_audit(
        paths,
        settings,
        &AuditEntry::export(
            options.scope,
            format,
            records,
            output.is_encrypted(),
            Some(target.display().to_string()),
        ),
    );

    if output.is_encrypted() {
        println!("Exported encrypted backup to: {}", target.display());
    } else {
        println!("Exported {} to: {}", format.to_uppercase(), target.display());
    }
    println!("  Size: {} bytes", bytes.len());
    if records > 0 {
        println!("  Records: {}", records);
    }

    Ok(CommandStatus::Success)
}

/// A directory target receives the suggested dated filename
fn resolve_target(output: &Path, artifact: &ExportOutput) -> PathBuf {
    if output.is_dir() {
        output.join(artifact.suggested_filename(Utc::now().date_naive()))
    } else {
        output.to_path_buf()
    }
}

fn parse_day(value: &str) -> PennywiseResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        PennywiseError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value))
    })
}

fn start_of_day(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Build an inclusive range from optional day bounds; `to` covers its whole day
fn parse_range(from: Option<&str>, to: Option<&str>) -> PennywiseResult<Option<DateRange>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }

    let start = match from {
        Some(day) => start_of_day(parse_day(day)?),
        None => i64::MIN,
    };
    let end = match to {
        Some(day) => start_of_day(parse_day(day)?) + DAY_MILLIS - 1,
        None => i64::MAX,
    };

    if start > end {
        return Err(PennywiseError::Validation(
            "--from must not be after --to".to_string(),
        ));
    }
    Ok(Some(DateRange::new(start, end)))
}
