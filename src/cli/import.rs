//! CLI command for restoring backups
//!
//! Reads a backup file, confirms destructive replaces, and prints the
//! per-table outcome.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::audit::AuditEntry;
use crate::config::{PennywisePaths, Settings};
use crate::display::format_import_result;
use crate::error::{PennywiseError, PennywiseResult};
use crate::import::{ImportMode, ImportRequest, ImportService};
use crate::storage::EntityStore;

use super::{confirm, record_audit, resolve_password, CommandStatus, ModeArg};

/// Arguments of `pennywise import`
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Backup file (plain or encrypted JSON)
    pub file: PathBuf,

    /// Import mode; defaults to the file's own options, then to settings
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Replace without asking for confirmation
    #[arg(long)]
    pub force: bool,
}

/// Read and resolve a backup file into an import request
pub(crate) fn read_request(file: &PathBuf) -> PennywiseResult<ImportRequest> {
    let bytes = fs::read(file).map_err(|e| {
        PennywiseError::Import(format!("Failed to read {}: {}", file.display(), e))
    })?;
    ImportRequest::from_slice(&bytes)
}

/// Handle the import command
pub fn handle_import_command(
    store: &dyn EntityStore,
    paths: &PennywisePaths,
    settings: &Settings,
    args: ImportArgs,
) -> PennywiseResult<CommandStatus> {
    let mut request = read_request(&args.file)?;

    let mode = match args.mode {
        Some(mode) => mode.into(),
        None if request.legacy => settings.default_import_mode,
        None => request.mode(),
    };
    request = request.with_mode(mode);

    if mode == ImportMode::Replace && !args.force {
        let question = "Replace will delete all existing data before loading the backup. Continue?";
        if !confirm(question)? {
            println!("Import cancelled.");
            return Ok(CommandStatus::Success);
        }
    }

    let encrypted = request.payload.is_encrypted();
    if encrypted && request.options.password.is_none() {
        if let Some(password) = resolve_password(false)? {
            request = request.with_password(password);
        }
    }

    let result = ImportService::new(store).import(request);

    record_audit(
        paths,
        settings,
        &AuditEntry::import(&result, encrypted, Some(args.file.display().to_string())),
    );

    print!("{}", format_import_result(&result));

    let status = if result.success {
        CommandStatus::Success
    } else if result.is_client_error() {
        CommandStatus::ClientError
    } else {
        CommandStatus::Failed
    };
    Ok(status)
}
