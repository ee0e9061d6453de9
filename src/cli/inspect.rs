//! CLI command for checking a backup without importing it

use std::path::PathBuf;

use clap::Args;

use crate::audit::AuditEntry;
use crate::config::{PennywisePaths, Settings};
use crate::display::format_validation_report;
use crate::error::PennywiseResult;
use crate::import::ImportService;
use crate::storage::EntityStore;

use super::import::read_request;
use super::{record_audit, resolve_password, CommandStatus};

/// Arguments of `pennywise inspect`
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Backup file to check
    pub file: PathBuf,
}

/// Handle the inspect command
pub fn handle_inspect_command(
    store: &dyn EntityStore,
    paths: &PennywisePaths,
    settings: &Settings,
    args: InspectArgs,
) -> PennywiseResult<CommandStatus> {
    let mut request = read_request(&args.file)?;

    if request.payload.is_encrypted() && request.options.password.is_none() {
        if let Some(password) = resolve_password(false)? {
            request = request.with_password(password);
        }
    }

    let report = ImportService::new(store).validate(&request);
    record_audit(
        paths,
        settings,
        &AuditEntry::validate(&report, Some(args.file.display().to_string())),
    );

    print!("{}", format_validation_report(&report));

    if report.valid {
        Ok(CommandStatus::Success)
    } else {
        Ok(CommandStatus::ClientError)
    }
}
