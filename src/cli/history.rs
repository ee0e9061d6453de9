//! CLI command for showing recent audit entries

use clap::Args;

use crate::audit::AuditLogger;
use crate::config::PennywisePaths;
use crate::error::PennywiseResult;

use super::CommandStatus;

/// Arguments of `pennywise history`
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value = "10")]
    pub limit: usize,
}

/// Handle the history command
pub fn handle_history_command(
    paths: &PennywisePaths,
    args: HistoryArgs,
) -> PennywiseResult<CommandStatus> {
    let logger = AuditLogger::new(paths.audit_log());
    let entries = logger.read_recent(args.limit)?;

    if entries.is_empty() {
        println!("No exports or imports recorded yet.");
        return Ok(CommandStatus::Success);
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(CommandStatus::Success)
}
