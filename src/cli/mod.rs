//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the export and import engines.

pub mod export;
pub mod history;
pub mod import;
pub mod inspect;

pub use export::{handle_export_command, ExportArgs};
pub use history::{handle_history_command, HistoryArgs};
pub use import::{handle_import_command, ImportArgs};
pub use inspect::{handle_inspect_command, InspectArgs};

use std::io::{self, BufRead, IsTerminal, Write};

use clap::ValueEnum;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::{PennywisePaths, Settings};
use crate::crypto::Password;
use crate::error::{PennywiseError, PennywiseResult};
use crate::import::ImportMode;

/// Environment variable holding the backup password
pub const PASSWORD_ENV: &str = "PENNYWISE_PASSWORD";

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// The input was rejected and nothing was written
    ClientError,
    Failed,
}

impl CommandStatus {
    /// Process exit status
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failed => 1,
            Self::ClientError => 2,
        }
    }

    /// Classify an error that escaped a handler
    pub fn from_error(err: &PennywiseError) -> Self {
        if err.is_validation() || err.is_decryption() {
            Self::ClientError
        } else {
            Self::Failed
        }
    }
}

/// Import mode argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Wipe every table, then load the backup
    Replace,
    /// Keep existing records and add what is new
    Merge,
}

impl From<ModeArg> for ImportMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Replace => ImportMode::Replace,
            ModeArg::Merge => ImportMode::Merge,
        }
    }
}

/// Read the password from `PENNYWISE_PASSWORD`, or prompt for it
///
/// Returns `None` when no password is set and stdin is not a terminal, so
/// the engines can report the missing password themselves.
pub(crate) fn resolve_password(confirm: bool) -> PennywiseResult<Option<Password>> {
    if let Ok(value) = std::env::var(PASSWORD_ENV) {
        if !value.is_empty() {
            return Ok(Some(Password::new(value)));
        }
    }

    if !io::stdin().is_terminal() {
        return Ok(None);
    }

    let password = prompt_password("Backup password: ")?;
    if confirm {
        let again = prompt_password("Confirm password: ")?;
        if password != again {
            return Err(PennywiseError::Validation("Passwords do not match".into()));
        }
    }
    Ok(Some(password))
}

fn prompt_password(prompt: &str) -> PennywiseResult<Password> {
    rpassword::prompt_password(prompt)
        .map(Password::new)
        .map_err(|e| PennywiseError::Io(format!("Failed to read password: {}", e)))
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no
pub(crate) fn confirm(question: &str) -> PennywiseResult<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Append an entry to the audit log when auditing is enabled
///
/// A failed audit write is logged and otherwise ignored.
pub(crate) fn record_audit(paths: &PennywisePaths, settings: &Settings, entry: &AuditEntry) {
    if !settings.audit_enabled {
        return;
    }
    if let Err(err) = AuditLogger::new(paths.audit_log()).log(entry) {
        tracing::warn!(error = %err, "failed to write audit entry");
    }
}
