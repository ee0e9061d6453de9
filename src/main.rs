use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pennywise::cli::{
    handle_export_command, handle_history_command, handle_import_command,
    handle_inspect_command, CommandStatus, ExportArgs, HistoryArgs, ImportArgs, InspectArgs,
};
use pennywise::config::{PennywisePaths, Settings};
use pennywise::storage::SqliteStore;

/// Environment variable holding the tracing filter
const LOG_ENV: &str = "PENNYWISE_LOG";

#[derive(Parser)]
#[command(
    name = "pennywise",
    version,
    about = "Backup, restore and export for your personal finance data",
    long_about = "Pennywise exports your accounts, transactions, budgets and goals \
                  to versioned JSON snapshots (optionally encrypted) or CSV, and \
                  restores them by replacing or merging into the local database."
)]
struct Cli {
    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory, database and settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Export a backup or a transactions CSV
    Export(ExportArgs),

    /// Restore a backup into the database
    #[command(alias = "restore")]
    Import(ImportArgs),

    /// Check a backup file without importing it
    #[command(alias = "validate")]
    Inspect(InspectArgs),

    /// Show recent exports and imports
    History(HistoryArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pennywise=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("pennywise=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = PennywisePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let outcome = match cli.command {
        Some(Commands::Init) => {
            if paths.is_initialized() {
                println!(
                    "Pennywise is already initialized at: {}",
                    paths.base_dir().display()
                );
                println!("Checking the database schema...");
            } else {
                println!("Initializing Pennywise at: {}", paths.base_dir().display());
            }
            paths.ensure_directories()?;
            SqliteStore::open(&paths.database_file())?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'pennywise export <file>' to write your first backup.");
            Ok(CommandStatus::Success)
        }
        Some(Commands::Config) => {
            println!("Pennywise Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Database:         {}", paths.database_file().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!();
            println!("Settings:");
            println!("  CSV date format:     {}", settings.date_format);
            println!("  Default import mode: {}", settings.default_import_mode);
            println!("  Pretty JSON:         {}", settings.pretty_json);
            println!("  Audit log enabled:   {}", settings.audit_enabled);
            Ok(CommandStatus::Success)
        }
        Some(Commands::History(args)) => handle_history_command(&paths, args),
        Some(Commands::Export(args)) => {
            paths.ensure_directories()?;
            let store = SqliteStore::open(&paths.database_file())?;
            handle_export_command(&store, &paths, &settings, args)
        }
        Some(Commands::Import(args)) => {
            paths.ensure_directories()?;
            let store = SqliteStore::open(&paths.database_file())?;
            handle_import_command(&store, &paths, &settings, args)
        }
        Some(Commands::Inspect(args)) => {
            paths.ensure_directories()?;
            let store = SqliteStore::open(&paths.database_file())?;
            handle_inspect_command(&store, &paths, &settings, args)
        }
        None => {
            println!("Pennywise - backup and restore for your finance data");
            println!();
            println!("Run 'pennywise --help' for usage information.");
            Ok(CommandStatus::Success)
        }
    };

    let status = match outcome {
        Ok(status) => status,
        Err(err) => {
            eprintln!("Error: {}", err);
            CommandStatus::from_error(&err)
        }
    };

    if status != CommandStatus::Success {
        std::process::exit(status.exit_code());
    }
    Ok(())
}
