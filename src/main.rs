use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use process_audit::cli::{
    handle_diff_command, handle_export_command, handle_log_command, handle_steps_command,
    ContextArgs, DiffArgs, ExportArgs, LogArgs,
};
use process_audit::config::{ProcessAuditPaths, Settings};
use process_audit::storage::initialize_storage;

#[derive(Parser)]
#[command(
    name = "process-audit",
    version,
    about = "Audit trail for multi-step client closing processes",
    long_about = "process-audit compares two snapshots of a client's closing process, \
                  classifies every step change and records a narrative together with a \
                  structured payload for each of them in an append-only audit log."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory with default settings and step catalog
    Init,

    /// Show current configuration and paths
    Config,

    /// List the process steps and their numbering under a financial context
    Steps(ContextArgs),

    /// Compare two process snapshots and show (or publish) the audit entries
    Diff(DiffArgs),

    /// Show the audit log
    Log(LogArgs),

    /// Export the audit log
    Export(ExportArgs),
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ProcessAuditPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings);

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing process-audit at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Settings:     {}", paths.settings_file().display());
            println!("Step catalog: {}", paths.catalog_file().display());
            println!();
            println!("Run 'process-audit steps' to see the process steps.");
        }
        Some(Commands::Config) => {
            println!("process-audit Configuration");
            println!("===========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Date format:      {}", settings.date_format);
            println!("  Sequence step:    {} ms", settings.sequence_step_ms);
            println!(
                "  Step catalog:     {}",
                settings
                    .resolved_catalog_file(&paths)
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "built-in".to_string())
            );
            println!("  Log filter:       {}", settings.log_filter);
        }
        Some(Commands::Steps(args)) => handle_steps_command(&paths, &settings, args)?,
        Some(Commands::Diff(args)) => handle_diff_command(&paths, &settings, args)?,
        Some(Commands::Log(args)) => handle_log_command(&paths, args)?,
        Some(Commands::Export(args)) => handle_export_command(&paths, args)?,
        None => {
            println!("process-audit - audit trail for client closing processes");
            println!();
            println!("Run 'process-audit --help' for usage information.");
        }
    }

    Ok(())
}
