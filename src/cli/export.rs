//! CLI command for audit log export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, ValueEnum};

use crate::audit::JsonlAuditLog;
use crate::config::ProcessAuditPaths;
use crate::error::{AuditError, AuditResult};
use crate::export::{export_entries_csv, export_entries_json, export_entries_yaml, AuditExport};
use crate::models::ClientId;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (one row per entry)
    Csv,
    /// JSON format (full entries)
    Json,
    /// YAML format (full entries, human-readable)
    Yaml,
}

/// Arguments of the `export` command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only export entries of this client (UUID)
    #[arg(short, long)]
    pub client: Option<String>,
}

/// Handle the `export` command
pub fn handle_export_command(paths: &ProcessAuditPaths, args: ExportArgs) -> AuditResult<()> {
    let log = JsonlAuditLog::new(paths.audit_log());

    let entries = match &args.client {
        Some(client) => {
            let client_id: ClientId = client
                .parse()
                .map_err(|_| AuditError::Validation(format!("Invalid client ID: {}", client)))?;
            log.read_for_client(client_id)?
        }
        None => log.read_all()?,
    };
    let count = entries.len();

    let mut writer: BufWriter<Box<dyn Write>> = match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                AuditError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            BufWriter::new(Box::new(file))
        }
        None => BufWriter::new(Box::new(std::io::stdout())),
    };

    match args.format {
        ExportFormat::Csv => export_entries_csv(&entries, &mut writer)?,
        ExportFormat::Json => {
            export_entries_json(&AuditExport::new(entries, Utc::now()), &mut writer)?
        }
        ExportFormat::Yaml => {
            export_entries_yaml(&AuditExport::new(entries, Utc::now()), &mut writer)?
        }
    }

    writer
        .flush()
        .map_err(|e| AuditError::Export(format!("Failed to flush export: {}", e)))?;

    if let Some(path) = &args.output {
        eprintln!("Exported {} entries to {}", count, path.display());
    }

    Ok(())
}
