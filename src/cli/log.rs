//! CLI command reading the audit log

use clap::Args;

use crate::audit::JsonlAuditLog;
use crate::config::ProcessAuditPaths;
use crate::display::{format_client_history, format_entry_list};
use crate::error::{AuditError, AuditResult};
use crate::models::ClientId;

/// Arguments of the `log` command
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub count: usize,

    /// Only show entries of this client (UUID)
    #[arg(short, long)]
    pub client: Option<String>,

    /// Show the client's history view instead of the log table
    #[arg(long, requires = "client")]
    pub history: bool,
}

/// Handle the `log` command
pub fn handle_log_command(paths: &ProcessAuditPaths, args: LogArgs) -> AuditResult<()> {
    let log = JsonlAuditLog::new(paths.audit_log());

    let Some(client) = &args.client else {
        let entries = log.read_recent(args.count)?;
        print!("{}", format_entry_list(&entries));
        println!();
        return Ok(());
    };

    let client_id: ClientId = client
        .parse()
        .map_err(|_| AuditError::Validation(format!("Invalid client ID: {}", client)))?;

    let mut entries = log.read_for_client(client_id)?;
    let start = entries.len().saturating_sub(args.count);
    entries.drain(..start);

    if args.history {
        print!("{}", format_client_history(&entries));
    } else {
        print!("{}", format_entry_list(&entries));
    }
    println!();

    Ok(())
}
