//! CLI command comparing two process snapshots
//!
//! Prints the audit entries a workflow update produces and, with
//! `--publish`, appends them to the audit log.

use std::path::PathBuf;

use clap::Args;

use crate::audit::{AuditComposer, JsonlAuditLog, MonotonicClock, SystemClock};
use crate::config::{ProcessAuditPaths, Settings};
use crate::display::format_entry_details;
use crate::error::{AuditError, AuditResult};
use crate::models::{Actor, ClientId, EntityRefs, ProcessId, ProcessSnapshot, PropertyId};
use crate::registry::StepConfigRegistry;
use crate::services::{ProcessAuditService, ProcessUpdate};
use crate::storage::read_json_required;

use super::steps::ContextArgs;

/// Arguments of the `diff` command
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Snapshot before the update (JSON)
    #[arg(long)]
    pub before: PathBuf,

    /// Snapshot after the update (JSON)
    #[arg(long)]
    pub after: PathBuf,

    #[command(flatten)]
    pub context: ContextArgs,

    /// Client the process belongs to (UUID)
    #[arg(long)]
    pub client: String,

    /// Property of the process (UUID)
    #[arg(long)]
    pub property: Option<String>,

    /// Process identifier (UUID)
    #[arg(long)]
    pub process: Option<String>,

    /// ID of the user making the update
    #[arg(long, env = "PROCESS_AUDIT_ACTOR")]
    pub actor: String,

    /// Display name of the user (defaults to the ID)
    #[arg(long)]
    pub actor_name: Option<String>,

    /// Append the entries to the audit log
    #[arg(long)]
    pub publish: bool,

    /// Print entries as JSON
    #[arg(long)]
    pub json: bool,
}

impl DiffArgs {
    fn entity_refs(&self) -> AuditResult<EntityRefs> {
        let client: ClientId = parse_id(&self.client, "client")?;
        let mut refs = EntityRefs::client(client);

        if let Some(property) = &self.property {
            refs = refs.with_property(parse_id::<PropertyId>(property, "property")?);
        }
        if let Some(process) = &self.process {
            refs = refs.with_process(parse_id::<ProcessId>(process, "process")?);
        }

        Ok(refs)
    }

    fn update(&self) -> AuditResult<ProcessUpdate> {
        let before: ProcessSnapshot = read_json_required(&self.before)?;
        let after: ProcessSnapshot = read_json_required(&self.after)?;
        let display_name = self.actor_name.clone().unwrap_or_else(|| self.actor.clone());

        Ok(ProcessUpdate {
            before,
            after,
            context: self.context.resolve()?,
            actor: Actor::new(self.actor.clone(), display_name),
            entity_refs: self.entity_refs()?,
        })
    }
}

fn parse_id<T: std::str::FromStr>(value: &str, what: &str) -> AuditResult<T> {
    value
        .parse()
        .map_err(|_| AuditError::Validation(format!("Invalid {} ID: {}", what, value)))
}

/// Handle the `diff` command
pub fn handle_diff_command(
    paths: &ProcessAuditPaths,
    settings: &Settings,
    args: DiffArgs,
) -> AuditResult<()> {
    let registry = StepConfigRegistry::from_settings(settings, paths)?;
    let composer = AuditComposer::from_settings(settings)?;
    let clock = MonotonicClock::new(SystemClock);
    let log = JsonlAuditLog::new(paths.audit_log());
    let service = ProcessAuditService::new(&registry, &composer, &clock, &log);

    let update = args.update()?;
    let entries = if args.publish {
        service.record(&update)?
    } else {
        service.preview(&update)?
    };

    if args.json {
        let json = serde_json::to_string_pretty(&entries)?;
        println!("{}", json);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No auditable changes.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", format_entry_details(entry));
    }

    if args.publish {
        println!("Published {} entries to {}", entries.len(), log.path().display());
    } else {
        println!("{} entries (preview, use --publish to record)", entries.len());
    }

    Ok(())
}
