//! Audit entry display formatting
//!
//! Formats audit entries for the administrative log and the per-client
//! history. Both views read the structured payload; narrative text is only
//! shown verbatim in the detail view.

use crate::audit::payload::{PayloadEvidence, PayloadType, StructuredChangePayload};
use crate::audit::AuditLogEntry;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Format entries as the administrative log table
pub fn format_entry_list(entries: &[AuditLogEntry]) -> String {
    if entries.is_empty() {
        return "No audit entries found.".to_string();
    }

    let actor_width = entries
        .iter()
        .map(|e| e.actor.display_name.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    let type_width = entries
        .iter()
        .map(|e| e.change_type().to_string().len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<23}  {:<actor_width$}  {:<12}  {:<type_width$}  {}\n",
        "Timestamp",
        "Actor",
        "Client",
        "Type",
        "Step",
        actor_width = actor_width,
        type_width = type_width,
    ));

    output.push_str(&format!(
        "{:-<23}  {:-<actor_width$}  {:-<12}  {:-<type_width$}  {:-<20}\n",
        "",
        "",
        "",
        "",
        "",
        actor_width = actor_width,
        type_width = type_width,
    ));

    for entry in entries {
        let step = &entry.structured_payload.step;
        output.push_str(&format!(
            "{:<23}  {:<actor_width$}  {:<12}  {:<type_width$}  {} ({}/{})\n",
            entry.sequence_timestamp.format(TIMESTAMP_FORMAT).to_string(),
            entry.actor.display_name,
            entry.entity_refs.client_id.to_string(),
            entry.change_type().to_string(),
            step.name,
            step.number,
            step.total,
            actor_width = actor_width,
            type_width = type_width,
        ));
    }

    output.push_str(&format!("\nTotal: {} entries\n", entries.len()));
    output
}

/// Format the history of one client, one line per change
pub fn format_client_history(entries: &[AuditLogEntry]) -> String {
    if entries.is_empty() {
        return "No history for this client.".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!(
            "{}  {}\n",
            entry.sequence_timestamp.format("%Y-%m-%d"),
            summarize(&entry.structured_payload)
        ));
    }

    output
}

/// One-line summary of a payload
pub fn summarize(payload: &StructuredChangePayload) -> String {
    let step = &payload.step;
    let dates = &payload.dates;
    let metadata = &payload.metadata;

    match payload.change_type {
        PayloadType::Completion => match dates.after {
            Some(after) => format!("{} completed on {}", step.name, after.format("%Y-%m-%d")),
            None => format!("{} completed", step.name),
        },
        PayloadType::DateEdit => format!(
            "{} completion date moved {}{}",
            step.name,
            date_range(payload),
            metadata
                .date_direction
                .map(|d| format!(" ({})", d))
                .unwrap_or_default()
        ),
        PayloadType::Reopening => {
            let mut changed = Vec::new();
            if metadata.flags.has_date_change {
                changed.push(format!("date {}", date_range(payload)));
            }
            if metadata.flags.has_evidence_change {
                let count = metadata.replaced_evidences.len()
                    + metadata.updated_evidences.len()
                    + metadata.added_evidences.len()
                    + metadata.removed_evidences.len();
                changed.push(format!("{} evidence change(s)", count));
            }

            format!(
                "{} reopened ({}) and completed again: {}",
                step.name,
                metadata.reopening_reason.as_deref().unwrap_or("no reason given"),
                changed.join(", ")
            )
        }
        PayloadType::Unknown => format!("{} updated", step.name),
    }
}

fn date_range(payload: &StructuredChangePayload) -> String {
    let day = |date: Option<chrono::DateTime<chrono::Utc>>| {
        date.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "?".to_string())
    };
    format!(
        "{} -> {}",
        day(payload.dates.before),
        day(payload.dates.after)
    )
}

/// Format a single entry's details
pub fn format_entry_details(entry: &AuditLogEntry) -> String {
    let payload = &entry.structured_payload;
    let step = &payload.step;

    let mut output = String::new();

    output.push_str(&format!("Change: {}\n", payload.change_type));
    output.push_str(&format!(
        "  Step:           {} ({}/{})\n",
        step.name, step.number, step.total
    ));
    output.push_str(&format!("  Step Key:       {}\n", step.key));
    output.push_str(&format!(
        "  Recorded:       {}\n",
        entry.sequence_timestamp.format(TIMESTAMP_FORMAT)
    ));
    output.push_str(&format!(
        "  Actor:          {} ({})\n",
        entry.actor.display_name, entry.actor.id
    ));
    output.push_str(&format!("  Client:         {}\n", entry.entity_refs.client_id));

    if let Some(property_id) = entry.entity_refs.property_id {
        output.push_str(&format!("  Property:       {}\n", property_id));
    }
    if let Some(process_id) = entry.entity_refs.process_id {
        output.push_str(&format!("  Process:        {}\n", process_id));
    }

    if !payload.evidences.after.is_empty() {
        output.push_str("  Evidence:\n");
        for evidence in &payload.evidences.after {
            output.push_str(&format!("    {}\n", evidence_line(evidence)));
        }
    }

    if payload.metadata.unknown_type {
        output.push_str("  Warning:        change type was not recognized\n");
    }

    output.push('\n');
    for line in entry.narrative.lines() {
        output.push_str(&format!("  | {}\n", line));
    }

    output
}

fn evidence_line(evidence: &PayloadEvidence) -> String {
    match &evidence.name {
        Some(slot) => format!("{}: {}", slot, evidence.display_name),
        None => evidence.display_name.clone(),
    }
}
