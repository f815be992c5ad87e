//! Narrative composition
//!
//! The composer builds a content model (title plus titled sections of lines)
//! from a classified change; `render_plain` turns it into text. A richer
//! presentation layer can render the same model with its own decorations.
//!
//! Rendering only depends on its inputs: the same change always produces the
//! same text.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AuditError, AuditResult};
use crate::models::Evidence;

use super::change::{ChangeCategory, DateDirection, StepChange};
use super::evidence_delta::{EvidenceDelta, ReplacedEvidence};

/// A titled block of narrative lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeSection {
    pub heading: String,
    pub lines: Vec<String>,
}

impl NarrativeSection {
    fn new(heading: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            lines,
        }
    }
}

/// Content of a narrative, independent of presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narrative {
    pub title: String,
    pub sections: Vec<NarrativeSection>,
}

impl Narrative {
    /// Section with the given heading
    pub fn section(&self, heading: &str) -> Option<&NarrativeSection> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

pub const SECTION_STEP: &str = "Step";
pub const SECTION_WHEN: &str = "When";
pub const SECTION_EVIDENCE: &str = "Evidence";
pub const SECTION_REASON: &str = "Reason";
pub const SECTION_BEFORE_REOPENING: &str = "State before reopening";
pub const SECTION_REOPENING_CHANGES: &str = "Changes made during reopening";
pub const SECTION_FINAL_STATE: &str = "Final state";

/// Renders step changes as narratives
#[derive(Debug, Clone)]
pub struct MessageComposer {
    date_format: String,
}

impl Default for MessageComposer {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl MessageComposer {
    /// Create a composer formatting dates with a strftime pattern
    pub fn new(date_format: impl Into<String>) -> AuditResult<Self> {
        let date_format = date_format.into();

        if StrftimeItems::new(&date_format).any(|item| matches!(item, Item::Error)) {
            return Err(AuditError::Config(format!(
                "Invalid date format: '{}'",
                date_format
            )));
        }

        Ok(Self { date_format })
    }

    /// Build the narrative content of a change
    pub fn compose(&self, change: &StepChange) -> Narrative {
        match change.category {
            ChangeCategory::Completion => self.completion(change),
            ChangeCategory::DateEdit => self.date_edit(change),
            ChangeCategory::Reopening => self.reopening(change),
            ChangeCategory::Suppressed | ChangeCategory::NoChange => self.unknown(change),
        }
    }

    /// Build and render a change as plain text
    pub fn render(&self, change: &StepChange) -> String {
        render_plain(&self.compose(change))
    }

    fn completion(&self, change: &StepChange) -> Narrative {
        Narrative {
            title: format!("Step completed: {}", change.step_name),
            sections: vec![
                step_section(change),
                NarrativeSection::new(
                    SECTION_WHEN,
                    vec![format!(
                        "Completed on {}",
                        self.date_or_unknown(change.after.completion_date.as_ref())
                    )],
                ),
                NarrativeSection::new(SECTION_EVIDENCE, evidence_lines(&change.after.evidences)),
            ],
        }
    }

    fn date_edit(&self, change: &StepChange) -> Narrative {
        Narrative {
            title: format!("Completion date changed: {}", change.step_name),
            sections: vec![
                step_section(change),
                NarrativeSection::new(SECTION_WHEN, vec![self.date_move(change)]),
                NarrativeSection::new(SECTION_EVIDENCE, evidence_lines(&change.after.evidences)),
            ],
        }
    }

    fn reopening(&self, change: &StepChange) -> Narrative {
        let reason = change
            .after
            .reopening_reason
            .as_deref()
            .unwrap_or("no reason given");

        let mut reason_lines = vec![reason.to_string()];
        if let Some(at) = change.after.reopening_at.as_ref() {
            reason_lines.push(format!("Reopened on {}", self.date(at)));
        }

        let mut before_lines = vec![format!(
            "Completed on {}",
            self.date_or_unknown(change.before.completion_date.as_ref())
        )];
        before_lines.extend(evidence_lines(&change.before.evidences));

        let mut final_lines = vec![format!(
            "Completed on {}",
            self.date_or_unknown(change.after.completion_date.as_ref())
        )];
        final_lines.extend(evidence_lines(&change.after.evidences));

        Narrative {
            title: format!("Step reopened and completed again: {}", change.step_name),
            sections: vec![
                step_section(change),
                NarrativeSection::new(SECTION_REASON, reason_lines),
                NarrativeSection::new(SECTION_BEFORE_REOPENING, before_lines),
                NarrativeSection::new(SECTION_REOPENING_CHANGES, self.reopening_changes(change)),
                NarrativeSection::new(SECTION_FINAL_STATE, final_lines),
            ],
        }
    }

    fn unknown(&self, change: &StepChange) -> Narrative {
        Narrative {
            title: format!(
                "Process step updated: {} ({}/{})",
                change.step_name, change.step_number, change.total_applicable_steps
            ),
            sections: Vec::new(),
        }
    }

    fn reopening_changes(&self, change: &StepChange) -> Vec<String> {
        let mut lines = Vec::new();

        if change.flags.date_changed {
            lines.push(format!("Completion date: {}", self.date_move(change)));
        } else {
            lines.push("Completion date unchanged".to_string());
        }

        let delta = EvidenceDelta::between(&change.before.evidences, &change.after.evidences);
        if delta.is_empty() {
            lines.push("Evidence unchanged".to_string());
            return lines;
        }

        for pair in &delta.replaced {
            lines.push(format!(
                "Replaced (same slot, new file): {}",
                replacement_text(change, pair)
            ));
        }
        for pair in &delta.updated {
            lines.push(format!(
                "Updated (same slot, new file): {}",
                replacement_text(change, pair)
            ));
        }
        for id in &delta.added {
            lines.push(format!(
                "Added: {}",
                display_name(change.after.evidence(id), change, id)
            ));
        }
        for id in &delta.removed {
            lines.push(format!(
                "Removed: {}",
                display_name(change.before.evidence(id), change, id)
            ));
        }

        lines
    }

    fn date_move(&self, change: &StepChange) -> String {
        let before = change.before.completion_date.as_ref();
        let after = change.after.completion_date.as_ref();
        let direction = DateDirection::between(before, after)
            .map(|d| format!(" ({})", d))
            .unwrap_or_default();

        format!(
            "{} -> {}{}",
            self.date_or_unknown(before),
            self.date_or_unknown(after),
            direction
        )
    }

    fn date(&self, date: &DateTime<Utc>) -> String {
        date.format(&self.date_format).to_string()
    }

    fn date_or_unknown(&self, date: Option<&DateTime<Utc>>) -> String {
        date.map(|d| self.date(d))
            .unwrap_or_else(|| "unknown date".to_string())
    }
}

fn step_section(change: &StepChange) -> NarrativeSection {
    NarrativeSection::new(
        SECTION_STEP,
        vec![format!(
            "{} ({}/{})",
            change.step_name, change.step_number, change.total_applicable_steps
        )],
    )
}

fn evidence_lines(evidences: &[Evidence]) -> Vec<String> {
    if evidences.is_empty() {
        return vec!["No evidence attached".to_string()];
    }

    evidences
        .iter()
        .map(|e| format!("- {}", e.display_name))
        .collect()
}

// Falls back to the slot label so raw ids never reach the narrative.
fn display_name(evidence: Option<&Evidence>, change: &StepChange, slot_id: &str) -> String {
    evidence
        .map(|e| e.display_name.clone())
        .or_else(|| change.slot_label(slot_id).map(str::to_string))
        .unwrap_or_else(|| "unnamed evidence".to_string())
}

fn replacement_text(change: &StepChange, pair: &ReplacedEvidence) -> String {
    format!(
        "{} -> {}",
        display_name(change.before.evidence(&pair.id), change, &pair.id),
        display_name(change.after.evidence(&pair.id), change, &pair.id)
    )
}

/// Render a narrative as plain text
pub fn render_plain(narrative: &Narrative) -> String {
    let mut output = narrative.title.clone();

    for section in &narrative.sections {
        output.push_str(&format!("\n{}:", section.heading));
        for line in &section.lines {
            output.push_str(&format!("\n  {}", line));
        }
    }

    output
}
