//! Audit entry composition
//!
//! Turns classified step changes into sequenced audit entries. The reopening
//! rule is checked for the whole batch before any entry is built, so a
//! rejected update never yields a partial trail.

use crate::config::Settings;
use crate::error::{AuditError, AuditResult};
use crate::models::{Actor, EntityRefs};

use super::change::{ChangeCategory, StepChange};
use super::entry::{AuditEntryDraft, AuditLogEntry};
use super::narrative::{render_plain, MessageComposer};
use super::payload::build_payload;
use super::sequencer::{AuditSequencer, Clock};

/// Reject reopened steps completed again without any date or evidence change
pub fn enforce_reopening_rule(changes: &[StepChange]) -> AuditResult<()> {
    for change in changes {
        if change.category != ChangeCategory::Reopening {
            continue;
        }

        if !change.flags.date_changed && !change.flags.evidence_changed {
            tracing::warn!(
                step = %change.step_key,
                "reopened step completed again without date or evidence change"
            );
            return Err(AuditError::business_rule(
                &change.step_key,
                "step was reopened and completed again without changing its date or evidence",
            ));
        }
    }

    Ok(())
}

/// Builds narratives and payloads, then sequences them
#[derive(Debug, Clone, Default)]
pub struct AuditComposer {
    messages: MessageComposer,
    sequencer: AuditSequencer,
}

impl AuditComposer {
    pub fn new(messages: MessageComposer, sequencer: AuditSequencer) -> Self {
        Self {
            messages,
            sequencer,
        }
    }

    /// Composer using the date format and sequence step of the settings
    pub fn from_settings(settings: &Settings) -> AuditResult<Self> {
        Ok(Self::new(
            MessageComposer::new(settings.date_format.clone())?,
            AuditSequencer::new(settings.sequence_step_ms),
        ))
    }

    pub fn messages(&self) -> &MessageComposer {
        &self.messages
    }

    /// Narrative and payload of every change that belongs in the trail
    pub fn drafts(&self, changes: &[StepChange]) -> AuditResult<Vec<AuditEntryDraft>> {
        enforce_reopening_rule(changes)?;

        let mut drafts = Vec::with_capacity(changes.len());
        for change in changes {
            match change.category {
                ChangeCategory::Suppressed => {
                    tracing::debug!(step = %change.step_key, "evidence swap left out of the audit trail");
                    continue;
                }
                ChangeCategory::NoChange => {
                    tracing::warn!(
                        step = %change.step_key,
                        "unrecognized step change recorded with a generic narrative"
                    );
                }
                _ => {}
            }

            drafts.push(AuditEntryDraft {
                narrative: render_plain(&self.messages.compose(change)),
                payload: build_payload(change)?,
            });
        }

        Ok(drafts)
    }

    /// Compose the sequenced entries of one workflow update
    pub fn compose<C: Clock + ?Sized>(
        &self,
        changes: &[StepChange],
        actor: &Actor,
        entity_refs: &EntityRefs,
        clock: &C,
    ) -> AuditResult<Vec<AuditLogEntry>> {
        let drafts = self.drafts(changes)?;
        self.sequencer.sequence(drafts, actor, entity_refs, clock)
    }
}

/// Compose audit entries with the default date format and sequence step
pub fn compose_audit_entries<C: Clock + ?Sized>(
    changes: &[StepChange],
    actor: &Actor,
    entity_refs: &EntityRefs,
    clock: &C,
) -> AuditResult<Vec<AuditLogEntry>> {
    AuditComposer::default().compose(changes, actor, entity_refs, clock)
}
