//! Process snapshot comparison
//!
//! Walks the step catalog in order and compares the `before` and `after`
//! state of every step, producing one classified `StepChange` per step that
//! changed. Inputs are only read.

use crate::error::{AuditError, AuditResult};
use crate::models::evidence::same_files;
use crate::models::{FinancialContext, ProcessSnapshot, StepState};
use crate::registry::{StepConfig, StepConfigRegistry};

use super::change::{ChangeFlags, StepChange, StepStateView};
use super::classify::classify;

/// Detect the changes between two snapshots, in catalog order
///
/// # Errors
///
/// Returns a validation error when a snapshot refers to a step missing from
/// the catalog, when a state is malformed, or when a changed step is not
/// applicable under `ctx`.
pub fn detect_changes(
    before: &ProcessSnapshot,
    after: &ProcessSnapshot,
    registry: &StepConfigRegistry,
    ctx: &FinancialContext,
) -> AuditResult<Vec<StepChange>> {
    for key in before.keys().chain(after.keys()) {
        if !registry.contains(key) {
            return Err(AuditError::invalid_step(
                key,
                "step is not part of the process catalog",
            ));
        }
    }

    let not_started = StepState::not_started();
    let mut changes = Vec::new();

    for config in registry.steps() {
        let before_state = before.get(&config.key).unwrap_or(&not_started);
        let after_state = after.get(&config.key).unwrap_or(&not_started);

        if let Some(change) = diff_step(config, before_state, after_state, registry, ctx)? {
            tracing::debug!(
                step = %change.step_key,
                category = %change.category,
                "detected step change"
            );
            changes.push(change);
        }
    }

    Ok(changes)
}

/// Compare the two states of one step
fn diff_step(
    config: &StepConfig,
    before: &StepState,
    after: &StepState,
    registry: &StepConfigRegistry,
    ctx: &FinancialContext,
) -> AuditResult<Option<StepChange>> {
    before.validate(&config.key)?;
    after.validate(&config.key)?;

    let is_reopening = is_pending_reopening(before, after);

    // A reopening is compared against the state frozen when the step was
    // reopened; the update may have bundled reopening and re-completion.
    let baseline = if is_reopening {
        let previous = after.previous_state.as_ref().ok_or_else(|| {
            AuditError::invalid_step(&config.key, "reopened step has no snapshot of its prior state")
        })?;
        if !previous.completed {
            return Err(AuditError::invalid_step(
                &config.key,
                "step was reopened but was not completed before the reopening",
            ));
        }
        StepState::from(previous)
    } else {
        before.clone()
    };

    let both_completed = baseline.completed && after.completed;
    let flags = ChangeFlags {
        completion_occurred: !before.completed && after.completed,
        date_changed: both_completed && baseline.completion_date != after.completion_date,
        evidence_changed: both_completed && !same_files(&baseline.evidences, &after.evidences),
        is_reopening,
    };

    if !flags.any() {
        return Ok(None);
    }

    let position = registry.position(&config.key, ctx).ok_or_else(|| {
        AuditError::invalid_step(
            &config.key,
            "step changed but is not applicable under the current financial context",
        )
    })?;

    Ok(Some(StepChange {
        category: classify(&flags),
        step_key: config.key.clone(),
        step_name: config.label.clone(),
        step_number: position.number,
        total_applicable_steps: position.total,
        before: StepStateView::from(&baseline),
        after: StepStateView::from(after),
        flags,
        evidence_slots: config.required_evidence.clone(),
    }))
}

/// A reopening is evaluated once its re-completion is observed and `before`
/// has not already recorded that same completed reopening.
fn is_pending_reopening(before: &StepState, after: &StepState) -> bool {
    if !(after.completed && after.has_reopening()) {
        return false;
    }

    let already_recorded = before.completed && before.reopening_at == after.reopening_at;
    !already_recorded
}
