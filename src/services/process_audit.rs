//! Process audit service
//!
//! Runs the audit pipeline for one workflow update: detect the step changes,
//! compose and sequence the entries, then hand them to the publisher. Any
//! failure aborts the update before anything is published.

use serde::{Deserialize, Serialize};

use crate::audit::{
    detect_changes, AuditComposer, AuditLogEntry, AuditPublisher, Clock, StepChange,
};
use crate::error::AuditResult;
use crate::models::{Actor, EntityRefs, FinancialContext, ProcessSnapshot};
use crate::registry::StepConfigRegistry;

/// One workflow update to audit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessUpdate {
    pub before: ProcessSnapshot,
    pub after: ProcessSnapshot,
    #[serde(default)]
    pub context: FinancialContext,
    pub actor: Actor,
    pub entity_refs: EntityRefs,
}

/// Service auditing workflow updates
pub struct ProcessAuditService<'a> {
    registry: &'a StepConfigRegistry,
    composer: &'a AuditComposer,
    clock: &'a dyn Clock,
    publisher: &'a dyn AuditPublisher,
}

impl<'a> ProcessAuditService<'a> {
    /// Create a new process audit service
    pub fn new(
        registry: &'a StepConfigRegistry,
        composer: &'a AuditComposer,
        clock: &'a dyn Clock,
        publisher: &'a dyn AuditPublisher,
    ) -> Self {
        Self {
            registry,
            composer,
            clock,
            publisher,
        }
    }

    /// Classified changes of an update, including suppressed ones
    pub fn changes(&self, update: &ProcessUpdate) -> AuditResult<Vec<StepChange>> {
        detect_changes(&update.before, &update.after, self.registry, &update.context)
    }

    /// Build the entries of an update without publishing them
    pub fn preview(&self, update: &ProcessUpdate) -> AuditResult<Vec<AuditLogEntry>> {
        let changes = self.changes(update)?;
        self.composer
            .compose(&changes, &update.actor, &update.entity_refs, self.clock)
    }

    /// Build the entries of an update and publish them as one batch
    pub fn record(&self, update: &ProcessUpdate) -> AuditResult<Vec<AuditLogEntry>> {
        let entries = self.preview(update)?;

        if entries.is_empty() {
            tracing::debug!(client = %update.entity_refs.client_id, "update produced no audit entries");
            return Ok(entries);
        }

        self.publisher.publish(&entries)?;
        tracing::info!(
            client = %update.entity_refs.client_id,
            actor = %update.actor.id,
            count = entries.len(),
            "published audit entries"
        );

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{FixedClock, MemoryPublisher, PayloadType};
    use crate::error::AuditError;
    use crate::models::{ClientId, Evidence, PaymentMethod, StepState};
    use chrono::{DateTime, TimeZone, Utc};

    struct FailingPublisher;

    impl AuditPublisher for FailingPublisher {
        fn publish(&self, _entries: &[AuditLogEntry]) -> AuditResult<()> {
            Err(AuditError::Storage("disk full".into()))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn update(before: ProcessSnapshot, after: ProcessSnapshot) -> ProcessUpdate {
        ProcessUpdate {
            before,
            after,
            context: FinancialContext::paid_with(PaymentMethod::Cash),
            actor: Actor::new("u-1", "Ana"),
            entity_refs: EntityRefs::client(ClientId::new()),
        }
    }

    fn promise(url: &str) -> Evidence {
        Evidence::new("promise_draft", "Promise.pdf", url, "application/pdf")
    }

    #[test]
    fn test_record_publishes_entries() {
        let registry = StepConfigRegistry::closing_process();
        let composer = AuditComposer::default();
        let clock = FixedClock(date(2024, 3, 1));
        let publisher = MemoryPublisher::new();
        let service = ProcessAuditService::new(&registry, &composer, &clock, &publisher);

        let after = ProcessSnapshot::new().with_step(
            "promiseSent",
            StepState::completed_on(date(2024, 1, 10)).with_evidence(promise("X")),
        );
        let entries = service.record(&update(ProcessSnapshot::new(), after)).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].change_type(), PayloadType::Completion);
        assert_eq!(publisher.entries(), entries);
    }

    #[test]
    fn test_preview_does_not_publish() {
        let registry = StepConfigRegistry::closing_process();
        let composer = AuditComposer::default();
        let clock = FixedClock(date(2024, 3, 1));
        let publisher = MemoryPublisher::new();
        let service = ProcessAuditService::new(&registry, &composer, &clock, &publisher);

        let after = ProcessSnapshot::new()
            .with_step("reservationPaid", StepState::completed_on(date(2024, 1, 2)));
        let entries = service.preview(&update(ProcessSnapshot::new(), after)).unwrap();

        assert_eq!(entries.len(), 1);
        assert!(publisher.entries().is_empty());
    }

    #[test]
    fn test_business_rule_aborts_whole_update() {
        let registry = StepConfigRegistry::closing_process();
        let composer = AuditComposer::default();
        let clock = FixedClock(date(2024, 3, 1));
        let publisher = MemoryPublisher::new();
        let service = ProcessAuditService::new(&registry, &composer, &clock, &publisher);

        let completed = StepState::completed_on(date(2024, 1, 10)).with_evidence(promise("X"));
        let reopened_unchanged = completed
            .reopen("wrong file", date(2024, 1, 20))
            .complete(date(2024, 1, 10));

        let before = ProcessSnapshot::new().with_step("promiseSent", completed);
        let after = ProcessSnapshot::new()
            .with_step("reservationPaid", StepState::completed_on(date(2024, 1, 2)))
            .with_step("promiseSent", reopened_unchanged);

        let err = service.record(&update(before, after)).unwrap_err();
        assert!(err.is_business_rule());
        assert!(publisher.entries().is_empty());
    }

    #[test]
    fn test_publisher_failure_is_reported() {
        let registry = StepConfigRegistry::closing_process();
        let composer = AuditComposer::default();
        let clock = FixedClock(date(2024, 3, 1));
        let service = ProcessAuditService::new(&registry, &composer, &clock, &FailingPublisher);

        let after = ProcessSnapshot::new()
            .with_step("reservationPaid", StepState::completed_on(date(2024, 1, 2)));
        let err = service.record(&update(ProcessSnapshot::new(), after)).unwrap_err();

        assert!(matches!(err, AuditError::Storage(_)));
    }

    #[test]
    fn test_no_change_publishes_nothing() {
        let registry = StepConfigRegistry::closing_process();
        let composer = AuditComposer::default();
        let clock = FixedClock(date(2024, 3, 1));
        let service = ProcessAuditService::new(&registry, &composer, &clock, &FailingPublisher);

        let snapshot = ProcessSnapshot::new()
            .with_step("reservationPaid", StepState::completed_on(date(2024, 1, 2)));
        let entries = service.record(&update(snapshot.clone(), snapshot)).unwrap();

        assert!(entries.is_empty());
    }
}
