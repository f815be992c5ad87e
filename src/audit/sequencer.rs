//! Audit entry sequencing
//!
//! Entries produced by one workflow update share a base timestamp read once
//! from the injected clock; entry `i` is stamped `base + i * step`. Storage
//! ordered by timestamp therefore replays the changes in catalog order.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::error::{AuditError, AuditResult};
use crate::models::{Actor, EntityRefs};

use super::entry::{AuditEntryDraft, AuditLogEntry};

/// Source of batch base timestamps
pub trait Clock {
    /// Current time
    fn now(&self) -> DateTime<Utc>;

    /// Base timestamp for a batch occupying `span` of logical time
    fn batch_base(&self, _span: Duration) -> DateTime<Utc> {
        self.now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn batch_base(&self, span: Duration) -> DateTime<Utc> {
        (**self).batch_base(span)
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Clock wrapper guaranteeing that batches never overlap
///
/// Each batch base is at or after the end of the span reserved by the
/// previous batch, even if the wrapped clock stalls or goes backwards.
#[derive(Debug)]
pub struct MonotonicClock<C> {
    inner: C,
    next_free: Mutex<Option<DateTime<Utc>>>,
}

impl<C: Clock> MonotonicClock<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            next_free: Mutex::new(None),
        }
    }
}

impl<C: Clock> Clock for MonotonicClock<C> {
    fn now(&self) -> DateTime<Utc> {
        let now = self.inner.now();
        let next_free = self
            .next_free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match *next_free {
            Some(reserved) if reserved > now => reserved,
            _ => now,
        }
    }

    fn batch_base(&self, span: Duration) -> DateTime<Utc> {
        let now = self.inner.now();
        let mut next_free = self
            .next_free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let base = match *next_free {
            Some(reserved) if reserved > now => reserved,
            _ => now,
        };
        // Past the representable range the reservation saturates; the
        // sequencer rejects such a batch on its own overflow check.
        *next_free = Some(base.checked_add_signed(span).unwrap_or(DateTime::<Utc>::MAX_UTC));
        base
    }
}

/// Largest accepted spacing between two entries (one day)
pub const MAX_SEQUENCE_STEP_MS: i64 = 86_400_000;

/// Stamps the entries of one batch with strictly increasing timestamps
#[derive(Debug, Clone, Copy)]
pub struct AuditSequencer {
    step_ms: i64,
}

impl Default for AuditSequencer {
    fn default() -> Self {
        Self { step_ms: 1 }
    }
}

impl AuditSequencer {
    /// Sequencer spacing entries by `step_ms` milliseconds, clamped to
    /// `1..=MAX_SEQUENCE_STEP_MS`
    pub fn new(step_ms: i64) -> Self {
        Self {
            step_ms: step_ms.clamp(1, MAX_SEQUENCE_STEP_MS),
        }
    }

    /// Logical time between two consecutive entries
    pub fn step(&self) -> Duration {
        Duration::milliseconds(self.step_ms)
    }

    /// Stamp drafts in order; the clock is read once for the whole batch
    ///
    /// # Errors
    ///
    /// Returns a validation error when the batch would run past the
    /// representable timestamp range.
    pub fn sequence<C: Clock + ?Sized>(
        &self,
        drafts: Vec<AuditEntryDraft>,
        actor: &Actor,
        entity_refs: &EntityRefs,
        clock: &C,
    ) -> AuditResult<Vec<AuditLogEntry>> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let span = self.offset(drafts.len())?;
        let base = clock.batch_base(span);
        // The whole reserved span must fit, or no later batch could follow it
        base.checked_add_signed(span).ok_or_else(overflow)?;

        let mut entries = Vec::with_capacity(drafts.len());
        for (index, draft) in drafts.into_iter().enumerate() {
            let sequence_timestamp = base
                .checked_add_signed(self.offset(index)?)
                .ok_or_else(overflow)?;

            entries.push(AuditLogEntry {
                sequence_timestamp,
                actor: actor.clone(),
                entity_refs: *entity_refs,
                narrative: draft.narrative,
                structured_payload: draft.payload,
            });
        }

        Ok(entries)
    }

    /// `count` steps of logical time
    fn offset(&self, count: usize) -> AuditResult<Duration> {
        i64::try_from(count)
            .ok()
            .and_then(|count| self.step_ms.checked_mul(count))
            .and_then(Duration::try_milliseconds)
            .ok_or_else(overflow)
    }
}

fn overflow() -> AuditError {
    AuditError::Validation("audit batch runs past the supported timestamp range".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::payload::{
        PayloadDates, PayloadEvidences, PayloadMetadata, PayloadStep, PayloadType,
        StructuredChangePayload, PAYLOAD_VERSION,
    };
    use crate::models::ClientId;
    use chrono::TimeZone;
    use std::cell::Cell;

    struct CountingClock {
        at: DateTime<Utc>,
        reads: Cell<usize>,
    }

    impl Clock for CountingClock {
        fn now(&self) -> DateTime<Utc> {
            self.reads.set(self.reads.get() + 1);
            self.at
        }
    }

    fn draft(key: &str) -> AuditEntryDraft {
        AuditEntryDraft {
            narrative: format!("changed {}", key),
            payload: StructuredChangePayload {
                version: PAYLOAD_VERSION,
                change_type: PayloadType::Completion,
                step: PayloadStep {
                    key: key.into(),
                    name: key.into(),
                    number: 1,
                    total: 1,
                },
                dates: PayloadDates::default(),
                evidences: PayloadEvidences::default(),
                metadata: PayloadMetadata::default(),
            },
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_strictly_increasing() {
        let clock = FixedClock(base());
        let actor = Actor::new("u-1", "Ana");
        let refs = EntityRefs::client(ClientId::new());

        let entries = AuditSequencer::default().sequence(
            vec![draft("a"), draft("b"), draft("c")],
            &actor,
            &refs,
            &clock,
        )
        .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].sequence_timestamp, base());
        for pair in entries.windows(2) {
            assert!(pair[0].sequence_timestamp < pair[1].sequence_timestamp);
        }
        assert_eq!(entries[2].sequence_timestamp, base() + Duration::milliseconds(2));
        assert_eq!(entries[1].narrative, "changed b");
    }

    #[test]
    fn test_clock_read_once_per_batch() {
        let clock = CountingClock {
            at: base(),
            reads: Cell::new(0),
        };
        let actor = Actor::new("u-1", "Ana");
        let refs = EntityRefs::client(ClientId::new());

        AuditSequencer::new(10)
            .sequence(vec![draft("a"), draft("b")], &actor, &refs, &clock)
            .unwrap();
        assert_eq!(clock.reads.get(), 1);

        AuditSequencer::new(10)
            .sequence(Vec::new(), &actor, &refs, &clock)
            .unwrap();
        assert_eq!(clock.reads.get(), 1);
    }

    #[test]
    fn test_custom_step() {
        let entries = AuditSequencer::new(250).sequence(
            vec![draft("a"), draft("b")],
            &Actor::new("u-1", "Ana"),
            &EntityRefs::client(ClientId::new()),
            &FixedClock(base()),
        )
        .unwrap();
        assert_eq!(
            entries[1].sequence_timestamp - entries[0].sequence_timestamp,
            Duration::milliseconds(250)
        );
    }

    #[test]
    fn test_monotonic_clock_separates_batches() {
        let clock = MonotonicClock::new(FixedClock(base()));
        let sequencer = AuditSequencer::default();
        let actor = Actor::new("u-1", "Ana");
        let refs = EntityRefs::client(ClientId::new());

        let first = sequencer
            .sequence(vec![draft("a"), draft("b")], &actor, &refs, &clock)
            .unwrap();
        let second = sequencer
            .sequence(vec![draft("c")], &actor, &refs, &clock)
            .unwrap();

        assert!(first[1].sequence_timestamp < second[0].sequence_timestamp);
        assert_eq!(second[0].sequence_timestamp, base() + Duration::milliseconds(2));
    }

    #[test]
    fn test_non_positive_step_is_clamped() {
        assert_eq!(AuditSequencer::new(0).step(), Duration::milliseconds(1));
    }

    #[test]
    fn test_oversized_step_is_clamped() {
        assert_eq!(
            AuditSequencer::new(i64::MAX).step(),
            Duration::milliseconds(MAX_SEQUENCE_STEP_MS)
        );
    }

    #[test]
    fn test_batch_past_timestamp_range_is_rejected() {
        let clock = MonotonicClock::new(FixedClock(DateTime::<Utc>::MAX_UTC));
        let actor = Actor::new("u-1", "Ana");
        let refs = EntityRefs::client(ClientId::new());

        let err = AuditSequencer::new(MAX_SEQUENCE_STEP_MS)
            .sequence(vec![draft("a"), draft("b")], &actor, &refs, &clock)
            .unwrap_err();
        assert!(err.is_validation());
    }
}
