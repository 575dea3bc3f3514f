//! Restores input order over results that arrive in completion order.

use chrono::{DateTime, Utc};
use teetimes_core::{CollectionReport, Facility, FacilityResult, FetchOutcome};
use uuid::Uuid;

use crate::worker::CANCELLED_REASON;

/// Single-owner accumulator for one batch.
///
/// Slots are keyed by input position, not by facility id, so duplicate rows
/// each keep their own result.
#[derive(Debug)]
pub struct ReportBuilder {
    facilities: Vec<Facility>,
    slots: Vec<Option<FetchOutcome>>,
}

impl ReportBuilder {
    #[must_use]
    pub fn new(facilities: Vec<Facility>) -> Self {
        let slots = vec![None; facilities.len()];
        Self { facilities, slots }
    }

    /// Stores the outcome for the facility at input position `index`.
    ///
    /// Returns `false` (and keeps the first value) when the slot is already
    /// filled or `index` is out of range.
    pub fn record(&mut self, index: usize, outcome: FetchOutcome) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            tracing::error!(index, "result for unknown input position dropped");
            return false;
        };
        if slot.is_some() {
            tracing::error!(index, "duplicate result for input position ignored");
            return false;
        }
        *slot = Some(outcome);
        true
    }

    /// Number of input positions still waiting for a result.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }

    /// Seals the report. Positions that never received a result (never
    /// dispatched because the batch was cancelled) are recorded as failed.
    ///
    /// The report is marked cancelled only when cancellation cost at least
    /// one result; a signal raised after every facility finished is ignored.
    #[must_use]
    pub fn finish(self, run_id: Uuid, started_at: DateTime<Utc>) -> CollectionReport {
        let cancelled = self.slots.iter().any(|slot| match slot {
            None => true,
            Some(outcome) => outcome.error_reason() == Some(CANCELLED_REASON),
        });
        let results = self
            .facilities
            .into_iter()
            .zip(self.slots)
            .map(|(facility, slot)| FacilityResult {
                facility,
                outcome: slot.unwrap_or_else(|| FetchOutcome::failed(CANCELLED_REASON)),
            })
            .collect();

        CollectionReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            cancelled,
            results,
        }
    }
}
