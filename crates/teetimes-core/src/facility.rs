use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rendered in both time columns when a facility had no bookable slot.
pub const NO_TEE_TIME_FOUND: &str = "No tee time found";

/// A bookable venue. Identity is `id`; `name` is display-only and may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub name: String,
    pub id: String,
}

impl Facility {
    #[must_use]
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Raw text of the earliest and latest marker elements, in document order.
/// Times are never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotSample {
    pub first: String,
    pub last: String,
}

/// Classified outcome of collecting one facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    Found(TimeSlotSample),
    /// Page loaded but no marker element was present.
    NoData,
    /// The wait budget elapsed before any marker element appeared.
    TimedOut,
    Failed { reason: String },
}

impl FetchOutcome {
    /// Builds a `Failed` outcome, substituting a placeholder for an empty reason
    /// so that failures always carry text.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            "unknown failure".to_string()
        } else {
            reason
        };
        Self::Failed { reason }
    }

    /// The `(first, last)` time columns for tabular output.
    ///
    /// Failed outcomes have no time columns; the reason goes in `error` instead.
    #[must_use]
    pub fn time_columns(&self) -> (&str, &str) {
        match self {
            Self::Found(sample) => (sample.first.as_str(), sample.last.as_str()),
            Self::NoData | Self::TimedOut => (NO_TEE_TIME_FOUND, NO_TEE_TIME_FOUND),
            Self::Failed { .. } => ("", ""),
        }
    }

    #[must_use]
    pub fn error_reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason } => Some(reason.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NoData => "no_data",
            Self::TimedOut => "timed_out",
            Self::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityResult {
    pub facility: Facility,
    pub outcome: FetchOutcome,
}

/// Tally of outcome variants in a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub found: usize,
    pub no_data: usize,
    pub timed_out: usize,
    pub failed: usize,
}

/// Final ordered aggregate of one batch. `results` follows the input order of
/// the facility list and always has one entry per input row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Set when the batch was cancelled before every facility finished.
    pub cancelled: bool,
    pub results: Vec<FacilityResult>,
}

impl CollectionReport {
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for result in &self.results {
            match result.outcome {
                FetchOutcome::Found(_) => counts.found += 1,
                FetchOutcome::NoData => counts.no_data += 1,
                FetchOutcome::TimedOut => counts.timed_out += 1,
                FetchOutcome::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }

    /// `true` if any result is `Failed`; decides whether output carries an
    /// `error` column.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.results
            .iter()
            .any(|r| matches!(r.outcome, FetchOutcome::Failed { .. }))
    }

    /// One-line summary used in logs and the notification body.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let c = self.counts();
        format!(
            "{} facilities: {} with tee times, {} without, {} failed{}",
            self.len(),
            c.found,
            c.no_data + c.timed_out,
            c.failed,
            if self.cancelled { " (run cancelled)" } else { "" }
        )
    }
}
