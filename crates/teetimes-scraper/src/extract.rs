//! Wait-then-extract step for tee-time marker elements.
//!
//! The wait budget is the principal latency source of a collection run, so it
//! is always supplied by the caller and never defaulted here.

use std::time::Duration;

use teetimes_core::TimeSlotSample;

use crate::error::RenderError;
use crate::renderer::RenderedDocument;

/// Lower bound on the poll period so a zero interval cannot spin.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Polling parameters for [`wait_for_time_slots`].
#[derive(Debug, Clone)]
pub struct ExtractSettings {
    /// CSS selector identifying time-marker elements.
    pub marker_selector: String,
    /// Total time to wait for the first marker to appear.
    pub wait_budget: Duration,
    /// Delay between successive presence checks.
    pub poll_interval: Duration,
}

/// Result of the extraction step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(TimeSlotSample),
    /// Markers were reported present but none could be read.
    NoData,
    /// No marker appeared within the wait budget.
    TimedOut,
}

/// Polls `document` until at least one marker element is present or the wait
/// budget elapses, then reads the text of the first and last match.
///
/// A single match yields `first == last`.
///
/// # Errors
///
/// Propagates any [`RenderError`] raised by the document while querying or
/// reading element text. Those are adapter faults, not absence of data.
pub async fn wait_for_time_slots<D>(
    document: &D,
    settings: &ExtractSettings,
) -> Result<Extraction, RenderError>
where
    D: RenderedDocument,
{
    let poll_interval = settings.poll_interval.max(MIN_POLL_INTERVAL);

    let presence = async {
        loop {
            let elements = document.find_all(&settings.marker_selector).await?;
            if !elements.is_empty() {
                return Ok::<_, RenderError>(elements);
            }
            tokio::time::sleep(poll_interval).await;
        }
    };

    let elements = match tokio::time::timeout(settings.wait_budget, presence).await {
        Ok(found) => found?,
        Err(_) => {
            tracing::debug!(
                selector = %settings.marker_selector,
                budget_ms = settings.wait_budget.as_millis(),
                "no marker elements within wait budget"
            );
            return Ok(Extraction::TimedOut);
        }
    };

    let (Some(first), Some(last)) = (elements.first(), elements.last()) else {
        return Ok(Extraction::NoData);
    };

    let first = document.text(first).await?;
    let last = if elements.len() == 1 {
        first.clone()
    } else {
        document.text(last).await?
    };

    Ok(Extraction::Found(TimeSlotSample {
        first: first.trim().to_string(),
        last: last.trim().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Document whose marker list becomes visible after `appear_after` polls.
    struct ScriptedDocument {
        markers: Vec<String>,
        appear_after: u32,
        polls: AtomicU32,
        fail_query: bool,
        texts_read: Mutex<Vec<usize>>,
    }

    impl ScriptedDocument {
        fn new(markers: &[&str], appear_after: u32) -> Self {
            Self {
                markers: markers.iter().map(|s| (*s).to_string()).collect(),
                appear_after,
                polls: AtomicU32::new(0),
                fail_query: false,
                texts_read: Mutex::new(Vec::new()),
            }
        }
    }

    impl RenderedDocument for ScriptedDocument {
        type Element = usize;

        async fn find_all(&self, _selector: &str) -> Result<Vec<usize>, RenderError> {
            if self.fail_query {
                return Err(RenderError::SessionClosed);
            }
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            if n < self.appear_after {
                return Ok(Vec::new());
            }
            Ok((0..self.markers.len()).collect())
        }

        async fn text(&self, element: &usize) -> Result<String, RenderError> {
            self.texts_read.lock().unwrap().push(*element);
            Ok(self.markers[*element].clone())
        }
    }

    fn settings(wait_ms: u64) -> ExtractSettings {
        ExtractSettings {
            marker_selector: ".time-meridian".to_string(),
            wait_budget: Duration::from_millis(wait_ms),
            poll_interval: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn returns_first_and_last_marker_text() {
        let doc = ScriptedDocument::new(&["7:00 AM", "9:10 AM", " 5:40 PM "], 0);
        let result = wait_for_time_slots(&doc, &settings(500)).await.unwrap();
        assert_eq!(
            result,
            Extraction::Found(TimeSlotSample {
                first: "7:00 AM".to_string(),
                last: "5:40 PM".to_string(),
            })
        );
        // Middle element is never read.
        assert_eq!(*doc.texts_read.lock().unwrap(), vec![0, 2]);
    }

    #[tokio::test]
    async fn single_marker_yields_identical_first_and_last() {
        let doc = ScriptedDocument::new(&["8:20 AM"], 0);
        let result = wait_for_time_slots(&doc, &settings(500)).await.unwrap();
        assert_eq!(
            result,
            Extraction::Found(TimeSlotSample {
                first: "8:20 AM".to_string(),
                last: "8:20 AM".to_string(),
            })
        );
        assert_eq!(doc.texts_read.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn keeps_polling_until_markers_appear() {
        let doc = ScriptedDocument::new(&["6:30 AM", "4:00 PM"], 3);
        let result = wait_for_time_slots(&doc, &settings(2_000)).await.unwrap();
        assert!(matches!(result, Extraction::Found(_)));
        assert_eq!(doc.polls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn times_out_when_no_marker_ever_appears() {
        let doc = ScriptedDocument::new(&[], 0);
        let started = std::time::Instant::now();
        let result = wait_for_time_slots(&doc, &settings(100)).await.unwrap();
        assert_eq!(result, Extraction::TimedOut);
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert!(
            doc.polls.load(Ordering::SeqCst) > 1,
            "expected repeated polls within the budget"
        );
    }

    #[tokio::test]
    async fn query_errors_propagate_as_faults() {
        let mut doc = ScriptedDocument::new(&["7:00 AM"], 0);
        doc.fail_query = true;
        let result = wait_for_time_slots(&doc, &settings(100)).await;
        assert!(matches!(result, Err(RenderError::SessionClosed)));
    }
}
