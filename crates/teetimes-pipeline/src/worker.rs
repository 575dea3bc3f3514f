//! Per-facility unit of work.
//!
//! A worker opens its own render session, navigates to the facility page,
//! waits for time markers, and classifies the result. Every failure path is
//! converted into a [`FetchOutcome`]; nothing escapes to abort the batch, and
//! the session is closed on every exit path once it has been opened.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use teetimes_core::{Facility, FetchOutcome};
use teetimes_scraper::{
    facility_url, wait_for_time_slots, Extraction, PageRenderer, RenderError, RenderSession,
};

use crate::cancel::CancelSignal;
use crate::settings::CollectSettings;

pub const CANCELLED_REASON: &str = "collection cancelled before completion";

/// Collects and classifies one facility.
pub async fn collect_facility<R>(
    renderer: &R,
    facility: &Facility,
    settings: &CollectSettings,
    cancel: &CancelSignal,
) -> FetchOutcome
where
    R: PageRenderer,
{
    if cancel.is_cancelled() {
        return FetchOutcome::failed(CANCELLED_REASON);
    }

    // Opening is not interrupted: a half-created session could not be released.
    let mut session = match renderer.open().await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(
                facility_id = %facility.id,
                error = %e,
                "could not open render session"
            );
            return FetchOutcome::failed(format!("render session unavailable: {e}"));
        }
    };

    let url = facility_url(&settings.site_host, &facility.id);

    let work = AssertUnwindSafe(navigate_and_extract(&mut session, &url, settings)).catch_unwind();
    let outcome = tokio::select! {
        result = work => result.unwrap_or_else(|panic| {
            FetchOutcome::failed(format!("worker fault: {}", panic_message(panic.as_ref())))
        }),
        () = cancel.cancelled() => FetchOutcome::failed(CANCELLED_REASON),
    };

    if let Err(e) = session.close().await {
        tracing::warn!(facility_id = %facility.id, error = %e, "failed to close render session");
    }

    log_outcome(facility, &outcome);
    outcome
}

async fn navigate_and_extract<S>(
    session: &mut S,
    url: &str,
    settings: &CollectSettings,
) -> FetchOutcome
where
    S: RenderSession,
{
    tracing::trace!(url, "navigating");
    let document = match session.navigate(url).await {
        Ok(document) => document,
        Err(e @ RenderError::Navigation { .. }) => return FetchOutcome::failed(e.to_string()),
        Err(e) => return FetchOutcome::failed(format!("renderer fault during navigation: {e}")),
    };

    tracing::trace!(url, "waiting for time markers");
    match wait_for_time_slots(&document, &settings.extract).await {
        Ok(Extraction::Found(sample)) => FetchOutcome::Found(sample),
        Ok(Extraction::NoData) => FetchOutcome::NoData,
        Ok(Extraction::TimedOut) => FetchOutcome::TimedOut,
        Err(e) => FetchOutcome::failed(format!("renderer fault during extraction: {e}")),
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_owned()
    }
}

fn log_outcome(facility: &Facility, outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Found(sample) => tracing::debug!(
            facility = %facility.name,
            facility_id = %facility.id,
            first = %sample.first,
            last = %sample.last,
            "tee times found"
        ),
        FetchOutcome::NoData | FetchOutcome::TimedOut => tracing::warn!(
            facility = %facility.name,
            facility_id = %facility.id,
            outcome = outcome.label(),
            "no tee times found"
        ),
        FetchOutcome::Failed { reason } => tracing::warn!(
            facility = %facility.name,
            facility_id = %facility.id,
            reason = %reason,
            "facility collection failed"
        ),
    }
}
