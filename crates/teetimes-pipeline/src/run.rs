use std::path::Path;
use std::sync::Arc;

use teetimes_core::{CollectionReport, IngestionError};
use teetimes_scraper::PageRenderer;

use crate::cancel::CancelSignal;
use crate::scheduler::collect_all;
use crate::settings::CollectSettings;
use crate::sink::{deliver_report, DeliveryStatus, Notifier};
use crate::source::read_facilities;

/// A finished batch and what happened to its report afterwards.
#[derive(Debug)]
pub struct CompletedRun {
    pub report: CollectionReport,
    pub delivery: DeliveryStatus,
}

/// Ingests `input`, collects every facility, and delivers the report.
///
/// # Errors
///
/// Returns [`IngestionError`] when the facility list cannot be read. No
/// render session is opened in that case. Everything after ingestion is
/// reflected in the report or the delivery status instead.
pub async fn run_collection<R, N>(
    renderer: Arc<R>,
    input: &Path,
    output: &Path,
    settings: &CollectSettings,
    notifier: Option<&N>,
    cancel: &CancelSignal,
) -> Result<CompletedRun, IngestionError>
where
    R: PageRenderer,
    N: Notifier,
{
    let facilities = read_facilities(input).await?;
    tracing::info!(
        path = %input.display(),
        facilities = facilities.len(),
        "facility list loaded"
    );

    let report = collect_all(renderer, &facilities, settings, cancel).await;
    let delivery = deliver_report(&report, output, notifier).await;

    Ok(CompletedRun { report, delivery })
}
