//! Bounded worker pool for a collection batch.
//!
//! A fixed number of worker tasks drain a shared queue of facilities. Each
//! worker holds at most one render session at a time, so the pool size is the
//! session budget. Outcomes flow back over a completion channel to the single
//! [`ReportBuilder`] owned by [`collect_all`]; workers never touch the report.

use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use futures::FutureExt;
use teetimes_core::{CollectionReport, Facility, FetchOutcome};
use teetimes_scraper::PageRenderer;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::aggregate::ReportBuilder;
use crate::cancel::CancelSignal;
use crate::settings::CollectSettings;
use crate::worker::{collect_facility, panic_message};

struct Job {
    index: usize,
    facility: Facility,
}

type JobQueue = Arc<Mutex<VecDeque<Job>>>;

fn next_job(queue: &JobQueue) -> Option<Job> {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front()
}

/// Runs one batch over `facilities` and returns the report in input order.
///
/// At most `settings.max_concurrent` facilities are in flight at once. When
/// `cancel` is raised, no new facility is dispatched and in-flight ones abort
/// at their next suspension point; undispatched facilities are reported as
/// cancelled failures.
pub async fn collect_all<R>(
    renderer: Arc<R>,
    facilities: &[Facility],
    settings: &CollectSettings,
    cancel: &CancelSignal,
) -> CollectionReport
where
    R: PageRenderer,
{
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let mut builder = ReportBuilder::new(facilities.to_vec());

    let worker_count = settings.max_concurrent.max(1).min(facilities.len());
    tracing::info!(
        %run_id,
        facilities = facilities.len(),
        workers = worker_count,
        "collection batch started"
    );

    let queue: JobQueue = Arc::new(Mutex::new(
        facilities
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, facility)| Job { index, facility })
            .collect(),
    ));
    let settings = Arc::new(settings.clone());
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(usize, FetchOutcome)>();

    let mut workers = JoinSet::new();
    for worker_id in 0..worker_count {
        workers.spawn(run_worker(
            worker_id,
            Arc::clone(&renderer),
            Arc::clone(&queue),
            Arc::clone(&settings),
            cancel.clone(),
            done_tx.clone(),
        ));
    }
    // Channel closes once every worker has exited.
    drop(done_tx);

    while let Some((index, outcome)) = done_rx.recv().await {
        builder.record(index, outcome);
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "collection worker terminated abnormally");
        }
    }

    let pending = builder.pending();
    if pending > 0 {
        tracing::warn!(%run_id, pending, "facilities left unprocessed");
    }

    let report = builder.finish(run_id, started_at);
    tracing::info!(%run_id, summary = %report.summary_line(), "collection batch finished");
    report
}

async fn run_worker<R>(
    worker_id: usize,
    renderer: Arc<R>,
    queue: JobQueue,
    settings: Arc<CollectSettings>,
    cancel: CancelSignal,
    done: mpsc::UnboundedSender<(usize, FetchOutcome)>,
) where
    R: PageRenderer,
{
    while !cancel.is_cancelled() {
        let Some(job) = next_job(&queue) else {
            break;
        };
        tracing::debug!(worker_id, facility_id = %job.facility.id, "dispatching facility");
        let work = collect_facility(renderer.as_ref(), &job.facility, &settings, &cancel);
        let outcome = AssertUnwindSafe(work).catch_unwind().await.unwrap_or_else(|panic| {
            FetchOutcome::failed(format!("worker fault: {}", panic_message(panic.as_ref())))
        });
        if done.send((job.index, outcome)).is_err() {
            break;
        }
    }
    tracing::trace!(worker_id, "worker exiting");
}
