//! `schedule` command: recurring collection batches.

use std::sync::Arc;

use teetimes_core::AppConfig;
use teetimes_pipeline::CancelSignal;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::collect::collect_once;

pub(crate) async fn run_schedule(config: AppConfig) -> anyhow::Result<()> {
    let config = Arc::new(config);
    let cancel = CancelSignal::new();
    // Overlapping fires are skipped rather than queued.
    let running = Arc::new(Mutex::new(()));

    let mut scheduler = JobScheduler::new().await?;
    let job = {
        let schedule = config.report_schedule.clone();
        let config = Arc::clone(&config);
        let cancel = cancel.clone();
        let running = Arc::clone(&running);
        Job::new_async(schedule.as_str(), move |_uuid, _lock| {
            let config = Arc::clone(&config);
            let cancel = cancel.clone();
            let running = Arc::clone(&running);

            Box::pin(async move {
                let Ok(_guard) = running.try_lock() else {
                    tracing::warn!("scheduler: previous collection still running; skipping");
                    return;
                };
                if cancel.is_cancelled() {
                    return;
                }
                tracing::info!("scheduler: starting collection run");
                run_scheduled_batch(&config, &cancel).await;
                tracing::info!("scheduler: collection run complete");
            })
        })?
    };
    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(schedule = %config.report_schedule, "scheduler started");
    println!(
        "Collecting on schedule '{}'. Press Ctrl-C to stop.",
        config.report_schedule
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("received shutdown signal, stopping scheduler");
    cancel.cancel();
    scheduler.shutdown().await?;

    // Let an in-flight batch record its cancelled report before exiting.
    let _idle = running.lock().await;
    Ok(())
}

async fn run_scheduled_batch(config: &AppConfig, cancel: &CancelSignal) {
    match collect_once(config, true, cancel).await {
        Ok(run) => tracing::info!(
            run_id = %run.report.run_id,
            summary = %run.report.summary_line(),
            written = run.delivery.written,
            notified = run.delivery.notified,
            "scheduler: batch finished"
        ),
        Err(e) => tracing::error!(error = %e, "scheduler: batch failed"),
    }
}
