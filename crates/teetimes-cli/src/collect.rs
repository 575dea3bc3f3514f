//! `collect` command: one batch from facility list to delivered report.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use teetimes_core::{AppConfig, CollectionReport, FetchOutcome};
use teetimes_pipeline::{
    read_facilities, run_collection, CancelSignal, CollectSettings, CompletedRun,
    ConfiguredNotifier,
};
use teetimes_scraper::{facility_url, WebDriverConfig, WebDriverRenderer};

#[derive(Debug, Clone, Default, Args)]
pub struct CollectArgs {
    /// Facility list to read (overrides `TEETIMES_FACILITIES_PATH`)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Where to write the CSV report (overrides `TEETIMES_OUTPUT_PATH`)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Maximum facilities collected at once
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,

    /// Seconds to wait for tee-time markers on each page
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub wait_secs: Option<u64>,

    /// Write the report but do not send it
    #[arg(long)]
    pub no_notify: bool,

    /// List the facilities and URLs that would be visited, then exit
    #[arg(long)]
    pub dry_run: bool,
}

/// Applies command-line overrides on top of the environment configuration.
pub(crate) fn apply_overrides(mut config: AppConfig, args: &CollectArgs) -> AppConfig {
    if let Some(input) = &args.input {
        config.facilities_path.clone_from(input);
    }
    if let Some(output) = &args.output {
        config.output_path.clone_from(output);
    }
    if let Some(n) = args.concurrency {
        config.max_concurrent_facilities = usize::from(n);
    }
    if let Some(secs) = args.wait_secs {
        config.wait_budget_secs = secs;
    }
    config
}

pub(crate) async fn run_collect(config: AppConfig, args: &CollectArgs) -> anyhow::Result<()> {
    let config = apply_overrides(config, args);

    if args.dry_run {
        let facilities = read_facilities(&config.facilities_path).await?;
        println!(
            "dry-run: would collect {} facilities from {}:",
            facilities.len(),
            config.facilities_path.display()
        );
        for facility in &facilities {
            println!(
                "  {:<28} {}",
                facility.name,
                facility_url(&config.site_host, &facility.id)
            );
        }
        return Ok(());
    }

    let cancel = CancelSignal::new();
    let interrupt = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let result = collect_once(&config, !args.no_notify, &cancel).await;
    interrupt.abort();

    let run = result?;
    print_summary(&run.report);
    if !run.delivery.written {
        anyhow::bail!(
            "report could not be written to {}",
            config.output_path.display()
        );
    }
    println!("Report written to {}", config.output_path.display());
    Ok(())
}

/// Runs a single batch with a fresh renderer. Shared by `collect` and `schedule`.
pub(crate) async fn collect_once(
    config: &AppConfig,
    notify: bool,
    cancel: &CancelSignal,
) -> anyhow::Result<CompletedRun> {
    let renderer = Arc::new(WebDriverRenderer::new(&WebDriverConfig::from_app_config(
        config,
    ))?);
    let settings = CollectSettings::from_app_config(config);
    let notifier = if notify {
        Some(ConfiguredNotifier::from_config(&config.notify)?)
    } else {
        None
    };

    let run = run_collection(
        renderer,
        &config.facilities_path,
        &config.output_path,
        &settings,
        notifier.as_ref(),
        cancel,
    )
    .await?;
    Ok(run)
}

async fn cancel_on_ctrl_c(cancel: CancelSignal) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c; cancellation disabled");
        return;
    }
    tracing::warn!("interrupt received, cancelling collection");
    cancel.cancel();
}

fn print_summary(report: &CollectionReport) {
    for result in &report.results {
        let name = &result.facility.name;
        match &result.outcome {
            FetchOutcome::Found(sample) => {
                println!("  \u{2713} {name:<28} {} - {}", sample.first, sample.last);
            }
            FetchOutcome::NoData | FetchOutcome::TimedOut => {
                println!("  - {name:<28} no tee times ({})", result.outcome.label());
            }
            FetchOutcome::Failed { reason } => {
                println!("  \u{2717} {name:<28} {reason}");
            }
        }
    }
    println!("Run complete: {}", report.summary_line());
}
