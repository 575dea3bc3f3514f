mod collect;
mod schedule;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::collect::CollectArgs;

#[derive(Debug, Parser)]
#[command(name = "teetimes-cli")]
#[command(about = "Collect tee-time availability for a list of golf facilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one collection batch and deliver the report
    Collect(CollectArgs),
    /// Run collection batches on the configured cron schedule until interrupted
    Schedule,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = teetimes_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Collect(args) => collect::run_collect(config, &args).await,
        Commands::Schedule => schedule::run_schedule(config).await,
    }
}
