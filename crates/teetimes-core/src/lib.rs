//! Shared domain types and configuration for tee-time availability collection.

mod app_config;
mod config;
mod facility;

use thiserror::Error;

pub use app_config::{AppConfig, NotifyConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use facility::{
    CollectionReport, Facility, FacilityResult, FetchOutcome, OutcomeCounts, TimeSlotSample,
    NO_TEE_TIME_FOUND,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised while reading the facility list. Any of these aborts the
/// batch before a render session is opened.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("failed to read facility list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("facility list is empty (no header row)")]
    Empty,

    #[error("facility list header is missing required column \"{column}\"")]
    MissingColumn { column: String },

    #[error("facility list line {line}: missing value for \"{column}\"")]
    MissingField { line: usize, column: String },
}
