use thiserror::Error;

/// Report persistence and delivery failures. Never invalidates a report that
/// has already been assembled.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write report to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("notification transport error: {0}")]
    Notify(#[from] reqwest::Error),

    #[error("notification relay rejected the message with status {status}: {body}")]
    Relay { status: u16, body: String },
}
