use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("renderer refused to open a session: {message}")]
    SessionStart { message: String },

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("renderer command {command} failed ({error}): {message}")]
    Driver {
        command: String,
        error: String,
        message: String,
    },

    #[error("render session is already closed")]
    SessionClosed,
}

impl RenderError {
    /// Returns `true` for errors worth retrying after a backoff delay:
    /// failed connections and 5xx responses.
    ///
    /// A timed-out request is not transient. The driver may already have
    /// acted on it, and resending `POST /session` would orphan that session.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.status().is_some_and(|s| s.is_server_error()),
            Self::Deserialize { .. }
            | Self::SessionStart { .. }
            | Self::Navigation { .. }
            | Self::Driver { .. }
            | Self::SessionClosed => false,
        }
    }
}
