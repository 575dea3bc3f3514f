//! [`PageRenderer`] backed by a W3C WebDriver endpoint (e.g. chromedriver).

mod protocol;
mod session;

use std::time::Duration;

use reqwest::Client;

use crate::error::RenderError;
use crate::renderer::PageRenderer;
use crate::retry::retry_with_backoff;

pub use session::{WebDriverDocument, WebDriverElement, WebDriverSession};

/// Headroom on top of the page-load timeout before the HTTP call itself
/// gives up, so the driver reports its own timeout first.
const HTTP_TIMEOUT_MARGIN_SECS: u64 = 15;

/// Connection settings for [`WebDriverRenderer`].
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    /// Base URL of the driver, e.g. `http://localhost:9515`.
    pub endpoint: String,
    pub headless: bool,
    /// Page-load timeout enforced by the browser during navigation.
    pub navigation_timeout_secs: u64,
    /// Additional attempts when opening a session fails transiently.
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl WebDriverConfig {
    #[must_use]
    pub fn from_app_config(config: &teetimes_core::AppConfig) -> Self {
        Self {
            endpoint: config.webdriver_url.clone(),
            headless: config.headless,
            navigation_timeout_secs: config.navigation_timeout_secs,
            max_retries: config.renderer_max_retries,
            retry_backoff_ms: config.renderer_retry_backoff_ms,
        }
    }
}

/// Opens one browser session per [`PageRenderer::open`] call.
pub struct WebDriverRenderer {
    client: Client,
    endpoint: String,
    headless: bool,
    page_load_timeout_ms: u64,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl WebDriverRenderer {
    /// Creates a renderer for the configured driver endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &WebDriverConfig) -> Result<Self, RenderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(
                config
                    .navigation_timeout_secs
                    .saturating_add(HTTP_TIMEOUT_MARGIN_SECS),
            ))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_owned(),
            headless: config.headless,
            page_load_timeout_ms: config.navigation_timeout_secs.saturating_mul(1_000),
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PageRenderer for WebDriverRenderer {
    type Session = WebDriverSession;

    async fn open(&self) -> Result<WebDriverSession, RenderError> {
        let url = format!("{}/session", self.endpoint);
        let body = protocol::new_session_body(self.headless, self.page_load_timeout_ms);

        let created = retry_with_backoff(
            "new session",
            self.max_retries,
            self.retry_backoff_ms,
            || {
                let request = self.client.post(&url).json(&body);
                protocol::execute::<protocol::NewSession>(request, "new session")
            },
        )
        .await
        .map_err(|err| match err {
            RenderError::Driver { error, message, .. } => RenderError::SessionStart {
                message: format!("{error}: {message}"),
            },
            other => other,
        })?;

        tracing::debug!(session_id = %created.session_id, "render session opened");
        Ok(WebDriverSession::new(
            self.client.clone(),
            &self.endpoint,
            created.session_id,
        ))
    }
}
