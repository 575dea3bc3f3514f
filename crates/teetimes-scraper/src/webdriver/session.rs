use reqwest::Client;
use serde_json::{json, Value};

use super::protocol::{self, ElementRef};
use crate::error::RenderError;
use crate::renderer::{RenderSession, RenderedDocument};

/// A live browser session. Dropping an unclosed session schedules a
/// best-effort `DELETE` so the browser is not leaked.
#[derive(Debug)]
pub struct WebDriverSession {
    client: Client,
    session_url: String,
    session_id: String,
    open: bool,
}

impl WebDriverSession {
    pub(super) fn new(client: Client, endpoint: &str, session_id: String) -> Self {
        Self {
            client,
            session_url: format!("{endpoint}/session/{session_id}"),
            session_id,
            open: true,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl RenderSession for WebDriverSession {
    type Document = WebDriverDocument;

    async fn navigate(&mut self, url: &str) -> Result<WebDriverDocument, RenderError> {
        if !self.open {
            return Err(RenderError::SessionClosed);
        }

        let request = self
            .client
            .post(format!("{}/url", self.session_url))
            .json(&json!({ "url": url }));

        protocol::execute::<Value>(request, "navigate")
            .await
            .map_err(|err| match err {
                RenderError::Driver { error, message, .. } => RenderError::Navigation {
                    url: url.to_owned(),
                    message: format!("{error}: {message}"),
                },
                other => other,
            })?;

        Ok(WebDriverDocument {
            client: self.client.clone(),
            session_url: self.session_url.clone(),
        })
    }

    async fn close(mut self) -> Result<(), RenderError> {
        // Mark closed first: a failed DELETE must not be retried from Drop.
        self.open = false;
        let request = self.client.delete(&self.session_url);
        protocol::execute::<Value>(request, "delete session").await?;
        tracing::debug!(session_id = %self.session_id, "render session closed");
        Ok(())
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                session_id = %self.session_id,
                "render session dropped outside a runtime; it may leak"
            );
            return;
        };
        tracing::warn!(
            session_id = %self.session_id,
            "render session dropped without close; deleting in background"
        );
        let request = self.client.delete(&self.session_url);
        handle.spawn(async move {
            if let Err(e) = request.send().await {
                tracing::warn!(error = %e, "background session delete failed");
            }
        });
    }
}

/// Handle to the page loaded in a [`WebDriverSession`]. Queries go to the
/// live page, so repeated `find_all` calls observe script-rendered content.
#[derive(Debug)]
pub struct WebDriverDocument {
    client: Client,
    session_url: String,
}

/// Opaque WebDriver element reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebDriverElement(String);

impl RenderedDocument for WebDriverDocument {
    type Element = WebDriverElement;

    async fn find_all(&self, selector: &str) -> Result<Vec<WebDriverElement>, RenderError> {
        let request = self
            .client
            .post(format!("{}/elements", self.session_url))
            .json(&json!({ "using": "css selector", "value": selector }));
        let refs = protocol::execute::<Vec<ElementRef>>(request, "find elements").await?;
        Ok(refs.into_iter().map(|r| WebDriverElement(r.id)).collect())
    }

    async fn text(&self, element: &WebDriverElement) -> Result<String, RenderError> {
        let request = self
            .client
            .get(format!("{}/element/{}/text", self.session_url, element.0));
        protocol::execute::<String>(request, "element text").await
    }
}
