//! Wire types for the W3C WebDriver HTTP protocol.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::RenderError;

/// Every WebDriver response wraps its payload in `{"value": ...}`.
#[derive(Debug, Deserialize)]
pub(super) struct Envelope<T> {
    pub value: T,
}

#[derive(Debug, Deserialize)]
pub(super) struct NewSession {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Element reference, keyed by the W3C element identifier.
#[derive(Debug, Deserialize)]
pub(super) struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireError {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

/// Capabilities for a Chrome session. The page-load timeout bounds navigation.
pub(super) fn new_session_body(headless: bool, page_load_timeout_ms: u64) -> Value {
    let mut args = vec![
        "--no-sandbox",
        "--disable-dev-shm-usage",
        "--disable-gpu",
    ];
    if headless {
        args.insert(0, "--headless=new");
    }
    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": "chrome",
                "goog:chromeOptions": { "args": args },
                "timeouts": { "pageLoad": page_load_timeout_ms }
            }
        }
    })
}

/// Sends a prepared command and decodes the `value` payload.
///
/// Non-2xx responses carrying a WebDriver error body become
/// [`RenderError::Driver`]; anything else non-2xx becomes [`RenderError::Http`]
/// so gateway failures stay retriable.
pub(super) async fn execute<T>(
    request: reqwest::RequestBuilder,
    command: &str,
) -> Result<T, RenderError>
where
    T: DeserializeOwned,
{
    let response = request.send().await?;
    let status_error = response.error_for_status_ref().err();
    let body = response.text().await?;

    if let Some(status_error) = status_error {
        return match serde_json::from_str::<Envelope<WireError>>(&body) {
            Ok(envelope) => Err(RenderError::Driver {
                command: command.to_owned(),
                error: envelope.value.error,
                message: envelope.value.message,
            }),
            Err(_) => Err(RenderError::Http(status_error)),
        };
    }

    serde_json::from_str::<Envelope<T>>(&body)
        .map(|envelope| envelope.value)
        .map_err(|source| RenderError::Deserialize {
            context: format!("{command} response"),
            source,
        })
}
