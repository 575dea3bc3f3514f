//! Outbound delivery of a finished report.
//!
//! [`RelayNotifier`] posts a JSON message to an HTTP mail relay with the CSV
//! embedded as a text attachment. [`LogNotifier`] is used when no relay is
//! configured and only records what would have been sent.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use teetimes_core::NotifyConfig;

use crate::error::SinkError;

pub const REPORT_SUBJECT: &str = "Daily Facility Report";
pub const REPORT_BODY: &str = "Please find the attached results.";

const RELAY_TIMEOUT_SECS: u64 = 30;

/// A message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment: String,
}

/// Delivery capability for a finished report.
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        notification: &Notification,
    ) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// Logs the notification instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), SinkError> {
        tracing::info!(
            subject = %notification.subject,
            attachment = %notification.attachment_name,
            bytes = notification.attachment.len(),
            "no notification relay configured; report not sent"
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    attachments: [RelayAttachment<'a>; 1],
}

#[derive(Serialize)]
struct RelayAttachment<'a> {
    filename: &'a str,
    content_type: &'static str,
    content: &'a str,
}

/// Sends notifications through an HTTP JSON mail relay.
pub struct RelayNotifier {
    client: Client,
    url: String,
    token: Option<String>,
    sender: String,
    recipient: String,
}

impl std::fmt::Debug for RelayNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayNotifier")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

impl RelayNotifier {
    /// # Errors
    ///
    /// Returns [`SinkError::Notify`] if the HTTP client cannot be built.
    pub fn new(
        url: &str,
        token: Option<String>,
        sender: &str,
        recipient: &str,
    ) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(RELAY_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("teetimes/0.1 (report-delivery)")
            .build()?;

        Ok(Self {
            client,
            url: url.to_owned(),
            token,
            sender: sender.to_owned(),
            recipient: recipient.to_owned(),
        })
    }
}

impl Notifier for RelayNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), SinkError> {
        let message = RelayMessage {
            from: &self.sender,
            to: [&self.recipient],
            subject: &notification.subject,
            text: &notification.body,
            attachments: [RelayAttachment {
                filename: &notification.attachment_name,
                content_type: "text/csv",
                content: &notification.attachment,
            }],
        };

        let mut request = self.client.post(&self.url).json(&message);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Relay {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(recipient = %self.recipient, "report notification delivered");
        Ok(())
    }
}

/// The notifier chosen from configuration.
#[derive(Debug)]
pub enum ConfiguredNotifier {
    Log(LogNotifier),
    Relay(RelayNotifier),
}

impl ConfiguredNotifier {
    /// Uses the relay when both an endpoint and a recipient are configured.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Notify`] if the relay client cannot be built.
    pub fn from_config(config: &NotifyConfig) -> Result<Self, SinkError> {
        match (&config.relay_url, &config.recipient) {
            (Some(url), Some(recipient)) => Ok(Self::Relay(RelayNotifier::new(
                url,
                config.token.clone(),
                &config.sender,
                recipient,
            )?)),
            _ => Ok(Self::Log(LogNotifier)),
        }
    }
}

impl Notifier for ConfiguredNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), SinkError> {
        match self {
            Self::Log(n) => n.notify(notification).await,
            Self::Relay(n) => n.notify(notification).await,
        }
    }
}
