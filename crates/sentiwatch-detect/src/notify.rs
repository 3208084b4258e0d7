//! Outbound alert delivery via a configured webhook.
//!
//! One POST per fired alert. Delivery failure is the caller's to log; it
//! is never retried and never escalated to a different channel.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned status {status}")]
    UnexpectedStatus { status: u16 },
}

#[derive(Serialize)]
struct AlertPayload<'a> {
    subject: &'a str,
    body: &'a str,
}

/// Delivers alert decisions to a human operator via an HTTP webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl WebhookNotifier {
    /// Creates a notifier for the given webhook URL, with an optional
    /// bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(url: &str, token: Option<String>, timeout_secs: u64) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sentiwatch/0.1 (comment-monitoring)")
            .build()?;

        Ok(Self {
            client,
            url: url.to_owned(),
            token,
        })
    }

    /// Deliver one alert. Success is any 2xx response.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] on transport failure or
    /// [`NotifyError::UnexpectedStatus`] on a non-2xx response.
    pub async fn notify(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let payload = AlertPayload { subject, body };
        let response = self.client.post(&self.url).json(&payload);
        let response = match &self.token {
            Some(token) => response.bearer_auth(token),
            None => response,
        };

        let response = response.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
