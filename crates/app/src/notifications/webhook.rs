//! Webhook Notifier

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::notifications::{NotificationError, OrderEvent, OrderNotifier};

/// POSTs each event as JSON to a configured URL, typically a mailer service.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    http: Client,
}

impl WebhookNotifier {
    /// Create a notifier posting to `url`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotificationError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NotificationError::Client)?;

        Ok(Self {
            url: url.into(),
            http,
        })
    }
}

#[async_trait]
impl OrderNotifier for WebhookNotifier {
    async fn notify(&self, event: &OrderEvent) -> Result<(), NotificationError> {
        let response = self.http.post(&self.url).json(event).send().await?;

        let status = response.status();

        if !status.is_success() {
            return Err(NotificationError::UnexpectedStatus(status.as_u16()));
        }

        Ok(())
    }
}
