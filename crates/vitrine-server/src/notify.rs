//! Outbound webhook fired after a subscription is recorded.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::subscriptions::Subscription;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from webhook")]
    UnexpectedStatus { status: u16 },
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    event: &'static str,
    #[serde(flatten)]
    subscription: &'a Subscription,
}

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("vitrine/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// POSTs the subscription as JSON. No retries.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] on transport failure or a non-2xx response.
    pub async fn notify(&self, subscription: &Subscription) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload {
                event: "subscription",
                subscription,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Fires [`WebhookNotifier::notify`] on a background task; failures are
    /// logged and dropped.
    pub fn spawn_notify(&self, subscription: Subscription) {
        let notifier = self.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&subscription).await {
                tracing::warn!(error = %e, "subscription webhook failed");
            } else {
                tracing::debug!("subscription webhook delivered");
            }
        });
    }
}
