//! Outbound delivery of completed results to a configured endpoint.
//!
//! Delivery is best-effort from the caller's perspective: a stored analysis
//! result is never invalidated because its webhook failed.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{AnalysisResult, UserId};

const USER_AGENT: &str = "TransactionRiskAnalytics/1.0";
const MAX_ATTEMPTS: u32 = 3;
const BASE_DELAY: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body posted to the webhook endpoint; the result travels verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub user_id: UserId,
    pub analysis_result: AnalysisResult,
    pub timestamp: DateTime<Utc>,
}

/// Trait describing outbound result delivery so the service facade and
/// tests can swap transports.
pub trait ResultNotifier: Send + Sync {
    fn deliver(
        &self,
        endpoint: &str,
        payload: &WebhookPayload,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Delivery error. Client-side rejections are terminal; transport and
/// upstream failures are worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook rejected with client error {0}")]
    Rejected(u16),
    #[error("webhook upstream error {0}")]
    Upstream(u16),
}

impl NotifyError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, NotifyError::Transport(_) | NotifyError::Upstream(_))
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    BASE_DELAY * 2u32.pow(attempt)
}

/// HTTP notifier posting JSON payloads with bounded retries and
/// exponential backoff. 4xx responses are not retried.
pub struct WebhookNotifier {
    client: reqwest::Client,
    secret: Option<String>,
}

impl WebhookNotifier {
    pub fn new(secret: Option<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, secret })
    }

    async fn try_send(&self, endpoint: &str, payload: &WebhookPayload) -> Result<(), NotifyError> {
        let mut request = self
            .client
            .post(endpoint)
            .header("X-Webhook-Source", "transaction-risk-api")
            .json(payload);
        if let Some(secret) = &self.secret {
            request = request.header("X-Webhook-Secret", secret);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status.is_client_error() {
            Err(NotifyError::Rejected(status.as_u16()))
        } else {
            Err(NotifyError::Upstream(status.as_u16()))
        }
    }
}

impl ResultNotifier for WebhookNotifier {
    async fn deliver(&self, endpoint: &str, payload: &WebhookPayload) -> Result<(), NotifyError> {
        let mut attempt = 0;
        loop {
            match self.try_send(endpoint, payload).await {
                Ok(()) => {
                    info!(%endpoint, user = %payload.user_id, "webhook delivered");
                    return Ok(());
                }
                Err(err) if !err.is_retryable() || attempt + 1 >= MAX_ATTEMPTS => {
                    return Err(err);
                }
                Err(err) => {
                    warn!(
                        %endpoint,
                        attempt = attempt + 1,
                        error = %err,
                        "webhook attempt failed; retrying"
                    );
                    tokio::time::sleep(backoff_delay(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_terminal() {
        assert!(!NotifyError::Rejected(404).is_retryable());
        assert!(NotifyError::Upstream(503).is_retryable());
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
    }
}
