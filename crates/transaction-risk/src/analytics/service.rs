use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{User, UserId};
use super::notify::{NotifyError, ResultNotifier, WebhookPayload};
use super::store::{AnalyticsStore, StoreError, StoredResult};
use super::RiskModel;

/// Service composing the store, risk model, and webhook delivery.
pub struct AnalysisService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    model: RiskModel,
    window_days: i64,
    webhook_url: Option<String>,
}

/// Outcome of one analysis run through the service facade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub user: User,
    pub result: StoredResult,
}

impl<S, N> AnalysisService<S, N>
where
    S: AnalyticsStore + 'static,
    N: ResultNotifier + 'static,
{
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        window_days: i64,
        webhook_url: Option<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            model: RiskModel::new(),
            window_days,
            webhook_url,
        }
    }

    /// Resolve the account holder, score their transaction window, persist
    /// the result, then deliver it to the configured endpoint if any.
    pub async fn analyze_account(
        &self,
        account_no: &str,
        ifsc_code: &str,
    ) -> Result<AnalysisReport, AnalysisServiceError> {
        let user = self.store.find_user(account_no, ifsc_code)?.ok_or_else(|| {
            AnalysisServiceError::UserNotFound {
                account_no: account_no.to_string(),
                ifsc_code: ifsc_code.to_string(),
            }
        })?;

        let since = Utc::now() - Duration::days(self.window_days);
        let transactions = self.store.list_transactions(&user.id, since)?;
        info!(
            user = %user.id,
            transactions = transactions.len(),
            window_days = self.window_days,
            "running risk analysis"
        );

        let result = self.model.analyze(&transactions);
        let stored = self.store.save_result(&user.id, &result)?;

        if let Some(endpoint) = &self.webhook_url {
            let payload = WebhookPayload {
                user_id: user.id.clone(),
                analysis_result: result,
                timestamp: Utc::now(),
            };
            // Best effort: a saved result stands even when delivery fails.
            if let Err(err) = self.notifier.deliver(endpoint, &payload).await {
                warn!(user = %user.id, error = %err, "webhook delivery failed");
            }
        }

        Ok(AnalysisReport {
            user,
            result: stored,
        })
    }

    /// Latest stored result for a user, for downstream consumers.
    pub fn latest(&self, user_id: &UserId) -> Result<StoredResult, AnalysisServiceError> {
        self.store
            .latest_result(user_id)?
            .ok_or_else(|| AnalysisServiceError::NoResults(user_id.clone()))
    }

    /// Re-deliver the latest stored result to an explicit endpoint.
    pub async fn resend_latest(
        &self,
        user_id: &UserId,
        endpoint: &str,
    ) -> Result<(), AnalysisServiceError> {
        let stored = self.latest(user_id)?;
        let payload = WebhookPayload {
            user_id: user_id.clone(),
            analysis_result: stored.metrics,
            timestamp: Utc::now(),
        };
        self.notifier.deliver(endpoint, &payload).await?;
        Ok(())
    }
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error("user not found for account {account_no} / {ifsc_code}")]
    UserNotFound {
        account_no: String,
        ifsc_code: String,
    },
    #[error("no analysis results for user {0}")]
    NoResults(UserId),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
