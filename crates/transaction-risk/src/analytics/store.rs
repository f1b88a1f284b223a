use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnalysisResult, RiskCategory, Transaction, User, UserId};

/// Persisted row for one completed analysis. `metrics` carries the full
/// typed result, so the stored row and the webhook body never diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub user_id: UserId,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub eligible: bool,
    pub eligibility_reason: String,
    pub metrics: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

impl StoredResult {
    pub fn from_analysis(user_id: UserId, result: &AnalysisResult) -> Self {
        Self {
            user_id,
            risk_score: result.overall_risk_score,
            risk_category: result.risk_category,
            eligible: result.loan_eligibility,
            eligibility_reason: result.eligibility_reason.clone(),
            metrics: result.clone(),
            created_at: result.created_at,
        }
    }
}

/// Storage abstraction so the service facade can be exercised in isolation.
/// Implementations own connection handling; the analytics core carries no
/// global client state.
pub trait AnalyticsStore: Send + Sync {
    fn find_user(&self, account_no: &str, ifsc_code: &str) -> Result<Option<User>, StoreError>;
    fn list_transactions(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, StoreError>;
    fn save_result(
        &self,
        user_id: &UserId,
        result: &AnalysisResult,
    ) -> Result<StoredResult, StoreError>;
    fn latest_result(&self, user_id: &UserId) -> Result<Option<StoredResult>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
