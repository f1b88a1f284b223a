//! Transaction analytics pipeline and its service scaffolding.
//!
//! The pipeline runs five stages strictly forward over one in-memory batch:
//! normalize, summarize, analyze behavior, assess risk, score and decide.
//! No stage mutates a prior stage's output, and the whole run is a pure
//! function of the transaction list apart from the result timestamp.

mod assessment;
mod behavior;
mod normalizer;
mod scoring;
mod stats;
mod summary;

pub mod domain;
pub mod notify;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    AnalysisResult, BehavioralAnalysis, BehavioralPatterns, FinancialSummary, MonthlyFlow,
    RiskAssessmentDetails, RiskCategory, SpendingStability, Transaction, TransactionKind, User,
    UserId,
};
pub use notify::{NotifyError, ResultNotifier, WebhookNotifier, WebhookPayload};
pub use router::analytics_router;
pub use service::{AnalysisReport, AnalysisService, AnalysisServiceError};
pub use store::{AnalyticsStore, StoreError, StoredResult};

use chrono::Utc;
use stats::round1;

/// Stateless scorer turning a transaction window into an [`AnalysisResult`].
///
/// `analyze` is total: it never errors for well-typed input and falls back
/// to a fixed sentinel result when the window is empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskModel;

impl RiskModel {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, transactions: &[Transaction]) -> AnalysisResult {
        if transactions.is_empty() {
            return scoring::empty_result();
        }

        let rows = normalizer::normalize(transactions);
        let financial_summary = summary::summarize(&rows);
        let behavioral_analysis = behavior::analyze_behavior(&rows);
        let risk_assessment_details = assessment::assess(&behavioral_analysis);

        let score = scoring::overall_score(&financial_summary, &behavioral_analysis);
        let risk_category = scoring::risk_category(score);
        let (loan_eligibility, eligibility_reason) =
            scoring::decide_eligibility(score, &financial_summary, &behavioral_analysis);

        AnalysisResult {
            overall_risk_score: round1(score),
            risk_category,
            loan_eligibility,
            eligibility_reason,
            financial_summary,
            behavioral_analysis,
            risk_assessment_details,
            created_at: Utc::now(),
        }
    }
}
