//! Domain model shared by the scoring pipeline, the store, and the
//! notification payloads. One strongly typed `AnalysisResult` travels
//! unchanged from the model through persistence to the webhook body.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of an account holder.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account holder as resolved by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub account_no: String,
    pub ifsc_code: String,
}

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

/// A single dated, categorized money movement. Amounts are non-negative;
/// the direction lives in `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: DateTime<Utc>,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    #[serde(default, alias = "upi_app", skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

/// Risk tier derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

/// Qualitative stability of month-over-month spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpendingStability {
    Low,
    Medium,
    High,
}

/// Monthly aggregates and volatility measures over the analysis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub monthly_spendings: BTreeMap<String, f64>,
    pub monthly_savings: BTreeMap<String, f64>,
    pub total_savings: f64,
    pub income_volatility: f64,
    pub spending_volatility: f64,
    pub consistency_score: f64,
    pub transaction_frequency: usize,
}

/// Income, spending, and the signed savings rate for one month. Unlike the
/// clamped `monthly_savings`, the rate here can go negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFlow {
    pub income: f64,
    pub spending: f64,
    pub savings_rate: f64,
}

/// Fractions of debit volume falling into the fixed category vocabularies
/// and onto weekends. Each ratio lies in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralPatterns {
    pub essential_spending_ratio: f64,
    pub high_risk_spending_ratio: f64,
    pub weekend_spending_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralAnalysis {
    pub spending_pattern_distribution: BTreeMap<String, f64>,
    pub income_and_spending_analysis: BTreeMap<String, MonthlyFlow>,
    pub spending_stability: SpendingStability,
    pub behavioral_patterns: BehavioralPatterns,
}

/// Risk sub-scores and the qualitative eligibility factors behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessmentDetails {
    pub risk_essential_spending: f64,
    pub high_risk_spending: f64,
    pub weekend_spending: f64,
    pub loan_eligibility_factors: Vec<String>,
}

/// Complete output of one analysis run. Pure function of the input
/// transactions apart from `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_risk_score: f64,
    pub risk_category: RiskCategory,
    pub loan_eligibility: bool,
    pub eligibility_reason: String,
    pub financial_summary: FinancialSummary,
    pub behavioral_analysis: BehavioralAnalysis,
    pub risk_assessment_details: RiskAssessmentDetails,
    pub created_at: DateTime<Utc>,
}
