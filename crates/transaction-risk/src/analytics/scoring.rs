//! Final pipeline stage: composite risk score, risk tier, and the loan
//! eligibility rule cascade.

use std::collections::BTreeMap;

use chrono::Utc;

use super::domain::{
    AnalysisResult, BehavioralAnalysis, BehavioralPatterns, FinancialSummary, RiskAssessmentDetails,
    RiskCategory, SpendingStability,
};
use super::stats::mean;

/// Mean of the signed per-month savings rates; zero when no months exist.
pub(crate) fn avg_savings_rate(behavioral: &BehavioralAnalysis) -> f64 {
    let rates: Vec<f64> = behavioral
        .income_and_spending_analysis
        .values()
        .map(|flow| flow.savings_rate)
        .collect();
    mean(&rates)
}

/// Weighted sum of volatility, consistency, behavioral, savings, and
/// frequency terms, clamped to [0, 100].
pub(crate) fn overall_score(
    summary: &FinancialSummary,
    behavioral: &BehavioralAnalysis,
) -> f64 {
    let patterns = &behavioral.behavioral_patterns;

    let volatility_score = (summary.income_volatility + summary.spending_volatility) * 50.0;
    let consistency_bonus = (1.0 - summary.consistency_score) * 20.0;
    let behavioral_risk = patterns.high_risk_spending_ratio * 30.0
        + (patterns.weekend_spending_ratio - 0.2).max(0.0) * 20.0;
    let essential_bonus = ((0.6 - patterns.essential_spending_ratio) * 15.0).max(0.0);
    let savings_risk = ((0.1 - avg_savings_rate(behavioral)) * 25.0).max(0.0);

    // Both very thin and very busy histories read as riskier; the
    // thresholds cannot overlap.
    let freq_risk = if summary.transaction_frequency < 20 {
        10.0
    } else if summary.transaction_frequency > 300 {
        5.0
    } else {
        0.0
    };

    let total = volatility_score
        + consistency_bonus
        + behavioral_risk
        + essential_bonus
        + savings_risk
        + freq_risk;

    total.clamp(0.0, 100.0)
}

pub(crate) fn risk_category(score: f64) -> RiskCategory {
    if score < 40.0 {
        RiskCategory::Low
    } else if score < 70.0 {
        RiskCategory::Medium
    } else {
        RiskCategory::High
    }
}

/// Short-circuit rule cascade: the first failing rule decides. When every
/// rule passes, the reason enumerates the profile's strengths.
pub(crate) fn decide_eligibility(
    score: f64,
    summary: &FinancialSummary,
    behavioral: &BehavioralAnalysis,
) -> (bool, String) {
    if score > 75.0 {
        return (
            false,
            "High risk profile with significant financial volatility".to_string(),
        );
    }

    let patterns = &behavioral.behavioral_patterns;

    if patterns.essential_spending_ratio < 0.3 {
        return (
            false,
            "Insufficient essential spending pattern indicating unstable lifestyle".to_string(),
        );
    }

    if patterns.high_risk_spending_ratio > 0.25 {
        return (
            false,
            "Excessive high-risk spending indicating poor financial discipline".to_string(),
        );
    }

    let savings_rate = avg_savings_rate(behavioral);
    if savings_rate < -0.1 {
        return (
            false,
            "Negative savings rate indicating financial stress".to_string(),
        );
    }

    if summary.consistency_score < 0.3 {
        return (false, "Highly inconsistent financial behavior".to_string());
    }

    let mut strengths = Vec::new();
    if patterns.essential_spending_ratio > 0.5 {
        strengths.push("stable essential spending");
    }
    if patterns.high_risk_spending_ratio < 0.15 {
        strengths.push("controlled discretionary spending");
    }
    if summary.consistency_score > 0.7 {
        strengths.push("consistent financial behavior");
    }
    if savings_rate > 0.05 {
        strengths.push("positive savings rate");
    }
    if strengths.is_empty() {
        strengths.push("acceptable risk profile");
    }

    (true, format!("Eligible based on {}", strengths.join(", ")))
}

/// Fixed sentinel returned when there is no history to score.
pub(crate) fn empty_result() -> AnalysisResult {
    AnalysisResult {
        overall_risk_score: 50.0,
        risk_category: RiskCategory::Medium,
        loan_eligibility: false,
        eligibility_reason: "Insufficient transaction history for assessment".to_string(),
        financial_summary: FinancialSummary {
            monthly_spendings: BTreeMap::new(),
            monthly_savings: BTreeMap::new(),
            total_savings: 0.0,
            income_volatility: 0.0,
            spending_volatility: 0.0,
            consistency_score: 0.0,
            transaction_frequency: 0,
        },
        behavioral_analysis: BehavioralAnalysis {
            spending_pattern_distribution: BTreeMap::new(),
            income_and_spending_analysis: BTreeMap::new(),
            spending_stability: SpendingStability::Medium,
            behavioral_patterns: BehavioralPatterns {
                essential_spending_ratio: 0.0,
                high_risk_spending_ratio: 0.0,
                weekend_spending_ratio: 0.0,
            },
        },
        risk_assessment_details: RiskAssessmentDetails {
            risk_essential_spending: 50.0,
            high_risk_spending: 0.0,
            weekend_spending: 0.0,
            loan_eligibility_factors: vec!["Insufficient data".to_string()],
        },
        created_at: Utc::now(),
    }
}
