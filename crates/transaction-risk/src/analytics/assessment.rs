//! Fourth pipeline stage: behavioral ratios to bounded risk sub-scores plus
//! the qualitative eligibility factors.

use super::domain::{BehavioralAnalysis, RiskAssessmentDetails, SpendingStability};
use super::stats::{coefficient_of_variation, round1};

pub(crate) fn assess(behavioral: &BehavioralAnalysis) -> RiskAssessmentDetails {
    let patterns = &behavioral.behavioral_patterns;

    // Sub-scores on a 0-100 scale; essential and weekend capped at 50.
    let risk_essential_spending = (50.0 - patterns.essential_spending_ratio * 50.0).max(0.0);
    let high_risk_spending = patterns.high_risk_spending_ratio * 100.0;
    let weekend_spending = (patterns.weekend_spending_ratio * 100.0).min(50.0);

    let mut factors = Vec::new();

    if patterns.essential_spending_ratio > 0.5 {
        factors.push("High essential spending ratio".to_string());
    }
    if patterns.high_risk_spending_ratio < 0.15 {
        factors.push("Low discretionary spending".to_string());
    }
    if matches!(
        behavioral.spending_stability,
        SpendingStability::High | SpendingStability::Medium
    ) {
        factors.push("Stable spending pattern".to_string());
    }

    let monthly_incomes: Vec<f64> = behavioral
        .income_and_spending_analysis
        .values()
        .map(|flow| flow.income)
        .collect();
    if monthly_incomes.len() > 1 && coefficient_of_variation(&monthly_incomes) < 0.3 {
        factors.push("Stable income".to_string());
    }

    if factors.is_empty() {
        factors.push("Standard risk profile".to_string());
    }

    RiskAssessmentDetails {
        risk_essential_spending: round1(risk_essential_spending),
        high_risk_spending: round1(high_risk_spending),
        weekend_spending: round1(weekend_spending),
        loan_eligibility_factors: factors,
    }
}
