//! Third pipeline stage: category distribution, per-month flow breakdown,
//! spending-stability tier, and the three behavioral ratios.

use std::collections::BTreeMap;

use super::domain::{
    BehavioralAnalysis, BehavioralPatterns, MonthlyFlow, SpendingStability, TransactionKind,
};
use super::normalizer::NormalizedRow;
use super::stats::{coefficient_of_variation, round3, EPSILON};
use super::summary::monthly_totals;

/// Categories treated as essential living costs.
pub(crate) const ESSENTIAL_CATEGORIES: [&str; 11] = [
    "groceries",
    "utilities",
    "rent",
    "mortgage",
    "insurance",
    "healthcare",
    "medicine",
    "fuel",
    "transport",
    "education",
    "bills",
];

/// Categories treated as high-risk discretionary spending.
pub(crate) const HIGH_RISK_CATEGORIES: [&str; 10] = [
    "gambling",
    "casino",
    "betting",
    "alcohol",
    "tobacco",
    "luxury",
    "entertainment",
    "gaming",
    "nightlife",
    "party",
];

pub(crate) fn analyze_behavior(rows: &[NormalizedRow]) -> BehavioralAnalysis {
    let debit_rows: Vec<&NormalizedRow> = rows
        .iter()
        .filter(|row| row.kind == TransactionKind::Debit)
        .collect();
    let total_debit: f64 = debit_rows.iter().map(|row| row.amount).sum();

    let mut spending_by_category: BTreeMap<String, f64> = BTreeMap::new();
    for row in &debit_rows {
        *spending_by_category.entry(row.category.clone()).or_default() += row.amount;
    }

    let spending_pattern_distribution = if total_debit > 0.0 {
        spending_by_category
            .iter()
            .map(|(category, amount)| (category.clone(), round3(amount / total_debit)))
            .collect()
    } else {
        BTreeMap::new()
    };

    let mut income_and_spending_analysis = BTreeMap::new();
    for (month, (income, spending)) in monthly_totals(rows) {
        income_and_spending_analysis.insert(
            month,
            MonthlyFlow {
                income,
                spending,
                // Signed on purpose: an overdrawn month yields a negative
                // rate, unlike the clamped monthly savings.
                savings_rate: (income - spending) / (income + EPSILON),
            },
        );
    }

    let behavioral_patterns = if total_debit > 0.0 {
        let sum_in = |set: &[&str]| -> f64 {
            debit_rows
                .iter()
                .filter(|row| set.contains(&row.category.as_str()))
                .map(|row| row.amount)
                .sum()
        };
        let weekend_spending: f64 = debit_rows
            .iter()
            .filter(|row| row.is_weekend)
            .map(|row| row.amount)
            .sum();

        BehavioralPatterns {
            essential_spending_ratio: round3(sum_in(&ESSENTIAL_CATEGORIES) / total_debit),
            high_risk_spending_ratio: round3(sum_in(&HIGH_RISK_CATEGORIES) / total_debit),
            weekend_spending_ratio: round3(weekend_spending / total_debit),
        }
    } else {
        BehavioralPatterns {
            essential_spending_ratio: 0.0,
            high_risk_spending_ratio: 0.0,
            weekend_spending_ratio: 0.0,
        }
    };

    BehavioralAnalysis {
        spending_pattern_distribution,
        income_and_spending_analysis,
        spending_stability: spending_stability(&debit_rows),
        behavioral_patterns,
    }
}

/// Tier the month-over-month variation of debit totals. Fewer than two
/// months of debit activity is not enough to judge a trend.
fn spending_stability(debit_rows: &[&NormalizedRow]) -> SpendingStability {
    let mut monthly_debits: BTreeMap<&str, f64> = BTreeMap::new();
    for row in debit_rows {
        *monthly_debits.entry(row.month.as_str()).or_default() += row.amount;
    }

    if monthly_debits.len() < 2 {
        return SpendingStability::Medium;
    }

    let values: Vec<f64> = monthly_debits.into_values().collect();
    let cv = coefficient_of_variation(&values);

    if cv < 0.2 {
        SpendingStability::High
    } else if cv < 0.4 {
        SpendingStability::Medium
    } else {
        SpendingStability::Low
    }
}
