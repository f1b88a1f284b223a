//! Second pipeline stage: monthly spend/income aggregates, clamped savings,
//! volatility measures, and the consistency score.

use std::collections::BTreeMap;

use super::domain::{FinancialSummary, TransactionKind};
use super::normalizer::NormalizedRow;
use super::stats::{coefficient_of_variation, round3};

#[derive(Debug, Default, Clone, Copy)]
struct MonthTotals {
    income: f64,
    spending: f64,
}

/// Sum credit and debit amounts per `YYYY-MM` bucket. Only months actually
/// present in the data appear; gaps are not synthesized as zero-months.
pub(crate) fn monthly_totals(rows: &[NormalizedRow]) -> BTreeMap<String, (f64, f64)> {
    let mut totals: BTreeMap<String, MonthTotals> = BTreeMap::new();
    for row in rows {
        let entry = totals.entry(row.month.clone()).or_default();
        match row.kind {
            TransactionKind::Credit => entry.income += row.amount,
            TransactionKind::Debit => entry.spending += row.amount,
        }
    }
    totals
        .into_iter()
        .map(|(month, totals)| (month, (totals.income, totals.spending)))
        .collect()
}

pub(crate) fn summarize(rows: &[NormalizedRow]) -> FinancialSummary {
    let totals = monthly_totals(rows);

    let mut monthly_spendings = BTreeMap::new();
    let mut monthly_savings = BTreeMap::new();
    let mut income_values = Vec::with_capacity(totals.len());
    let mut spending_values = Vec::with_capacity(totals.len());

    for (month, (income, spending)) in &totals {
        monthly_spendings.insert(month.clone(), *spending);
        // Savings floor at zero: an overdrawn month counts as zero saved,
        // not negative.
        monthly_savings.insert(month.clone(), (income - spending).max(0.0));
        income_values.push(*income);
        spending_values.push(*spending);
    }

    let income_volatility = coefficient_of_variation(&income_values);
    let spending_volatility = coefficient_of_variation(&spending_values);
    let consistency_score = (1.0 - (income_volatility + spending_volatility) / 2.0).max(0.0);

    FinancialSummary {
        total_savings: monthly_savings.values().sum(),
        monthly_spendings,
        monthly_savings,
        income_volatility: round3(income_volatility),
        spending_volatility: round3(spending_volatility),
        consistency_score: round3(consistency_score),
        transaction_frequency: rows.len(),
    }
}
