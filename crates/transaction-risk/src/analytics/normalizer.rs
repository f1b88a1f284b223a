//! First pipeline stage: raw transactions to a uniform row shape with the
//! derived fields every later stage groups on.

use chrono::{DateTime, Datelike, Utc};

use super::domain::{Transaction, TransactionKind};

const WEEKEND_DAYS: [u32; 2] = [5, 6];

/// Ephemeral per-transaction row; lives only for the duration of one
/// analysis call and is never serialized.
#[derive(Debug, Clone)]
pub(crate) struct NormalizedRow {
    pub(crate) date: DateTime<Utc>,
    pub(crate) amount: f64,
    pub(crate) kind: TransactionKind,
    /// Lower-cased category label.
    pub(crate) category: String,
    /// `YYYY-MM` bucket of the transaction date.
    pub(crate) month: String,
    pub(crate) is_weekend: bool,
}

/// Pure transform: derive month bucket, weekday flags, and the normalized
/// category, then order ascending by date.
pub(crate) fn normalize(transactions: &[Transaction]) -> Vec<NormalizedRow> {
    let mut rows: Vec<NormalizedRow> = transactions
        .iter()
        .map(|transaction| {
            // chrono counts Monday as 0 here, matching the weekend set.
            let weekday = transaction.date.weekday().num_days_from_monday();
            NormalizedRow {
                date: transaction.date,
                amount: transaction.amount,
                kind: transaction.kind,
                category: transaction.category.to_lowercase(),
                month: transaction.date.format("%Y-%m").to_string(),
                is_weekend: WEEKEND_DAYS.contains(&weekday),
            }
        })
        .collect();

    rows.sort_by_key(|row| row.date);
    rows
}
