//! Grouped-sum and grouped-stddev primitives backing the pipeline.
//! Population statistics throughout; every ratio denominator carries the
//! epsilon guard instead of erroring on degenerate series.

/// Additive guard against zero denominators.
pub(crate) const EPSILON: f64 = 1e-6;

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation: stddev over epsilon-guarded mean.
pub(crate) fn coefficient_of_variation(values: &[f64]) -> f64 {
    std_dev(values) / (mean(values) + EPSILON)
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
