use clap::Args;
use transaction_risk::analytics::RiskModel;
use transaction_risk::error::AppError;

use crate::infra::demo_history;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Months of sample history to score (capped at 6)
    #[arg(long, default_value_t = 6)]
    pub(crate) months: u32,
    /// Print the full analysis result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let history = demo_history(args.months);
    let result = RiskModel::new().analyze(&history);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    println!("Transaction Risk Analytics demo");
    println!("  transactions analyzed: {}", history.len());
    println!("  overall risk score:    {}", result.overall_risk_score);
    println!("  risk category:         {:?}", result.risk_category);
    println!("  loan eligibility:      {}", result.loan_eligibility);
    println!("  reason:                {}", result.eligibility_reason);
    println!("  factors:");
    for factor in &result.risk_assessment_details.loan_eligibility_factors {
        println!("    - {factor}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_history_scores_without_panicking() {
        let result = RiskModel::new().analyze(&demo_history(6));
        assert!((0.0..=100.0).contains(&result.overall_risk_score));
        assert!(!result
            .risk_assessment_details
            .loan_eligibility_factors
            .is_empty());
    }
}
