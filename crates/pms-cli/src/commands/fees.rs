use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use pms_core::fees::{calculate_fee_statement, calculate_tds, FeeStatementInput, TdsInput};

/// Arguments for the fee statement calculation
#[derive(Args)]
pub struct FeesArgs {
    /// Assets under management (₹ Lakhs)
    #[arg(long)]
    pub aum: Decimal,

    /// Annual portfolio growth as a decimal (0.12 = 12%)
    #[arg(long, allow_hyphen_values = true)]
    pub growth: Decimal,

    /// Hurdle rate for the performance fee
    #[arg(long, default_value = "0.10")]
    pub hurdle: Decimal,
}

/// Arguments for the TDS withholding calculation
#[derive(Args)]
pub struct TdsArgs {
    /// Dividend income (₹ Lakhs)
    #[arg(long, default_value = "0")]
    pub dividend: Decimal,

    /// Interest income (₹ Lakhs)
    #[arg(long, default_value = "0")]
    pub interest: Decimal,

    /// Short-term capital gain (₹ Lakhs)
    #[arg(long, default_value = "0")]
    pub stcg: Decimal,

    /// Long-term capital gain (₹ Lakhs)
    #[arg(long, default_value = "0")]
    pub ltcg: Decimal,

    /// Withholding rate in percent (5, 10, 15, 20, or 30)
    #[arg(long)]
    pub rate: Decimal,
}

pub fn run_fees(args: FeesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = FeeStatementInput {
        aum: args.aum,
        growth: args.growth,
        hurdle: Some(args.hurdle),
    };
    let output = calculate_fee_statement(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_tds(args: TdsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = TdsInput {
        dividend_income: args.dividend,
        interest_income: args.interest,
        short_term_gain: args.stcg,
        long_term_gain: args.ltcg,
        rate_pct: args.rate,
    };
    let output = calculate_tds(&input)?;
    Ok(serde_json::to_value(output)?)
}
