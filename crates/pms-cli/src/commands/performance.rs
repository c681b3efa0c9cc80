use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use pms_core::performance::growth;
use pms_core::performance::ratios::{calculate_ratios, RatioInput};
use pms_core::performance::volatility::{annualised_volatility, ReturnFrequency};
use pms_core::time_value;

use crate::input;

/// Arguments for risk-adjusted ratio calculations
#[derive(Args)]
pub struct RatiosArgs {
    /// Time-weighted return over the holding period, in percent
    #[arg(long, allow_hyphen_values = true)]
    pub twr: Decimal,

    /// Annualised volatility as a decimal; estimated from --returns when omitted
    #[arg(long)]
    pub volatility: Option<Decimal>,

    /// Comma-separated periodic returns (e.g. "0.05,0.02,-0.01,0.03")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub returns: Option<Vec<Decimal>>,

    /// Return frequency for annualisation: daily, weekly, monthly, quarterly, annual
    #[arg(long, default_value = "monthly")]
    pub frequency: String,

    /// Risk-free rate (annualised)
    #[arg(long, default_value = "0.06")]
    pub risk_free_rate: Decimal,

    /// Portfolio beta against the market benchmark
    #[arg(long, default_value = "1.1")]
    pub beta: Decimal,

    /// Expected market return (annualised)
    #[arg(long, default_value = "0.15")]
    pub market_return: Decimal,
}

/// Arguments for the CAGR calculation
#[derive(Args)]
pub struct CagrArgs {
    /// Current net asset value (₹ Lakhs)
    #[arg(long)]
    pub nav: Decimal,

    /// Capital committed (₹ Lakhs)
    #[arg(long)]
    pub capital: Decimal,

    /// Holding period start (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Holding period end (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,
}

/// Arguments for the IRR calculation
#[derive(Args)]
pub struct IrrArgs {
    /// Capital committed (₹ Lakhs); required unless --flows is given
    #[arg(long)]
    pub capital: Option<Decimal>,

    /// Time-weighted return in percent; required unless --flows is given
    #[arg(long, allow_hyphen_values = true)]
    pub twr: Option<Decimal>,

    /// Holding period start (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Holding period end (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Path to a JSON/YAML file of dated flows [{"date": ..., "amount": ...}];
    /// switches to exact XIRR over the actual dates
    #[arg(long)]
    pub flows: Option<String>,

    /// Initial guess for the root finder
    #[arg(long, default_value = "0.10")]
    pub guess: Decimal,
}

#[derive(Debug, Deserialize)]
struct DatedFlow {
    date: NaiveDate,
    amount: Decimal,
}

#[derive(Debug, Serialize)]
struct CagrOutput {
    cagr: Decimal,
    years: Decimal,
    nav: Decimal,
    capital: Decimal,
}

#[derive(Debug, Serialize)]
struct IrrOutput {
    irr: Decimal,
    method: String,
    num_flows: usize,
}

fn parse_frequency(frequency: &str) -> Result<ReturnFrequency, Box<dyn std::error::Error>> {
    match frequency.to_lowercase().as_str() {
        "daily" => Ok(ReturnFrequency::Daily),
        "weekly" => Ok(ReturnFrequency::Weekly),
        "monthly" => Ok(ReturnFrequency::Monthly),
        "quarterly" => Ok(ReturnFrequency::Quarterly),
        "annual" | "annually" => Ok(ReturnFrequency::Annual),
        _ => Err(format!(
            "Unknown frequency '{}'. Use: daily, weekly, monthly, quarterly, annual",
            frequency
        )
        .into()),
    }
}

pub fn run_ratios(args: RatiosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let volatility = match (args.volatility, &args.returns) {
        (Some(vol), _) => vol,
        (None, Some(returns)) => {
            let frequency = parse_frequency(&args.frequency)?;
            annualised_volatility(returns, frequency)?
        }
        (None, None) => {
            return Err("Provide --volatility or --returns to estimate it from".into());
        }
    };

    let input = RatioInput {
        twr_pct: args.twr,
        volatility,
        risk_free_rate: args.risk_free_rate,
        beta: args.beta,
        market_return: args.market_return,
    };
    let output = calculate_ratios(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_cagr(args: CagrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rate = growth::cagr(args.nav, args.capital, args.start, args.end)?;
    let years = growth::year_fraction(args.start, args.end)?;

    let output = CagrOutput {
        cagr: rate,
        years,
        nav: args.nav,
        capital: args.capital,
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.flows {
        let flows: Vec<DatedFlow> = input::file::read_input(path)?;
        if flows.len() < 2 {
            return Err("At least 2 dated flows are required".into());
        }
        let dated: Vec<(NaiveDate, Decimal)> =
            flows.iter().map(|f| (f.date, f.amount)).collect();
        let rate = time_value::xirr(&dated, args.guess)?;

        let output = IrrOutput {
            irr: rate,
            method: "xirr_dated_flows".into(),
            num_flows: dated.len(),
        };
        return Ok(serde_json::to_value(output)?);
    }

    let (capital, twr, start, end) = match (args.capital, args.twr, args.start, args.end) {
        (Some(c), Some(t), Some(s), Some(e)) => (c, t, s, e),
        _ => {
            return Err(
                "Provide --capital, --twr, --start, and --end, or a --flows file".into(),
            );
        }
    };

    let rate = growth::holding_irr(capital, twr, start, end)?;
    let days = (end - start).num_days();
    let num_flows = (days / 30).max(1) as usize + 1;

    let output = IrrOutput {
        irr: rate,
        method: "holding_period_monthly".into(),
        num_flows,
    };
    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_frequency_aliases() {
        assert!(parse_frequency("Monthly").is_ok());
        assert!(parse_frequency("annually").is_ok());
        assert!(parse_frequency("fortnightly").is_err());
    }

    #[test]
    fn test_run_cagr_fixture() {
        let args = CagrArgs {
            nav: dec!(150),
            capital: dec!(100),
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        };
        let value = run_cagr(args).unwrap();
        let cagr: Decimal = value
            .get("cagr")
            .and_then(|v| v.as_str())
            .unwrap()
            .parse()
            .unwrap();
        assert!((cagr - dec!(0.2247)).abs() < dec!(0.001));
    }
}
