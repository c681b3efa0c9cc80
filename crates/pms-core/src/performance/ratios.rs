use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PmsError;
use crate::types::{with_metadata, ComputationOutput, Rate};
use crate::PmsResult;

/// Default annualised risk-free rate.
pub const DEFAULT_RISK_FREE_RATE: Rate = dec!(0.06);

/// Default portfolio beta against the market benchmark.
pub const DEFAULT_BETA: Decimal = dec!(1.1);

/// Default expected market return.
pub const DEFAULT_MARKET_RETURN: Rate = dec!(0.15);

fn default_risk_free_rate() -> Rate {
    DEFAULT_RISK_FREE_RATE
}

fn default_beta() -> Decimal {
    DEFAULT_BETA
}

fn default_market_return() -> Rate {
    DEFAULT_MARKET_RETURN
}

/// Input for risk-adjusted ratio calculations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioInput {
    /// Time-weighted return over the holding period, in percent
    pub twr_pct: Decimal,
    /// Annualised volatility of the account's returns (as a decimal)
    pub volatility: Rate,
    /// Risk-free rate (annualised)
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: Rate,
    /// Portfolio beta against the market benchmark
    #[serde(default = "default_beta")]
    pub beta: Decimal,
    /// Expected market return (annualised)
    #[serde(default = "default_market_return")]
    pub market_return: Rate,
}

/// Output of risk-adjusted ratio calculations. `None` marks a ratio the
/// inputs cannot define (zero volatility, zero beta).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioOutput {
    /// The holding-period return as a decimal
    pub returns: Rate,
    pub sharpe: Option<Decimal>,
    pub treynor: Option<Decimal>,
    pub jensen: Decimal,
    pub volatility: Rate,
    pub beta: Decimal,
}

/// Calculate Sharpe, Treynor, and Jensen's alpha for one account.
pub fn calculate_ratios(input: &RatioInput) -> PmsResult<ComputationOutput<RatioOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.volatility < Decimal::ZERO {
        return Err(PmsError::InvalidInput {
            field: "volatility".into(),
            reason: "Volatility cannot be negative".into(),
        });
    }

    let returns = input.twr_pct / dec!(100);
    let excess = returns - input.risk_free_rate;

    let sharpe = if input.volatility.is_zero() {
        warnings.push("Zero volatility; Sharpe ratio undefined".into());
        None
    } else {
        Some(excess / input.volatility)
    };

    let treynor = if input.beta.is_zero() {
        warnings.push("Zero beta; Treynor ratio undefined".into());
        None
    } else {
        Some(excess / input.beta)
    };

    // Jensen's alpha: actual return over the CAPM-expected return
    let jensen = returns
        - (input.risk_free_rate + input.beta * (input.market_return - input.risk_free_rate));

    let output = RatioOutput {
        returns,
        sharpe,
        treynor,
        jensen,
        volatility: input.volatility,
        beta: input.beta,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Risk-Adjusted Ratios (Sharpe, Treynor, Jensen's Alpha)",
        &serde_json::json!({
            "risk_free_rate": input.risk_free_rate.to_string(),
            "beta": input.beta.to_string(),
            "market_return": input.market_return.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_input() -> RatioInput {
        RatioInput {
            twr_pct: dec!(18),
            volatility: dec!(0.12),
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            beta: DEFAULT_BETA,
            market_return: DEFAULT_MARKET_RETURN,
        }
    }

    #[test]
    fn test_sharpe_known_value() {
        // (0.18 - 0.06) / 0.12 = 1
        let result = calculate_ratios(&base_input()).unwrap();
        assert_eq!(result.result.sharpe, Some(dec!(1)));
    }

    #[test]
    fn test_treynor_known_value() {
        // (0.18 - 0.06) / 1.1 ≈ 0.10909
        let result = calculate_ratios(&base_input()).unwrap();
        let treynor = result.result.treynor.unwrap();
        assert!((treynor - dec!(0.10909)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_jensen_known_value() {
        // 0.18 - (0.06 + 1.1 * (0.15 - 0.06)) = 0.021
        let result = calculate_ratios(&base_input()).unwrap();
        assert_eq!(result.result.jensen, dec!(0.021));
    }

    #[test]
    fn test_zero_volatility_sharpe_undefined() {
        let mut input = base_input();
        input.volatility = Decimal::ZERO;
        let result = calculate_ratios(&input).unwrap();
        assert!(result.result.sharpe.is_none());
        assert!(result.result.treynor.is_some());
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_zero_beta_treynor_undefined() {
        let mut input = base_input();
        input.beta = Decimal::ZERO;
        let result = calculate_ratios(&input).unwrap();
        assert!(result.result.treynor.is_none());
        assert!(result.result.sharpe.is_some());
    }

    #[test]
    fn test_negative_volatility_rejected() {
        let mut input = base_input();
        input.volatility = dec!(-0.1);
        assert!(calculate_ratios(&input).is_err());
    }

    #[test]
    fn test_negative_twr_gives_negative_sharpe() {
        let mut input = base_input();
        input.twr_pct = dec!(-5);
        let result = calculate_ratios(&input).unwrap();
        assert!(result.result.sharpe.unwrap() < Decimal::ZERO);
    }
}
