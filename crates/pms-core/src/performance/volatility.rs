use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PmsError;
use crate::types::{ClientRecord, Rate, RiskProfile};
use crate::PmsResult;

/// Frequency of return observations
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ReturnFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl ReturnFrequency {
    /// Number of periods in a year for annualisation
    pub fn periods_per_year(&self) -> Decimal {
        match self {
            ReturnFrequency::Daily => dec!(252),
            ReturnFrequency::Weekly => dec!(52),
            ReturnFrequency::Monthly => dec!(12),
            ReturnFrequency::Quarterly => dec!(4),
            ReturnFrequency::Annual => dec!(1),
        }
    }
}

/// Source of the annualised volatility figure the risk-adjusted ratios
/// divide by. Implementations must be deterministic for a given record.
pub trait VolatilityEstimator {
    fn estimate(&self, record: &ClientRecord) -> PmsResult<Rate>;
}

/// Annualised sample standard deviation of a return series.
pub fn annualised_volatility(returns: &[Rate], frequency: ReturnFrequency) -> PmsResult<Rate> {
    let n = returns.len();
    if n < 2 {
        return Err(PmsError::InsufficientData(
            "At least 2 return observations required to estimate volatility".into(),
        ));
    }

    let n_dec = Decimal::from(n as i64);
    let mean: Decimal = returns.iter().sum::<Decimal>() / n_dec;
    let sum_sq: Decimal = returns.iter().map(|r| (r - mean) * (r - mean)).sum();
    let variance = sum_sq / Decimal::from((n - 1) as i64);

    Ok(sqrt_decimal(variance) * sqrt_decimal(frequency.periods_per_year()))
}

/// Historical volatility from the record's own periodic returns.
#[derive(Debug, Clone, Copy)]
pub struct HistoricalVolatility {
    pub frequency: ReturnFrequency,
}

impl Default for HistoricalVolatility {
    fn default() -> Self {
        HistoricalVolatility {
            frequency: ReturnFrequency::Monthly,
        }
    }
}

impl VolatilityEstimator for HistoricalVolatility {
    fn estimate(&self, record: &ClientRecord) -> PmsResult<Rate> {
        annualised_volatility(&record.periodic_returns, self.frequency)
    }
}

/// Deterministic midpoint of the risk-profile volatility band. The fallback
/// when a record carries no return series; never a random draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileBandVolatility;

impl ProfileBandVolatility {
    /// (lower, upper) annualised volatility band per profile.
    pub fn band(profile: RiskProfile) -> (Rate, Rate) {
        match profile {
            RiskProfile::Low => (dec!(0.05), dec!(0.10)),
            RiskProfile::Medium => (dec!(0.10), dec!(0.20)),
            RiskProfile::High => (dec!(0.20), dec!(0.35)),
        }
    }
}

impl VolatilityEstimator for ProfileBandVolatility {
    fn estimate(&self, record: &ClientRecord) -> PmsResult<Rate> {
        let (lower, upper) = Self::band(record.risk_profile);
        Ok((lower + upper) / dec!(2))
    }
}

pub(crate) fn sqrt_decimal(val: Decimal) -> Decimal {
    if val <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    val.sqrt().unwrap_or(Decimal::ZERO)
}
