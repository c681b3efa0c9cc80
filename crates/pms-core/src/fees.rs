use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PmsError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, ALLOWED_TDS_RATES};
use crate::PmsResult;

/// Annual management fee schedule on AUM (₹ Lakhs). Each tier is an upper
/// bound (exclusive) and a flat annual rate; the final tier is open-ended.
/// A value sitting exactly on a bound belongs to the next (cheaper) tier.
const MGMT_FEE_TIERS: [(Option<Decimal>, Rate); 3] = [
    (Some(dec!(500)), dec!(0.015)),
    (Some(dec!(1000)), dec!(0.012)),
    (None, dec!(0.010)),
];

/// GST applied once to the combined fee base.
pub const GST_RATE: Rate = dec!(0.18);

/// Manager's share of profit above the hurdle.
pub const CARRY_RATE: Rate = dec!(0.10);

/// Default hurdle rate for the performance fee.
pub const DEFAULT_HURDLE: Rate = dec!(0.10);

/// Annual management fee on AUM. Simple flat rate per tier, no proration.
pub fn management_fee(aum: Money) -> PmsResult<Money> {
    if aum < Decimal::ZERO {
        return Err(PmsError::InvalidInput {
            field: "aum".into(),
            reason: "AUM cannot be negative".into(),
        });
    }
    Ok(aum * management_fee_rate(aum))
}

/// The tier rate applying to a given AUM.
pub fn management_fee_rate(aum: Money) -> Rate {
    MGMT_FEE_TIERS
        .iter()
        .find(|(upper, _)| upper.map_or(true, |u| aum < u))
        .map(|(_, rate)| *rate)
        .unwrap_or(dec!(0.010))
}

/// Profit share on growth above the hurdle. Growth and hurdle are decimal
/// fractions (0.10 = 10%), not percentages.
pub fn performance_fee(aum: Money, growth: Rate, hurdle: Rate) -> PmsResult<Money> {
    if aum < Decimal::ZERO {
        return Err(PmsError::InvalidInput {
            field: "aum".into(),
            reason: "AUM cannot be negative".into(),
        });
    }
    if hurdle < Decimal::ZERO {
        return Err(PmsError::InvalidInput {
            field: "hurdle".into(),
            reason: "Hurdle rate cannot be negative".into(),
        });
    }
    if growth > hurdle {
        Ok(aum * (growth - hurdle) * CARRY_RATE)
    } else {
        Ok(Decimal::ZERO)
    }
}

/// Flat GST on a fee amount.
pub fn gst(fee: Money) -> Money {
    fee * GST_RATE
}

/// Withholding on the four income heads, rounded to 2 decimal places.
/// The rate is a percent figure and must sit on one of the allowed slabs.
pub fn tds_amount(
    dividend: Money,
    interest: Money,
    short_term_gain: Money,
    long_term_gain: Money,
    rate_pct: Decimal,
) -> PmsResult<Money> {
    for (field, amount) in [
        ("dividend", dividend),
        ("interest", interest),
        ("short_term_gain", short_term_gain),
        ("long_term_gain", long_term_gain),
    ] {
        if amount < Decimal::ZERO {
            return Err(PmsError::InvalidInput {
                field: field.into(),
                reason: "Income amounts cannot be negative".into(),
            });
        }
    }
    if !ALLOWED_TDS_RATES.contains(&rate_pct) {
        return Err(PmsError::InvalidInput {
            field: "rate_pct".into(),
            reason: format!("TDS rate {rate_pct}% is not one of the allowed slabs"),
        });
    }

    let gross = dividend + interest + short_term_gain + long_term_gain;
    Ok((gross * rate_pct / dec!(100)).round_dp(2))
}

// ---------------------------------------------------------------------------
// Fee statement
// ---------------------------------------------------------------------------

/// Input for a full fee statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeStatementInput {
    /// Assets under management (₹ Lakhs)
    pub aum: Money,
    /// Annual portfolio growth as a decimal (0.12 = 12%)
    pub growth: Rate,
    /// Hurdle rate; defaults to 10%
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hurdle: Option<Rate>,
}

/// Output of a full fee statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeStatementOutput {
    pub management_fee: Money,
    pub performance_fee: Money,
    /// Combined base the GST is charged on
    pub fee_base: Money,
    pub gst: Money,
    pub total_payable: Money,
    pub management_fee_rate: Rate,
    pub hurdle: Rate,
    /// Total payable as a fraction of AUM; None when AUM is zero
    pub effective_rate: Option<Rate>,
}

/// Calculate the full fee statement for one account.
///
/// GST is charged once on the combined management + performance fee base,
/// not per fee head, so a future slab on the combined base drops in here.
pub fn calculate_fee_statement(
    input: &FeeStatementInput,
) -> PmsResult<ComputationOutput<FeeStatementOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let hurdle = input.hurdle.unwrap_or(DEFAULT_HURDLE);
    let mgmt = management_fee(input.aum)?;
    let perf = performance_fee(input.aum, input.growth, hurdle)?;

    if input.growth <= hurdle {
        warnings.push(format!(
            "Growth {} at or below hurdle {}; no performance fee accrued",
            input.growth, hurdle
        ));
    }

    let fee_base = mgmt + perf;
    let gst_amount = gst(fee_base);
    let total_payable = fee_base + gst_amount;

    let effective_rate = if input.aum.is_zero() {
        warnings.push("AUM is zero; effective rate undefined".into());
        None
    } else {
        Some(total_payable / input.aum)
    };

    let output = FeeStatementOutput {
        management_fee: mgmt,
        performance_fee: perf,
        fee_base,
        gst: gst_amount,
        total_payable,
        management_fee_rate: management_fee_rate(input.aum),
        hurdle,
        effective_rate,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Tiered Management Fee + Hurdle Performance Fee + GST on Combined Base",
        &serde_json::json!({
            "aum": input.aum.to_string(),
            "growth": input.growth.to_string(),
            "hurdle": hurdle.to_string(),
            "gst_rate": GST_RATE.to_string(),
            "carry_rate": CARRY_RATE.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// TDS statement
// ---------------------------------------------------------------------------

/// Input for a withholding computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TdsInput {
    pub dividend_income: Money,
    pub interest_income: Money,
    pub short_term_gain: Money,
    pub long_term_gain: Money,
    /// Withholding rate in percent, one of the allowed slabs
    pub rate_pct: Decimal,
}

/// Output of a withholding computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TdsOutput {
    pub gross_income: Money,
    pub dividend_income: Money,
    pub interest_income: Money,
    pub short_term_gain: Money,
    pub long_term_gain: Money,
    pub rate_pct: Decimal,
    /// Amount withheld, rounded to 2 decimal places
    pub tds: Money,
}

/// Calculate tax deducted at source across the four income heads.
pub fn calculate_tds(input: &TdsInput) -> PmsResult<ComputationOutput<TdsOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    let tds = tds_amount(
        input.dividend_income,
        input.interest_income,
        input.short_term_gain,
        input.long_term_gain,
        input.rate_pct,
    )?;

    let output = TdsOutput {
        gross_income: input.dividend_income
            + input.interest_income
            + input.short_term_gain
            + input.long_term_gain,
        dividend_income: input.dividend_income,
        interest_income: input.interest_income,
        short_term_gain: input.short_term_gain,
        long_term_gain: input.long_term_gain,
        rate_pct: input.rate_pct,
        tds,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "TDS on Aggregate Income Heads",
        &serde_json::json!({
            "rate_pct": input.rate_pct.to_string(),
            "rounding": "2dp",
        }),
        warnings,
        elapsed,
        output,
    ))
}
