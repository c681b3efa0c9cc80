use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::PmsError;
use crate::time_value;
use crate::types::{Money, Rate, Years};
use crate::PmsResult;

const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Year fraction between two dates on a 365.25-day year.
pub fn year_fraction(start_date: NaiveDate, end_date: NaiveDate) -> PmsResult<Years> {
    let days = (end_date - start_date).num_days();
    if days <= 0 {
        return Err(PmsError::DateError(
            "End date must be after the start date".into(),
        ));
    }
    Ok(Decimal::from(days) / DAYS_PER_YEAR)
}

/// Compound annual growth rate from capital to NAV over the holding period,
/// as a decimal (0.2247 = 22.47%).
pub fn cagr(
    nav: Money,
    capital: Money,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> PmsResult<Rate> {
    if capital <= Decimal::ZERO {
        return Err(PmsError::InvalidInput {
            field: "capital".into(),
            reason: "Capital must be positive".into(),
        });
    }
    if nav <= Decimal::ZERO {
        return Err(PmsError::InvalidInput {
            field: "nav".into(),
            reason: "NAV must be positive".into(),
        });
    }

    let years = year_fraction(start_date, end_date)?;
    let ratio = nav / capital;

    Ok(ratio.powd(Decimal::ONE / years) - Decimal::ONE)
}

/// Holding-period IRR approximated from a single terminal inflow.
///
/// Builds the monthly sequence: the full capital out at inception, nothing
/// in the intermediate months, and `capital × (1 + twr_pct/100)` back at the
/// end. The result is a per-period (monthly) rate. Tranche-level dated flows
/// are not modelled here; use `time_value::xirr` with the actual tranche
/// dates for an exact figure.
pub fn holding_irr(
    capital: Money,
    twr_pct: Decimal,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> PmsResult<Rate> {
    if capital <= Decimal::ZERO {
        return Err(PmsError::InvalidInput {
            field: "capital".into(),
            reason: "Capital must be positive".into(),
        });
    }

    let days = (end_date - start_date).num_days();
    if days <= 0 {
        return Err(PmsError::DateError(
            "End date must be after the start date".into(),
        ));
    }

    let terminal = capital * (Decimal::ONE + twr_pct / dec!(100));
    let flows = time_value::holding_cash_flows(capital, terminal, days);

    if flows.len() < 2 || flows.first().map_or(true, |cf| *cf >= Decimal::ZERO) {
        return Err(PmsError::InsufficientData(
            "IRR requires an initial outflow followed by at least one flow".into(),
        ));
    }

    time_value::irr(&flows, dec!(0.10))
}
