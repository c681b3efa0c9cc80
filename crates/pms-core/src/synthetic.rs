use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PmsError;
use crate::performance::volatility::ProfileBandVolatility;
use crate::types::{
    AccountType, ClientRecord, MonitoringFlag, RiskProfile, ALLOWED_TDS_RATES,
};
use crate::PmsResult;

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Isha", "Rohan", "Meera", "Kabir", "Anaya", "Vikram", "Diya", "Arjun", "Nisha",
];
const LAST_NAMES: &[&str] = &[
    "Sharma", "Iyer", "Patel", "Khanna", "Reddy", "Menon", "Bose", "Desai",
];
const COUNTRIES: &[&str] = &["India", "USA", "UAE", "UK", "Singapore"];

/// Input for synthetic book generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticBookInput {
    /// Number of client records to generate (minimum 1).
    #[serde(default = "default_num_clients")]
    pub num_clients: u32,
    /// Optional seed for reproducibility.
    pub seed: Option<u64>,
}

fn default_num_clients() -> u32 {
    25
}

/// Generate a synthetic client book.
///
/// Records satisfy `ClientRecord::validate()` by construction and spread
/// AUM across all three fee tiers, all risk profiles, and both PEP states.
/// Pure given a seed; the once-per-session caching the reporting layer
/// wants belongs to the caller.
pub fn generate_book(input: &SyntheticBookInput) -> PmsResult<Vec<ClientRecord>> {
    if input.num_clients == 0 {
        return Err(PmsError::InvalidInput {
            field: "num_clients".into(),
            reason: "At least one client is required".into(),
        });
    }

    let mut rng = match input.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    Ok((0..input.num_clients)
        .map(|i| generate_record(i, &mut rng))
        .collect())
}

fn generate_record(index: u32, rng: &mut StdRng) -> ClientRecord {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    let country = COUNTRIES[rng.gen_range(0..COUNTRIES.len())];

    let account_type = match rng.gen_range(0..3) {
        0 => AccountType::Resident,
        1 => AccountType::Nre,
        _ => AccountType::Nro,
    };
    let risk_profile = match rng.gen_range(0..3) {
        0 => RiskProfile::Low,
        1 => RiskProfile::Medium,
        _ => RiskProfile::High,
    };
    let txn_monitoring_flag = match rng.gen_range(0..10) {
        0 => MonitoringFlag::Red,
        1 | 2 => MonitoringFlag::Yellow,
        _ => MonitoringFlag::Green,
    };

    // Capital in ₹ Lakhs, spanning all three fee tiers
    let total_capital = money(rng.gen_range(50.0..2500.0));
    let num_tranches = rng.gen_range(1..=6u32);
    let initial_tranche =
        (total_capital / Decimal::from(num_tranches)).round_dp(2);

    let investment_date = random_date(rng, 2020, 2023);
    let held_days = rng.gen_range(400..1800i64);
    let end_date = investment_date + Duration::days(held_days);
    let last_tranche_offset = rng.gen_range(0..=held_days.min(365));
    let last_tranche_date = investment_date + Duration::days(last_tranche_offset);

    let twr_pct = money(rng.gen_range(-10.0..40.0));
    let mwr_pct = (twr_pct + money(rng.gen_range(-2.0..2.0))).round_dp(2);
    let nav = (total_capital * (Decimal::ONE + twr_pct / dec!(100))).round_dp(2);

    // Monthly observations inside the profile's band, so historical and
    // band-based estimates stay in the same neighbourhood
    let (band_lower, band_upper) = ProfileBandVolatility::band(risk_profile);
    let monthly_spread = (band_lower + band_upper) / dec!(2) / dec!(3);
    let spread_f64 = monthly_spread.to_f64().unwrap_or(0.05);
    let periodic_returns = (0..12)
        .map(|_| rate(rng.gen_range(-spread_f64..spread_f64) + 0.01))
        .collect();

    let pep = rng.gen_range(0..8) == 0;
    let pep_status_date = pep.then(|| random_date(rng, 2018, 2022));

    let tds_rate_pct = ALLOWED_TDS_RATES[rng.gen_range(0..ALLOWED_TDS_RATES.len())];

    ClientRecord {
        client_id: format!("CL-{:04}", index + 1),
        name: format!("{first} {last}"),
        account_type,
        country: country.to_string(),
        total_capital,
        initial_tranche,
        num_tranches,
        investment_date,
        last_tranche_date,
        nav,
        start_date: investment_date,
        end_date,
        twr_pct,
        mwr_pct,
        periodic_returns,
        risk_profile,
        aml_risk_score: rng.gen_range(1..=100),
        pep,
        pep_status_date,
        txn_monitoring_flag,
        dividend_income: money(rng.gen_range(0.0..30.0)),
        interest_income: money(rng.gen_range(0.0..15.0)),
        short_term_gain: money(rng.gen_range(0.0..50.0)),
        long_term_gain: money(rng.gen_range(0.0..80.0)),
        tds_rate_pct,
        third_party_transaction: None,
        custody_reconciliation: None,
    }
}

fn money(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default().round_dp(2)
}

fn rate(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default().round_dp(4)
}

fn random_date(rng: &mut StdRng, year_from: i32, year_to: i32) -> NaiveDate {
    let year = rng.gen_range(year_from..=year_to);
    let month = rng.gen_range(1..=12u32);
    let day = rng.gen_range(1..=28u32);
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_records_validate() {
        let input = SyntheticBookInput {
            num_clients: 50,
            seed: Some(42),
        };
        let book = generate_book(&input).unwrap();
        assert_eq!(book.len(), 50);
        for record in &book {
            record.validate().unwrap();
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let input = SyntheticBookInput {
            num_clients: 10,
            seed: Some(7),
        };
        let a = generate_book(&input).unwrap();
        let b = generate_book(&input).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.client_id, y.client_id);
            assert_eq!(x.name, y.name);
            assert_eq!(x.total_capital, y.total_capital);
            assert_eq!(x.twr_pct, y.twr_pct);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_book(&SyntheticBookInput {
            num_clients: 10,
            seed: Some(1),
        })
        .unwrap();
        let b = generate_book(&SyntheticBookInput {
            num_clients: 10,
            seed: Some(2),
        })
        .unwrap();
        assert!(a
            .iter()
            .zip(b.iter())
            .any(|(x, y)| x.total_capital != y.total_capital));
    }

    #[test]
    fn test_zero_clients_rejected() {
        let input = SyntheticBookInput {
            num_clients: 0,
            seed: None,
        };
        assert!(generate_book(&input).is_err());
    }

    #[test]
    fn test_pep_date_always_paired() {
        let input = SyntheticBookInput {
            num_clients: 200,
            seed: Some(99),
        };
        let book = generate_book(&input).unwrap();
        for record in &book {
            assert_eq!(record.pep, record.pep_status_date.is_some());
        }
    }

    #[test]
    fn test_return_series_present() {
        let input = SyntheticBookInput {
            num_clients: 5,
            seed: Some(3),
        };
        let book = generate_book(&input).unwrap();
        assert!(book.iter().all(|r| r.periodic_returns.len() == 12));
    }
}
