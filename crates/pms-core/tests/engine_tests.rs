use chrono::NaiveDate;
use pms_core::engine::{derive_book_metrics, derive_client_metrics};
use pms_core::performance::volatility::{HistoricalVolatility, ProfileBandVolatility};
use pms_core::types::{AccountType, ClientRecord, MonitoringFlag, RiskProfile};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Metrics engine tests
// Per-record derivation, sentinel propagation, and the batch pass.
// ===========================================================================

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn record(id: &str, capital: Decimal, twr_pct: Decimal) -> ClientRecord {
    ClientRecord {
        client_id: id.into(),
        name: "Diya Patel".into(),
        account_type: AccountType::Resident,
        country: "India".into(),
        total_capital: capital,
        initial_tranche: capital,
        num_tranches: 1,
        investment_date: d(2023, 1, 1),
        last_tranche_date: d(2023, 1, 1),
        nav: (capital * (Decimal::ONE + twr_pct / dec!(100))).round_dp(2),
        start_date: d(2023, 1, 1),
        end_date: d(2025, 1, 1),
        twr_pct,
        mwr_pct: twr_pct,
        periodic_returns: vec![
            dec!(0.02),
            dec!(-0.01),
            dec!(0.03),
            dec!(0.01),
            dec!(0.00),
            dec!(0.02),
            dec!(0.01),
            dec!(-0.02),
            dec!(0.03),
            dec!(0.01),
            dec!(0.00),
            dec!(0.02),
        ],
        risk_profile: RiskProfile::Medium,
        aml_risk_score: 20,
        pep: false,
        pep_status_date: None,
        txn_monitoring_flag: MonitoringFlag::Green,
        dividend_income: dec!(8),
        interest_income: dec!(3),
        short_term_gain: dec!(12),
        long_term_gain: dec!(25),
        tds_rate_pct: dec!(10),
        third_party_transaction: None,
        custody_reconciliation: None,
    }
}

#[test]
fn test_good_record_yields_full_metrics() {
    let r = record("CL-0001", dec!(800), dec!(18));
    r.validate().unwrap();
    let metrics = derive_client_metrics(&r, &HistoricalVolatility::default());
    assert!(metrics.sharpe.is_some());
    assert!(metrics.treynor.is_some());
    assert!(metrics.jensen.is_some());
    assert!(metrics.cagr.is_some());
    assert!(metrics.irr.is_some());
    assert!(metrics.management_fee.is_some());
    assert!(metrics.performance_fee.is_some());
    assert!(metrics.gst.is_some());
    assert!(metrics.total_payable.is_some());
    assert!(metrics.tds.is_some());
}

#[test]
fn test_zero_capital_sentinels() {
    // Bypasses ingestion validation deliberately: the engine must still
    // produce sentinels, never panic or report infinity as success.
    let mut bad = record("CL-0002", dec!(100), dec!(15));
    bad.total_capital = Decimal::ZERO;
    bad.nav = dec!(115);
    let metrics = derive_client_metrics(&bad, &HistoricalVolatility::default());
    assert!(metrics.cagr.is_none());
    assert!(metrics.irr.is_none());
    assert!(metrics.tds.is_some());
}

#[test]
fn test_historical_and_band_estimators_both_work() {
    let r = record("CL-0003", dec!(600), dec!(20));
    let historical = derive_client_metrics(&r, &HistoricalVolatility::default());
    let band = derive_client_metrics(&r, &ProfileBandVolatility);
    assert!(historical.sharpe.is_some());
    assert_eq!(band.volatility, Some(dec!(0.15)));
    // Same return, different volatility figure, different Sharpe
    assert_ne!(historical.sharpe, band.sharpe);
}

#[test]
fn test_empty_series_falls_to_sentinel_under_historical() {
    let mut r = record("CL-0004", dec!(600), dec!(20));
    r.periodic_returns.clear();
    let metrics = derive_client_metrics(&r, &HistoricalVolatility::default());
    assert!(metrics.volatility.is_none());
    assert!(metrics.sharpe.is_none());
    // Figures that never touch volatility are unaffected
    assert!(metrics.cagr.is_some());
    assert!(metrics.total_payable.is_some());
}

#[test]
fn test_one_bad_record_never_aborts_the_batch() {
    let mut bad = record("CL-0006", dec!(100), dec!(10));
    bad.total_capital = Decimal::ZERO;
    let records = vec![
        record("CL-0005", dec!(1200), dec!(25)),
        bad,
        record("CL-0007", dec!(300), dec!(8)),
    ];
    let metrics = derive_book_metrics(&records, &ProfileBandVolatility);
    assert_eq!(metrics.len(), 3);
    assert!(metrics[0].cagr.is_some());
    assert!(metrics[1].cagr.is_none());
    assert!(metrics[2].cagr.is_some());
}

#[test]
fn test_fee_tier_reflected_in_batch() {
    let records = vec![
        record("CL-0008", dec!(100), dec!(0)),
        record("CL-0009", dec!(1500), dec!(0)),
    ];
    let metrics = derive_book_metrics(&records, &ProfileBandVolatility);
    // NAV equals capital at 0% TWR; tier rates are 1.5% and 1.0%
    assert_eq!(metrics[0].management_fee, Some(dec!(100) * dec!(0.015)));
    assert_eq!(metrics[1].management_fee, Some(dec!(1500) * dec!(0.010)));
}

#[test]
fn test_serialized_metrics_carry_null_sentinels() {
    let mut bad = record("CL-0010", dec!(100), dec!(12));
    bad.total_capital = Decimal::ZERO;
    let metrics = derive_client_metrics(&bad, &ProfileBandVolatility);
    let value = serde_json::to_value(&metrics).unwrap();
    assert!(value.get("cagr").unwrap().is_null());
    assert!(value.get("irr").unwrap().is_null());
}
