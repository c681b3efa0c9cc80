use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::fees::{self, DEFAULT_HURDLE};
use crate::performance::growth;
use crate::performance::ratios::{
    self, RatioInput, DEFAULT_BETA, DEFAULT_MARKET_RETURN, DEFAULT_RISK_FREE_RATE,
};
use crate::performance::volatility::VolatilityEstimator;
use crate::types::{ClientRecord, Money, Rate};

/// Derived figures for one client row. `None` marks a value the row's
/// inputs cannot define (zero volatility, non-positive capital or duration,
/// a solver that failed to converge); the presentation layer decides how to
/// render it. A row that cannot define one figure still yields the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMetrics {
    pub client_id: String,

    pub sharpe: Option<Decimal>,
    pub treynor: Option<Decimal>,
    pub jensen: Option<Decimal>,
    /// Annualised growth rate, as a decimal
    pub cagr: Option<Rate>,
    /// Per-period (monthly) holding IRR, as a decimal
    pub irr: Option<Rate>,
    /// The volatility figure the ratios were computed against
    pub volatility: Option<Rate>,

    pub management_fee: Option<Money>,
    pub performance_fee: Option<Money>,
    pub gst: Option<Money>,
    pub total_payable: Option<Money>,
    pub tds: Option<Money>,

    pub unrealized_gain: Money,
    pub realized_gain: Money,
}

/// Derive every reportable figure for one record. Pure; depends only on the
/// row's own fields. Internal failures map to `None` sentinels so one bad
/// record never aborts processing of the rest.
pub fn derive_client_metrics(
    record: &ClientRecord,
    volatility: &dyn VolatilityEstimator,
) -> ClientMetrics {
    let vol = volatility.estimate(record).ok();

    let ratio_result = vol.and_then(|v| {
        ratios::calculate_ratios(&RatioInput {
            twr_pct: record.twr_pct,
            volatility: v,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            beta: DEFAULT_BETA,
            market_return: DEFAULT_MARKET_RETURN,
        })
        .ok()
    });
    let (sharpe, treynor, jensen) = match &ratio_result {
        Some(out) => (out.result.sharpe, out.result.treynor, Some(out.result.jensen)),
        None => (None, None, None),
    };

    // Fees are charged on current assets under management
    let growth_rate = record.twr_pct / dec!(100);
    let management_fee = fees::management_fee(record.nav).ok();
    let performance_fee = fees::performance_fee(record.nav, growth_rate, DEFAULT_HURDLE).ok();
    let fee_base = management_fee.zip(performance_fee).map(|(m, p)| m + p);
    let gst = fee_base.map(fees::gst);
    let total_payable = fee_base.zip(gst).map(|(base, g)| base + g);

    let cagr = growth::cagr(
        record.nav,
        record.total_capital,
        record.start_date,
        record.end_date,
    )
    .ok();
    let irr = growth::holding_irr(
        record.total_capital,
        record.twr_pct,
        record.start_date,
        record.end_date,
    )
    .ok();

    let tds = fees::tds_amount(
        record.dividend_income,
        record.interest_income,
        record.short_term_gain,
        record.long_term_gain,
        record.tds_rate_pct,
    )
    .ok();

    ClientMetrics {
        client_id: record.client_id.clone(),
        sharpe,
        treynor,
        jensen,
        cagr,
        irr,
        volatility: vol,
        management_fee,
        performance_fee,
        gst,
        total_payable,
        tds,
        unrealized_gain: record.nav - record.total_capital,
        realized_gain: record.short_term_gain + record.long_term_gain,
    }
}

/// Eager single pass over a record set. No ordering dependency between rows.
pub fn derive_book_metrics(
    records: &[ClientRecord],
    volatility: &dyn VolatilityEstimator,
) -> Vec<ClientMetrics> {
    records
        .iter()
        .map(|record| derive_client_metrics(record, volatility))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::volatility::ProfileBandVolatility;
    use crate::types::{AccountType, MonitoringFlag, RiskProfile};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record() -> ClientRecord {
        ClientRecord {
            client_id: "CL-0007".into(),
            name: "Meera Iyer".into(),
            account_type: AccountType::Nre,
            country: "UAE".into(),
            total_capital: dec!(600),
            initial_tranche: dec!(600),
            num_tranches: 1,
            investment_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            last_tranche_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            nav: dec!(720),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            twr_pct: dec!(20),
            mwr_pct: dec!(19.5),
            periodic_returns: vec![],
            risk_profile: RiskProfile::Medium,
            aml_risk_score: 30,
            pep: false,
            pep_status_date: None,
            txn_monitoring_flag: MonitoringFlag::Green,
            dividend_income: dec!(10),
            interest_income: dec!(5),
            short_term_gain: dec!(15),
            long_term_gain: dec!(40),
            tds_rate_pct: dec!(15),
            third_party_transaction: None,
            custody_reconciliation: None,
        }
    }

    #[test]
    fn test_all_fields_defined_for_good_record() {
        let metrics = derive_client_metrics(&record(), &ProfileBandVolatility);
        assert!(metrics.sharpe.is_some());
        assert!(metrics.treynor.is_some());
        assert!(metrics.jensen.is_some());
        assert!(metrics.cagr.is_some());
        assert!(metrics.irr.is_some());
        assert!(metrics.management_fee.is_some());
        assert!(metrics.total_payable.is_some());
        assert!(metrics.tds.is_some());
    }

    #[test]
    fn test_medium_profile_midpoint_volatility() {
        let metrics = derive_client_metrics(&record(), &ProfileBandVolatility);
        assert_eq!(metrics.volatility, Some(dec!(0.15)));
        // Sharpe = (0.20 - 0.06) / 0.15
        let sharpe = metrics.sharpe.unwrap();
        assert!((sharpe - dec!(0.9333)).abs() < dec!(0.001));
    }

    #[test]
    fn test_fee_fields_consistent() {
        let metrics = derive_client_metrics(&record(), &ProfileBandVolatility);
        // NAV 720 sits in the 1.2% tier; growth 20% is above the 10% hurdle
        assert_eq!(metrics.management_fee, Some(dec!(720) * dec!(0.012)));
        assert_eq!(
            metrics.performance_fee,
            Some(dec!(720) * dec!(0.10) * dec!(0.10))
        );
        let base = metrics.management_fee.unwrap() + metrics.performance_fee.unwrap();
        assert_eq!(metrics.gst, Some(base * dec!(0.18)));
        assert_eq!(metrics.total_payable, Some(base + base * dec!(0.18)));
    }

    #[test]
    fn test_zero_capital_sentinels_never_panic() {
        let mut bad = record();
        bad.total_capital = Decimal::ZERO;
        let metrics = derive_client_metrics(&bad, &ProfileBandVolatility);
        assert!(metrics.cagr.is_none());
        assert!(metrics.irr.is_none());
        // Independent figures survive
        assert!(metrics.tds.is_some());
        assert!(metrics.sharpe.is_some());
    }

    #[test]
    fn test_tds_matches_direct_formula() {
        let metrics = derive_client_metrics(&record(), &ProfileBandVolatility);
        // (10 + 5 + 15 + 40) * 15% = 10.50
        assert_eq!(metrics.tds, Some(dec!(10.50)));
    }

    #[test]
    fn test_gains_split() {
        let metrics = derive_client_metrics(&record(), &ProfileBandVolatility);
        assert_eq!(metrics.unrealized_gain, dec!(120));
        assert_eq!(metrics.realized_gain, dec!(55));
    }

    #[test]
    fn test_batch_preserves_order_and_length() {
        let records = vec![record(), record(), record()];
        let metrics = derive_book_metrics(&records, &ProfileBandVolatility);
        assert_eq!(metrics.len(), 3);
        assert!(metrics.iter().all(|m| m.client_id == "CL-0007"));
    }
}
