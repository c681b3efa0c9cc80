use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PmsError;
use crate::PmsResult;

/// All monetary values (₹ Lakhs). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
/// Record fields with a `_pct` suffix are the one exception: they carry the
/// percent figure the upstream book uses and are converted at the engine
/// boundary.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Residency classification of the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Resident,
    Nre,
    Nro,
}

/// Risk appetite tier. Drives the fallback volatility band when a record
/// carries no return series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskProfile {
    Low,
    Medium,
    High,
}

/// Transaction-monitoring traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitoringFlag {
    Green,
    Yellow,
    Red,
}

/// Withholding slabs a record is allowed to carry (percent).
pub const ALLOWED_TDS_RATES: [Decimal; 5] = [dec!(5), dec!(10), dec!(15), dec!(20), dec!(30)];

/// One client/account row. Immutable for the duration of a reporting
/// session; derived figures are recomputed on every read, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Unique, stable client identifier
    pub client_id: String,
    pub name: String,
    pub account_type: AccountType,
    pub country: String,

    /// Total capital committed (₹ Lakhs)
    pub total_capital: Money,
    /// Amount of the first tranche
    pub initial_tranche: Money,
    /// Number of tranches drawn so far (>= 1)
    pub num_tranches: u32,
    pub investment_date: NaiveDate,
    /// Date of the most recent tranche (>= investment_date)
    pub last_tranche_date: NaiveDate,

    /// Current net asset value
    pub nav: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Time-weighted return over the holding period, in percent
    pub twr_pct: Decimal,
    /// Money-weighted return over the holding period, in percent
    pub mwr_pct: Decimal,

    /// Monthly return observations (as decimals). Empty when the feed
    /// supplies point-in-time valuations only.
    #[serde(default)]
    pub periodic_returns: Vec<Rate>,

    pub risk_profile: RiskProfile,
    /// AML risk score, 1-100
    pub aml_risk_score: u32,
    pub pep: bool,
    /// Present iff `pep` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pep_status_date: Option<NaiveDate>,
    pub txn_monitoring_flag: MonitoringFlag,

    pub dividend_income: Money,
    pub interest_income: Money,
    pub short_term_gain: Money,
    pub long_term_gain: Money,
    /// Withholding rate in percent, one of `ALLOWED_TDS_RATES`
    pub tds_rate_pct: Decimal,

    /// Descriptive only; no calculation consumes these two.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_party_transaction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custody_reconciliation: Option<String>,
}

impl ClientRecord {
    /// Ingestion-side shape check. Malformed rows are rejected here so the
    /// calculation layer only ever sees well-formed input.
    pub fn validate(&self) -> PmsResult<()> {
        if self.client_id.trim().is_empty() {
            return Err(PmsError::InvalidInput {
                field: "client_id".into(),
                reason: "Client ID must not be empty".into(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(PmsError::InvalidInput {
                field: "name".into(),
                reason: "Name must not be empty".into(),
            });
        }
        if self.total_capital <= Decimal::ZERO {
            return Err(PmsError::InvalidInput {
                field: "total_capital".into(),
                reason: "Total capital must be positive".into(),
            });
        }
        if self.initial_tranche < Decimal::ZERO || self.initial_tranche > self.total_capital {
            return Err(PmsError::InvalidInput {
                field: "initial_tranche".into(),
                reason: "Initial tranche must be between 0 and total capital".into(),
            });
        }
        if self.num_tranches == 0 {
            return Err(PmsError::InvalidInput {
                field: "num_tranches".into(),
                reason: "At least one tranche is required".into(),
            });
        }
        if self.last_tranche_date < self.investment_date {
            return Err(PmsError::InvalidInput {
                field: "last_tranche_date".into(),
                reason: "Last tranche date cannot precede the investment date".into(),
            });
        }
        if self.nav < Decimal::ZERO {
            return Err(PmsError::InvalidInput {
                field: "nav".into(),
                reason: "NAV cannot be negative".into(),
            });
        }
        if self.end_date <= self.start_date {
            return Err(PmsError::InvalidInput {
                field: "end_date".into(),
                reason: "End date must be after the start date".into(),
            });
        }
        if self.aml_risk_score == 0 || self.aml_risk_score > 100 {
            return Err(PmsError::InvalidInput {
                field: "aml_risk_score".into(),
                reason: "AML risk score must be between 1 and 100".into(),
            });
        }
        if self.pep != self.pep_status_date.is_some() {
            return Err(PmsError::InvalidInput {
                field: "pep_status_date".into(),
                reason: "PEP status date must be present exactly when the PEP flag is set".into(),
            });
        }
        for (field, amount) in [
            ("dividend_income", self.dividend_income),
            ("interest_income", self.interest_income),
            ("short_term_gain", self.short_term_gain),
            ("long_term_gain", self.long_term_gain),
        ] {
            if amount < Decimal::ZERO {
                return Err(PmsError::InvalidInput {
                    field: field.into(),
                    reason: "Income amounts cannot be negative".into(),
                });
            }
        }
        if !ALLOWED_TDS_RATES.contains(&self.tds_rate_pct) {
            return Err(PmsError::InvalidInput {
                field: "tds_rate_pct".into(),
                reason: format!(
                    "TDS rate {}% is not one of the allowed slabs",
                    self.tds_rate_pct
                ),
            });
        }
        Ok(())
    }

    /// Days between valuation start and end dates.
    pub fn days_invested(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
