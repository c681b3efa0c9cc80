use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PmsError;
use crate::types::{with_metadata, AccountType, ComputationOutput, MonitoringFlag};
use crate::PmsResult;

/// Progress of an onboarding application. Selected by the operator; no
/// transition ordering is enforced, but the validator reports whether the
/// selection is consistent with what the fields support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Started,
    DocumentsUploaded,
    PendingApproval,
    Approved,
}

/// The four upload slots on the onboarding form.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DocumentSet {
    pub proof_of_identity: bool,
    pub proof_of_address: bool,
    pub pan_card: bool,
    pub bank_statement: bool,
}

impl DocumentSet {
    pub fn complete(&self) -> bool {
        self.proof_of_identity && self.proof_of_address && self.pan_card && self.bank_statement
    }

    pub fn missing(&self) -> Vec<String> {
        let slots = [
            ("proof_of_identity", self.proof_of_identity),
            ("proof_of_address", self.proof_of_address),
            ("pan_card", self.pan_card),
            ("bank_statement", self.bank_statement),
        ];
        slots
            .iter()
            .filter(|(_, uploaded)| !uploaded)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}

/// One client onboarding application as captured by the intake form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingApplication {
    pub name: String,
    pub pan: String,
    pub aadhaar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    pub account_type: AccountType,
    pub country: String,
    pub bank_account: String,
    pub address: String,

    pub pep: bool,
    pub source_of_wealth: String,
    /// AML risk score, 1-100
    pub aml_risk_score: u32,
    pub txn_monitoring_flag: MonitoringFlag,

    pub documents: DocumentSet,

    /// MITC document acknowledgment
    pub mitc_acknowledged: bool,
    /// Fee annexure acknowledgment
    pub fee_annexure_acknowledged: bool,

    pub status: ApplicationStatus,
}

/// Validation result for one application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingValidationOutput {
    /// True when identity, documents, and acknowledgments are all present
    pub complete: bool,
    pub missing_fields: Vec<String>,
    pub missing_documents: Vec<String>,
    pub missing_acknowledgments: Vec<String>,
    pub selected_status: ApplicationStatus,
    /// The furthest status the captured fields support
    pub expected_status: ApplicationStatus,
    /// False when the operator-selected status is ahead of the fields
    pub status_consistent: bool,
}

/// Validate an onboarding application.
///
/// Required identity fields are name, PAN, and Aadhaar; the remaining form
/// fields are captured but not gating. The expected status ladder is:
/// identity missing → Started; identity present but documents missing →
/// Started; documents complete but acknowledgments missing →
/// DocumentsUploaded; everything present → PendingApproval. Approved is
/// always an operator decision and is never derived.
pub fn validate_application(
    app: &OnboardingApplication,
) -> PmsResult<ComputationOutput<OnboardingValidationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if app.aml_risk_score == 0 || app.aml_risk_score > 100 {
        return Err(PmsError::InvalidInput {
            field: "aml_risk_score".into(),
            reason: "AML risk score must be between 1 and 100".into(),
        });
    }

    let required = [
        ("name", &app.name),
        ("pan", &app.pan),
        ("aadhaar", &app.aadhaar),
    ];
    let missing_fields: Vec<String> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect();

    let missing_documents = app.documents.missing();

    let acks = [
        ("mitc", app.mitc_acknowledged),
        ("fee_annexure", app.fee_annexure_acknowledged),
    ];
    let missing_acknowledgments: Vec<String> = acks
        .iter()
        .filter(|(_, checked)| !checked)
        .map(|(name, _)| name.to_string())
        .collect();

    let expected_status = if !missing_fields.is_empty() || !missing_documents.is_empty() {
        ApplicationStatus::Started
    } else if !missing_acknowledgments.is_empty() {
        ApplicationStatus::DocumentsUploaded
    } else {
        ApplicationStatus::PendingApproval
    };

    // Approved stays valid once the fields support PendingApproval
    let status_consistent = match app.status {
        ApplicationStatus::Approved => expected_status == ApplicationStatus::PendingApproval,
        selected => selected <= expected_status,
    };

    if !status_consistent {
        warnings.push(format!(
            "Selected status {:?} is ahead of what the captured fields support ({:?})",
            app.status, expected_status
        ));
    }
    if app.pep {
        warnings.push("PEP flagged; enhanced due diligence applies before approval".into());
    }
    if app.txn_monitoring_flag == MonitoringFlag::Red {
        warnings.push("Transaction monitoring flag is Red".into());
    }

    let complete = missing_fields.is_empty()
        && missing_documents.is_empty()
        && missing_acknowledgments.is_empty();

    let output = OnboardingValidationOutput {
        complete,
        missing_fields,
        missing_documents,
        missing_acknowledgments,
        selected_status: app.status,
        expected_status,
        status_consistent,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Onboarding Completeness Check (identity, documents, acknowledgments)",
        &serde_json::json!({
            "required_fields": ["name", "pan", "aadhaar"],
            "document_slots": 4,
            "acknowledgments": 2,
        }),
        warnings,
        elapsed,
        output,
    ))
}
