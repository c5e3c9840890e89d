use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// loan lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanState {
    /// created, waiting for a field validator
    Proposed,
    /// approved by staff, open for investment
    Approved,
    /// fully funded by investors
    Invested,
    /// handed over to the borrower
    Disbursed,
}

impl LoanState {
    /// every state in lifecycle order
    pub const ALL: [LoanState; 4] = [
        LoanState::Proposed,
        LoanState::Approved,
        LoanState::Invested,
        LoanState::Disbursed,
    ];

    /// the single state this one may advance to
    pub fn next(self) -> Option<LoanState> {
        match self {
            LoanState::Proposed => Some(LoanState::Approved),
            LoanState::Approved => Some(LoanState::Invested),
            LoanState::Invested => Some(LoanState::Disbursed),
            LoanState::Disbursed => None,
        }
    }

    /// wire name
    pub fn as_str(self) -> &'static str {
        match self {
            LoanState::Proposed => "proposed",
            LoanState::Approved => "approved",
            LoanState::Invested => "invested",
            LoanState::Disbursed => "disbursed",
        }
    }
}

impl fmt::Display for LoanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// proof that a field validator visited the borrower
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub photo_proof_url: String,
    #[serde(rename = "field_validator_id")]
    pub validator_id: String,
    pub approval_date: Option<DateTime<Utc>>,
}

impl Approval {
    pub fn new(
        photo_proof_url: impl Into<String>,
        validator_id: impl Into<String>,
        approval_date: DateTime<Utc>,
    ) -> Self {
        Self {
            photo_proof_url: photo_proof_url.into(),
            validator_id: validator_id.into(),
            approval_date: Some(approval_date),
        }
    }

    /// names of required fields left empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.photo_proof_url.trim().is_empty() {
            missing.push("photo_proof_url");
        }
        if self.validator_id.trim().is_empty() {
            missing.push("field_validator_id");
        }
        if self.approval_date.is_none() {
            missing.push("approval_date");
        }
        missing
    }
}

/// hand-over record signed by the field officer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disbursement {
    #[serde(rename = "agreement_letter_file")]
    pub agreement_file: String,
    pub field_officer_id: String,
    pub disbursement_date: Option<DateTime<Utc>>,
}

impl Disbursement {
    pub fn new(
        agreement_file: impl Into<String>,
        field_officer_id: impl Into<String>,
        disbursement_date: DateTime<Utc>,
    ) -> Self {
        Self {
            agreement_file: agreement_file.into(),
            field_officer_id: field_officer_id.into(),
            disbursement_date: Some(disbursement_date),
        }
    }

    /// names of required fields left empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.agreement_file.trim().is_empty() {
            missing.push("agreement_letter_file");
        }
        if self.field_officer_id.trim().is_empty() {
            missing.push("field_officer_id");
        }
        if self.disbursement_date.is_none() {
            missing.push("disbursement_date");
        }
        missing
    }
}

/// a single contribution towards the principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investor {
    pub investor_id: String,
    pub amount: Money,
}

impl Investor {
    pub fn new(investor_id: impl Into<String>, amount: Money) -> Self {
        Self {
            investor_id: investor_id.into(),
            amount,
        }
    }
}
