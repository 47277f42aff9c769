//! Verification record and report types.
//!
//! A `VerificationRecord` is what the PAS collaborator returns for a claim:
//! the submitted values, the reference values, a per-field outcome, an overall
//! recommendation and the benefit split. Before the session stores a record it
//! is checked by a `RecordVerifier`, which produces a `VerificationReport`.
//!
//! The serde field names follow the PAS wire format (`submitted_data`,
//! `pas_data`, `validation_status`, `calculated_benefit`).

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClaimStreamError, ClaimStreamResult};

/// Keys used in the `submitted_data`, `pas_data` and `validation_status` maps.
pub mod fields {
    pub const MEMBER_BENEFITS: &str = "member_benefits";
    pub const PROVIDER_STATUS: &str = "provider_status";
    pub const PROCEDURE_CODE: &str = "procedure_code";
    pub const CLAIM_AMOUNT: &str = "claim_amount";
    pub const CROWN_HISTORY: &str = "crown_history";
    pub const PROCEDURE_COVERAGE: &str = "procedure_coverage";
    pub const PRICING_BENCHMARK: &str = "pricing_benchmark";

    // validation_status keys
    pub const PROVIDER_NETWORK: &str = "provider_network";
    pub const PRICING_VALIDATION: &str = "pricing_validation";

    /// Every key the PAS must report a validation status for.
    pub const STATUS_KEYS: [&str; 5] = [
        MEMBER_BENEFITS,
        PROVIDER_NETWORK,
        PROCEDURE_COVERAGE,
        PRICING_VALIDATION,
        CROWN_HISTORY,
    ];
}

/// Outcome of validating one field category against the PAS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldStatus {
    Sufficient,
    Valid,
    Covered,
    Clear,
    Mismatch,
    Insufficient,
}

impl FieldStatus {
    /// The closed set of statuses a given `validation_status` key may carry.
    ///
    /// Returns `None` for keys outside the known field categories.
    pub fn allowed_for(status_key: &str) -> Option<&'static [FieldStatus]> {
        use FieldStatus::*;
        match status_key {
            fields::MEMBER_BENEFITS => Some(&[Sufficient, Insufficient]),
            fields::PROVIDER_NETWORK => Some(&[Valid, Mismatch]),
            fields::PROCEDURE_COVERAGE => Some(&[Covered, Mismatch]),
            fields::PRICING_VALIDATION => Some(&[Valid, Mismatch]),
            fields::CROWN_HISTORY => Some(&[Clear, Mismatch]),
            _ => None,
        }
    }

    /// True for every status other than MISMATCH and INSUFFICIENT.
    pub fn is_pass(self) -> bool {
        !matches!(self, FieldStatus::Mismatch | FieldStatus::Insufficient)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldStatus::Sufficient => "SUFFICIENT",
            FieldStatus::Valid => "VALID",
            FieldStatus::Covered => "COVERED",
            FieldStatus::Clear => "CLEAR",
            FieldStatus::Mismatch => "MISMATCH",
            FieldStatus::Insufficient => "INSUFFICIENT",
        }
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The PAS's overall advice to the reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Approve,
    Deny,
    ManualReview,
}

impl Recommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::Approve => "APPROVE",
            Recommendation::Deny => "DENY",
            Recommendation::ManualReview => "MANUAL_REVIEW",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a claim amount splits between payer and member.
///
/// Invariants: `coverage_percentage <= 100`,
/// `covered_amount == round(amount * coverage_percentage / 100)` (half up),
/// and `covered_amount + member_responsibility == amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitCalculation {
    pub coverage_percentage: u8,
    pub covered_amount: u64,
    pub member_responsibility: u64,
}

impl BenefitCalculation {
    /// Split `amount` at `coverage_percentage`.
    pub fn compute(amount: u64, coverage_percentage: u8) -> ClaimStreamResult<Self> {
        if coverage_percentage > 100 {
            return Err(ClaimStreamError::PreconditionViolation {
                reason: format!("coverage percentage {coverage_percentage} exceeds 100"),
            });
        }
        let covered_amount = covered_share(amount, coverage_percentage);
        Ok(Self {
            coverage_percentage,
            covered_amount,
            member_responsibility: amount - covered_amount,
        })
    }

    /// True if this split satisfies every invariant for `amount`.
    pub fn is_consistent_with(&self, amount: u64) -> bool {
        self.coverage_percentage <= 100
            && self.covered_amount == covered_share(amount, self.coverage_percentage)
            && self.covered_amount.checked_add(self.member_responsibility) == Some(amount)
    }
}

// u128 keeps `amount * 100` from overflowing; the result is <= amount.
fn covered_share(amount: u64, coverage_percentage: u8) -> u64 {
    let scaled = amount as u128 * coverage_percentage as u128;
    ((scaled + 50) / 100) as u64
}

/// The outcome of comparing a claim against the PAS.
///
/// Replaced wholesale on re-verification; the session never keeps more than
/// one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Values as asserted on the claim submission.
    #[serde(rename = "submitted_data")]
    pub submitted: BTreeMap<String, Value>,
    /// Values reported by the PAS.
    #[serde(rename = "pas_data")]
    pub reference: BTreeMap<String, Value>,
    #[serde(rename = "validation_status")]
    pub field_status: BTreeMap<String, FieldStatus>,
    pub recommendation: Recommendation,
    #[serde(rename = "calculated_benefit")]
    pub benefit_calculation: BenefitCalculation,
    /// When the record was produced. Absent on the wire; filled on decode.
    #[serde(default = "Utc::now")]
    pub verified_at: DateTime<Utc>,
}

/// One row of the submitted-vs-PAS comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub label: &'static str,
    pub submitted: Option<Value>,
    pub reference: Option<Value>,
    pub status: Option<FieldStatus>,
}

// (label, submitted key, pas key, status key)
const COMPARISON_LAYOUT: [(&str, &str, &str, &str); 5] = [
    (
        "Member Remaining Benefits",
        fields::MEMBER_BENEFITS,
        fields::MEMBER_BENEFITS,
        fields::MEMBER_BENEFITS,
    ),
    (
        "Provider Network Status",
        fields::PROVIDER_STATUS,
        fields::PROVIDER_STATUS,
        fields::PROVIDER_NETWORK,
    ),
    (
        "Procedure Coverage",
        fields::PROCEDURE_CODE,
        fields::PROCEDURE_COVERAGE,
        fields::PROCEDURE_COVERAGE,
    ),
    (
        "Pricing Validation",
        fields::CLAIM_AMOUNT,
        fields::PRICING_BENCHMARK,
        fields::PRICING_VALIDATION,
    ),
    (
        "Prior Crown Work (5 Years)",
        fields::CROWN_HISTORY,
        fields::CROWN_HISTORY,
        fields::CROWN_HISTORY,
    ),
];

impl VerificationRecord {
    /// The five-row Data Comparison table, in display order.
    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        COMPARISON_LAYOUT
            .iter()
            .map(|&(label, submitted_key, reference_key, status_key)| ComparisonRow {
                label,
                submitted: self.submitted.get(submitted_key).cloned(),
                reference: self.reference.get(reference_key).cloned(),
                status: self.field_status.get(status_key).copied(),
            })
            .collect()
    }

    /// Member benefit balance left after the covered amount is paid.
    ///
    /// `None` when the PAS did not report a numeric `member_benefits`.
    pub fn remaining_benefit(&self) -> Option<u64> {
        self.reference
            .get(fields::MEMBER_BENEFITS)
            .and_then(Value::as_u64)
            .map(|balance| balance.saturating_sub(self.benefit_calculation.covered_amount))
    }

    /// True when every reported field status is a pass.
    pub fn all_fields_pass(&self) -> bool {
        self.field_status.values().all(|s| s.is_pass())
    }
}

/// The result of running every record check against one `VerificationRecord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if all checks passed.
    pub passed: bool,
    /// Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

/// A single failed check within a `VerificationReport`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationFailure {
    pub rule_id: String,
    pub message: String,
}

impl VerificationReport {
    /// `"[rule] message; [rule] message"`, used as the `VerificationFailed` reason.
    pub fn failure_summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
