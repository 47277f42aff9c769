//! Static Policy Administration System client.
//!
//! `StaticPasClient` implements `VerificationSource` over the tables in
//! `mock_data`. For each claim it builds the PAS response in wire format
//! (`submitted_data`, `pas_data`, `validation_status`, `recommendation`,
//! `calculated_benefit`) and decodes it into a `VerificationRecord`, so the
//! reference runtime goes through the same decode path a real PAS would.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::{debug, warn};

use claimstream_contracts::{
    claim::{ClaimId, ClaimRecord},
    error::{ClaimStreamError, ClaimStreamResult},
    verification::{fields, BenefitCalculation, FieldStatus, Recommendation, VerificationRecord},
};
use claimstream_core::traits::VerificationSource;

use crate::mock_data;

/// Load the PENDING claim record for `claim_id` from the reference data.
pub fn load_claim(claim_id: &str) -> ClaimStreamResult<ClaimRecord> {
    let submission =
        mock_data::get_claim_submission(claim_id).ok_or_else(|| ClaimStreamError::PreconditionViolation {
            reason: format!("no claim '{}' in the reference data", claim_id),
        })?;

    serde_json::from_value(submission).map_err(|e| ClaimStreamError::PreconditionViolation {
        reason: format!("reference claim '{}' is malformed: {}", claim_id, e),
    })
}

/// Decode a PAS response body into a `VerificationRecord`.
///
/// Malformed responses are reported as `VerificationFailed`.
pub fn decode_response(response: Value) -> ClaimStreamResult<VerificationRecord> {
    serde_json::from_value(response).map_err(|e| ClaimStreamError::VerificationFailed {
        reason: format!("malformed PAS response: {}", e),
    })
}

/// Compute the recommendation from the field statuses.
///
/// INSUFFICIENT benefits or a coverage MISMATCH → DENY; any other MISMATCH →
/// MANUAL_REVIEW; otherwise APPROVE.
pub fn recommend(field_status: &BTreeMap<String, FieldStatus>) -> Recommendation {
    let deny = field_status.iter().any(|(key, status)| {
        *status == FieldStatus::Insufficient
            || (key == fields::PROCEDURE_COVERAGE && *status == FieldStatus::Mismatch)
    });
    if deny {
        Recommendation::Deny
    } else if field_status.values().any(|s| *s == FieldStatus::Mismatch) {
        Recommendation::ManualReview
    } else {
        Recommendation::Approve
    }
}

/// A `VerificationSource` backed by the static reference tables.
#[derive(Debug, Default)]
pub struct StaticPasClient {
    // Raw responses served instead of the computed ones, keyed by claim ID.
    canned: BTreeMap<String, Value>,
}

impl StaticPasClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `response` verbatim for `claim_id` instead of computing it.
    pub fn with_response(mut self, claim_id: impl Into<String>, response: Value) -> Self {
        self.canned.insert(claim_id.into(), response);
        self
    }

    /// Build the PAS wire response for `claim_id`.
    pub fn build_response(&self, claim_id: &str) -> ClaimStreamResult<Value> {
        if let Some(response) = self.canned.get(claim_id) {
            return Ok(response.clone());
        }

        let submission = mock_data::get_claim_submission(claim_id).ok_or_else(|| {
            ClaimStreamError::VerificationFailed {
                reason: format!("PAS has no record of claim '{}'", claim_id),
            }
        })?;
        let claim: ClaimRecord = serde_json::from_value(submission.clone()).map_err(|e| {
            ClaimStreamError::VerificationFailed {
                reason: format!("claim '{}' could not be read: {}", claim_id, e),
            }
        })?;
        let submitted = &submission["submitted_data"];

        let member = mock_data::get_member_record(&claim.member_id);
        let provider = mock_data::get_provider_record(&claim.provider_id);
        let coverage = mock_data::get_procedure_coverage(&claim.procedure_code);
        let pricing = mock_data::get_pricing_benchmark(&claim.procedure_code);

        let covered = coverage["covered"].as_bool().unwrap_or(false);
        let coverage_percentage = coverage["coverage_percentage"]
            .as_u64()
            .and_then(|p| u8::try_from(p).ok())
            .unwrap_or(0);
        let benefit = BenefitCalculation::compute(claim.amount, coverage_percentage)?;

        let remaining_benefits = member["remaining_benefits"].as_u64().unwrap_or(0);
        let network_status = provider["network_status"].as_str().unwrap_or("NOT_IN_NETWORK");
        let max_allowed = pricing["max_allowed"].as_u64().unwrap_or(0);
        let crown_history = member["crown_history"]
            .as_str()
            .unwrap_or(mock_data::NO_CROWN_HISTORY);
        let is_crown = coverage["is_crown"].as_bool().unwrap_or(false);

        let mut field_status = BTreeMap::new();
        field_status.insert(
            fields::MEMBER_BENEFITS.to_string(),
            if remaining_benefits >= benefit.covered_amount {
                FieldStatus::Sufficient
            } else {
                FieldStatus::Insufficient
            },
        );
        field_status.insert(
            fields::PROVIDER_NETWORK.to_string(),
            if network_status == "ACTIVE" && submitted[fields::PROVIDER_STATUS] == network_status {
                FieldStatus::Valid
            } else {
                FieldStatus::Mismatch
            },
        );
        field_status.insert(
            fields::PROCEDURE_COVERAGE.to_string(),
            if covered {
                FieldStatus::Covered
            } else {
                FieldStatus::Mismatch
            },
        );
        field_status.insert(
            fields::PRICING_VALIDATION.to_string(),
            if claim.amount <= max_allowed {
                FieldStatus::Valid
            } else {
                FieldStatus::Mismatch
            },
        );
        // Prior crown work only matters when the claim is itself a crown.
        field_status.insert(
            fields::CROWN_HISTORY.to_string(),
            if !is_crown || crown_history == mock_data::NO_CROWN_HISTORY {
                FieldStatus::Clear
            } else {
                FieldStatus::Mismatch
            },
        );
        let recommendation = recommend(&field_status);

        let procedure_coverage = if covered {
            format!("COVERED ({}%)", coverage_percentage)
        } else {
            "NOT_COVERED".to_string()
        };
        let pricing_benchmark = if claim.amount <= max_allowed {
            "WITHIN_RANGE"
        } else {
            "ABOVE_RANGE"
        };

        Ok(json!({
            "submitted_data": submitted,
            "pas_data": {
                "member_benefits": remaining_benefits,
                "provider_status": network_status,
                "procedure_coverage": procedure_coverage,
                "pricing_benchmark": pricing_benchmark,
                "crown_history": crown_history
            },
            "validation_status": field_status,
            "recommendation": recommendation,
            "calculated_benefit": benefit
        }))
    }
}

impl VerificationSource for StaticPasClient {
    fn fetch_verification(&self, claim_id: &ClaimId) -> ClaimStreamResult<VerificationRecord> {
        debug!(claim_id = %claim_id, "querying static PAS");

        let record = self
            .build_response(claim_id.as_str())
            .and_then(decode_response)
            .map_err(|e| {
                warn!(claim_id = %claim_id, error = %e, "PAS lookup failed");
                e
            })?;

        debug!(
            claim_id = %claim_id,
            recommendation = %record.recommendation,
            "PAS response decoded"
        );
        Ok(record)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
