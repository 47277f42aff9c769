//! Schema-based verification record checker.
//!
//! Verification runs in two phases:
//!
//! 1. **Structural** — the record, serialized to its wire form, is validated
//!    against [`record_schema`] with the `jsonschema` crate. This catches
//!    missing status keys, statuses outside a field's category, and coverage
//!    percentages above 100.
//! 2. **Semantic** — rules relating the record to the claim. All failures are
//!    collected before returning.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use claimstream_contracts::{
    claim::ClaimRecord,
    error::{ClaimStreamError, ClaimStreamResult},
    verification::{
        fields, BenefitCalculation, FieldStatus, Recommendation, VerificationFailure,
        VerificationRecord, VerificationReport,
    },
};
use claimstream_core::traits::RecordVerifier;

/// JSON Schema for a `VerificationRecord` in PAS wire format.
///
/// `validation_status` must carry exactly the known status keys, each limited
/// to its category's closed set of statuses.
pub fn record_schema() -> Value {
    let mut status_properties = Map::new();
    for key in fields::STATUS_KEYS {
        let allowed: Vec<&str> = FieldStatus::allowed_for(key)
            .unwrap_or_default()
            .iter()
            .map(|s| s.as_str())
            .collect();
        status_properties.insert(key.to_string(), json!({ "enum": allowed }));
    }

    let recommendations: Vec<&str> = [
        Recommendation::Approve,
        Recommendation::Deny,
        Recommendation::ManualReview,
    ]
    .iter()
    .map(|r| r.as_str())
    .collect();

    json!({
        "type": "object",
        "required": [
            "submitted_data",
            "pas_data",
            "validation_status",
            "recommendation",
            "calculated_benefit"
        ],
        "properties": {
            "submitted_data": { "type": "object" },
            "pas_data": { "type": "object" },
            "validation_status": {
                "type": "object",
                "required": fields::STATUS_KEYS,
                "properties": Value::Object(status_properties),
                "additionalProperties": false
            },
            "recommendation": { "enum": recommendations },
            "calculated_benefit": {
                "type": "object",
                "required": ["coverage_percentage", "covered_amount", "member_responsibility"],
                "properties": {
                    "coverage_percentage": { "type": "integer", "minimum": 0, "maximum": 100 },
                    "covered_amount": { "type": "integer", "minimum": 0 },
                    "member_responsibility": { "type": "integer", "minimum": 0 }
                }
            }
        }
    })
}

/// The ClaimStream record verifier.
pub struct RecordSchemaVerifier {
    schema: Value,
}

impl RecordSchemaVerifier {
    /// Build a verifier, confirming the record schema compiles.
    pub fn new() -> ClaimStreamResult<Self> {
        let schema = record_schema();
        jsonschema::validator_for(&schema).map_err(|e| ClaimStreamError::SchemaValidation {
            reason: format!("record schema does not compile: {e}"),
        })?;
        Ok(Self { schema })
    }

    fn structural_failures(
        &self,
        record: &VerificationRecord,
    ) -> ClaimStreamResult<Vec<VerificationFailure>> {
        let validator = jsonschema::validator_for(&self.schema).map_err(|e| {
            ClaimStreamError::SchemaValidation {
                reason: format!("record schema does not compile: {e}"),
            }
        })?;
        let instance = serde_json::to_value(record).map_err(|e| ClaimStreamError::SchemaValidation {
            reason: format!("record could not be serialized: {e}"),
        })?;

        Ok(validator
            .iter_errors(&instance)
            .map(|error| {
                let message = format!("JSON Schema violation at {}: {}", error.instance_path, error);
                warn!(%message, "structural validation failure");
                VerificationFailure {
                    rule_id: "json-schema".to_string(),
                    message,
                }
            })
            .collect())
    }
}

impl RecordVerifier for RecordSchemaVerifier {
    fn verify(
        &self,
        claim: &ClaimRecord,
        record: &VerificationRecord,
    ) -> ClaimStreamResult<VerificationReport> {
        let mut failures = self.structural_failures(record)?;
        let benefit = &record.benefit_calculation;

        let mut fail = |rule_id: &str, message: String| {
            warn!(rule_id, claim_id = %claim.claim_id, %message, "semantic rule failed");
            failures.push(VerificationFailure {
                rule_id: rule_id.to_string(),
                message,
            });
        };

        // ── benefit-sum ───────────────────────────────────────────────────────
        if benefit.covered_amount.checked_add(benefit.member_responsibility) != Some(claim.amount) {
            fail(
                "benefit-sum",
                format!(
                    "covered amount {} + member responsibility {} does not equal claim amount {}",
                    benefit.covered_amount, benefit.member_responsibility, claim.amount
                ),
            );
        }

        // ── benefit-rounding ──────────────────────────────────────────────────
        // Only meaningful once the percentage is in range; the schema already
        // reported anything above 100.
        if benefit.coverage_percentage <= 100 && !benefit.is_consistent_with(claim.amount) {
            let expected = BenefitCalculation::compute(claim.amount, benefit.coverage_percentage)?;
            if expected.covered_amount != benefit.covered_amount {
                fail(
                    "benefit-rounding",
                    format!(
                        "covered amount {} is not {}% of {} (expected {})",
                        benefit.covered_amount,
                        benefit.coverage_percentage,
                        claim.amount,
                        expected.covered_amount
                    ),
                );
            }
        }

        // ── claim-amount ──────────────────────────────────────────────────────
        match record.submitted.get(fields::CLAIM_AMOUNT).and_then(Value::as_u64) {
            Some(amount) if amount == claim.amount => {}
            Some(amount) => fail(
                "claim-amount",
                format!("submitted claim amount {amount} does not match claim amount {}", claim.amount),
            ),
            None => fail(
                "claim-amount",
                format!("submitted data has no numeric '{}'", fields::CLAIM_AMOUNT),
            ),
        }

        // ── procedure-code ────────────────────────────────────────────────────
        match record.submitted.get(fields::PROCEDURE_CODE).and_then(Value::as_str) {
            Some(code) if code == claim.procedure_code => {}
            Some(code) => fail(
                "procedure-code",
                format!(
                    "submitted procedure code '{code}' does not match claim procedure '{}'",
                    claim.procedure_code
                ),
            ),
            None => fail(
                "procedure-code",
                format!("submitted data has no '{}'", fields::PROCEDURE_CODE),
            ),
        }

        // ── recommendation-consistency ────────────────────────────────────────
        if record.recommendation == Recommendation::Approve && !record.all_fields_pass() {
            let failing: Vec<String> = record
                .field_status
                .iter()
                .filter(|(_, s)| !s.is_pass())
                .map(|(k, s)| format!("{k}={s}"))
                .collect();
            fail(
                "recommendation-consistency",
                format!("APPROVE recommended despite failing checks: {}", failing.join(", ")),
            );
        }

        let passed = failures.is_empty();
        debug!(
            claim_id = %claim.claim_id,
            passed,
            failure_count = failures.len(),
            "record verification complete"
        );

        Ok(VerificationReport { passed, failures })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use claimstream_contracts::{
        claim::{ClaimId, ClaimRecord, ClaimStatus},
        verification::{
            fields, BenefitCalculation, FieldStatus, Recommendation, VerificationRecord,
        },
    };
    use claimstream_core::traits::RecordVerifier;

    use super::RecordSchemaVerifier;

    // ── Builder helpers ───────────────────────────────────────────────────────

    fn crown_claim() -> ClaimRecord {
        ClaimRecord {
            claim_id: ClaimId::new("CLM001"),
            provider_name: "Dr. Johnson's Dental Practice".to_string(),
            provider_id: "PRV001".to_string(),
            member_name: "Susan Davis".to_string(),
            member_id: "MBR001".to_string(),
            procedure_description: "Crown - porcelain fused to high noble metal".to_string(),
            procedure_code: "D2750".to_string(),
            amount: 1200,
            status: ClaimStatus::Pending,
        }
    }

    fn clean_record() -> VerificationRecord {
        VerificationRecord {
            submitted: BTreeMap::from([
                (fields::MEMBER_BENEFITS.to_string(), json!(1500)),
                (fields::PROVIDER_STATUS.to_string(), json!("ACTIVE")),
                (fields::PROCEDURE_CODE.to_string(), json!("D2750")),
                (fields::CLAIM_AMOUNT.to_string(), json!(1200)),
                (fields::CROWN_HISTORY.to_string(), json!("NONE_REPORTED")),
            ]),
            reference: BTreeMap::from([
                (fields::MEMBER_BENEFITS.to_string(), json!(1500)),
                (fields::PROVIDER_STATUS.to_string(), json!("ACTIVE")),
                (fields::PROCEDURE_COVERAGE.to_string(), json!("COVERED (80%)")),
                (fields::PRICING_BENCHMARK.to_string(), json!("WITHIN_RANGE")),
                (fields::CROWN_HISTORY.to_string(), json!("NONE_FOUND")),
            ]),
            field_status: BTreeMap::from([
                (fields::MEMBER_BENEFITS.to_string(), FieldStatus::Sufficient),
                (fields::PROVIDER_NETWORK.to_string(), FieldStatus::Valid),
                (fields::PROCEDURE_COVERAGE.to_string(), FieldStatus::Covered),
                (fields::PRICING_VALIDATION.to_string(), FieldStatus::Valid),
                (fields::CROWN_HISTORY.to_string(), FieldStatus::Clear),
            ]),
            recommendation: Recommendation::Approve,
            benefit_calculation: BenefitCalculation::compute(1200, 80).unwrap(),
            verified_at: chrono::Utc::now(),
        }
    }

    fn rule_ids(record: &VerificationRecord) -> Vec<String> {
        let verifier = RecordSchemaVerifier::new().unwrap();
        let report = verifier.verify(&crown_claim(), record).unwrap();
        assert_eq!(report.passed, report.failures.is_empty());
        report.failures.into_iter().map(|f| f.rule_id).collect()
    }

    // ── Passing record ────────────────────────────────────────────────────────

    #[test]
    fn test_clean_record_passes() {
        let verifier = RecordSchemaVerifier::new().unwrap();
        let report = verifier.verify(&crown_claim(), &clean_record()).unwrap();
        assert!(report.passed, "expected pass, failures: {:?}", report.failures);
    }

    // ── Structural failures ───────────────────────────────────────────────────

    #[test]
    fn test_missing_status_key_fails_schema() {
        let mut record = clean_record();
        record.field_status.remove(fields::CROWN_HISTORY);
        assert_eq!(rule_ids(&record), vec!["json-schema"]);
    }

    #[test]
    fn test_status_outside_category_fails_schema() {
        let mut record = clean_record();
        // COVERED is not a member-benefits outcome.
        record
            .field_status
            .insert(fields::MEMBER_BENEFITS.to_string(), FieldStatus::Covered);
        let verifier = RecordSchemaVerifier::new().unwrap();
        let report = verifier.verify(&crown_claim(), &record).unwrap();

        assert!(!report.passed);
        assert_eq!(report.failures[0].rule_id, "json-schema");
        assert!(
            report.failures[0].message.contains("member_benefits"),
            "failure should point at the field: {}",
            report.failures[0].message
        );
    }

    #[test]
    fn test_unknown_status_key_fails_schema() {
        let mut record = clean_record();
        record
            .field_status
            .insert("tooth_colour".to_string(), FieldStatus::Valid);
        assert!(rule_ids(&record).contains(&"json-schema".to_string()));
    }

    #[test]
    fn test_percentage_over_100_fails_schema() {
        let mut record = clean_record();
        record.benefit_calculation.coverage_percentage = 120;
        assert!(rule_ids(&record).contains(&"json-schema".to_string()));
    }

    // ── Semantic failures ─────────────────────────────────────────────────────

    #[test]
    fn test_benefit_sum_mismatch() {
        let mut record = clean_record();
        record.benefit_calculation.member_responsibility = 200;
        assert_eq!(rule_ids(&record), vec!["benefit-sum"]);
    }

    #[test]
    fn test_benefit_rounding_mismatch() {
        let mut record = clean_record();
        record.benefit_calculation.covered_amount = 900;
        record.benefit_calculation.member_responsibility = 300;
        assert_eq!(rule_ids(&record), vec!["benefit-rounding"]);
    }

    #[test]
    fn test_claim_amount_mismatch() {
        let mut record = clean_record();
        record
            .submitted
            .insert(fields::CLAIM_AMOUNT.to_string(), json!(1300));
        assert_eq!(rule_ids(&record), vec!["claim-amount"]);
    }

    #[test]
    fn test_missing_procedure_code() {
        let mut record = clean_record();
        record.submitted.remove(fields::PROCEDURE_CODE);
        assert_eq!(rule_ids(&record), vec!["procedure-code"]);
    }

    #[test]
    fn test_approve_with_failing_fields_is_inconsistent() {
        let mut record = clean_record();
        record
            .field_status
            .insert(fields::MEMBER_BENEFITS.to_string(), FieldStatus::Insufficient);
        assert_eq!(rule_ids(&record), vec!["recommendation-consistency"]);

        record.recommendation = Recommendation::Deny;
        assert!(rule_ids(&record).is_empty());
    }

    #[test]
    fn test_all_failures_are_collected() {
        let mut record = clean_record();
        record.benefit_calculation.member_responsibility = 0;
        record
            .submitted
            .insert(fields::PROCEDURE_CODE.to_string(), json!("D2740"));
        record.field_status.remove(fields::PROVIDER_NETWORK);

        let ids = rule_ids(&record);
        assert!(ids.contains(&"json-schema".to_string()));
        assert!(ids.contains(&"benefit-sum".to_string()));
        assert!(ids.contains(&"procedure-code".to_string()));
    }
}
