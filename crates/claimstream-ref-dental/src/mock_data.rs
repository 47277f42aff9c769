//! Simulated Policy Administration System tables.
//!
//! All data in this module is hardcoded and fictional. No external systems are
//! contacted. The lookups stand in for the member, provider, coverage and
//! pricing services a real PAS would expose.

use serde_json::{json, Value};

/// PAS crown-history value meaning no prior crown work on file.
pub const NO_CROWN_HISTORY: &str = "NONE_FOUND";

// ── Claim submissions (mock) ──────────────────────────────────────────────────

/// Return the claim submission for `claim_id`, or `None` if no such claim.
///
/// A submission carries the claim identity plus the values the provider
/// asserted on the claim form (`submitted_data`).
///
/// | Claim  | Member        | Provider                      | Code  | Amount |
/// |--------|---------------|-------------------------------|-------|--------|
/// | CLM001 | Susan Davis   | Dr. Johnson's Dental Practice | D2750 | 1200   |
/// | CLM002 | Marcus Lee    | Bright Smile Dental           | D2750 | 1200   |
/// | CLM003 | Priya Nair    | Harbor Dental Group           | D9972 | 650    |
/// | CLM004 | Tom Alvarez   | Eastside Oral Care            | D2740 | 1350   |
pub fn get_claim_submission(claim_id: &str) -> Option<Value> {
    let claim = match claim_id {
        "CLM001" => json!({
            "claim_id": "CLM001",
            "provider_name": "Dr. Johnson's Dental Practice",
            "provider_id": "PRV001",
            "member_name": "Susan Davis",
            "member_id": "MBR001",
            "procedure_description": "Crown - porcelain fused to high noble metal",
            "procedure_code": "D2750",
            "amount": 1200,
            "status": "PENDING",
            "submitted_data": {
                "member_benefits": 1500,
                "provider_status": "ACTIVE",
                "procedure_code": "D2750",
                "claim_amount": 1200,
                "crown_history": "NONE_REPORTED"
            }
        }),
        "CLM002" => json!({
            "claim_id": "CLM002",
            "provider_name": "Bright Smile Dental",
            "provider_id": "PRV002",
            "member_name": "Marcus Lee",
            "member_id": "MBR002",
            "procedure_description": "Crown - porcelain fused to high noble metal",
            "procedure_code": "D2750",
            "amount": 1200,
            "status": "PENDING",
            "submitted_data": {
                "member_benefits": 1500,
                "provider_status": "ACTIVE",
                "procedure_code": "D2750",
                "claim_amount": 1200,
                "crown_history": "NONE_REPORTED"
            }
        }),
        "CLM003" => json!({
            "claim_id": "CLM003",
            "provider_name": "Harbor Dental Group",
            "provider_id": "PRV003",
            "member_name": "Priya Nair",
            "member_id": "MBR003",
            "procedure_description": "External bleaching - per arch",
            "procedure_code": "D9972",
            "amount": 650,
            "status": "PENDING",
            "submitted_data": {
                "member_benefits": 2000,
                "provider_status": "ACTIVE",
                "procedure_code": "D9972",
                "claim_amount": 650,
                "crown_history": "NONE_REPORTED"
            }
        }),
        "CLM004" => json!({
            "claim_id": "CLM004",
            "provider_name": "Eastside Oral Care",
            "provider_id": "PRV004",
            "member_name": "Tom Alvarez",
            "member_id": "MBR004",
            "procedure_description": "Crown - porcelain/ceramic",
            "procedure_code": "D2740",
            "amount": 1350,
            "status": "PENDING",
            "submitted_data": {
                "member_benefits": 1800,
                "provider_status": "ACTIVE",
                "procedure_code": "D2740",
                "claim_amount": 1350,
                "crown_history": "NONE_REPORTED"
            }
        }),
        _ => return None,
    };
    Some(claim)
}

/// Every claim ID the mock PAS knows about, in queue order.
pub fn known_claim_ids() -> &'static [&'static str] {
    &["CLM001", "CLM002", "CLM003", "CLM004"]
}

// ── Member eligibility (mock) ─────────────────────────────────────────────────

/// Return the PAS member record for `member_id`.
///
/// Unknown members come back with zero remaining benefits.
pub fn get_member_record(member_id: &str) -> Value {
    let (name, email, remaining_benefits, crown_history) = match member_id {
        "MBR001" => ("Susan Davis", "susan.davis@email.com", 1500, NO_CROWN_HISTORY),
        "MBR002" => ("Marcus Lee", "marcus.lee@email.com", 400, "D2750 (2022-03-14)"),
        "MBR003" => ("Priya Nair", "priya.nair@email.com", 2000, NO_CROWN_HISTORY),
        "MBR004" => ("Tom Alvarez", "tom.alvarez@email.com", 1800, NO_CROWN_HISTORY),
        _ => ("UNKNOWN", "", 0, NO_CROWN_HISTORY),
    };

    json!({
        "member_id": member_id,
        "name": name,
        "email": email,
        "remaining_benefits": remaining_benefits,
        "crown_history": crown_history
    })
}

// ── Provider network (mock) ───────────────────────────────────────────────────

/// Return the PAS network record for `provider_id`.
///
/// Unknown providers are reported as `NOT_IN_NETWORK`.
pub fn get_provider_record(provider_id: &str) -> Value {
    let (name, network_status) = match provider_id {
        "PRV001" => ("Dr. Johnson's Dental Practice", "ACTIVE"),
        "PRV002" => ("Bright Smile Dental", "ACTIVE"),
        "PRV003" => ("Harbor Dental Group", "ACTIVE"),
        "PRV004" => ("Eastside Oral Care", "TERMINATED"),
        _ => ("UNKNOWN", "NOT_IN_NETWORK"),
    };

    json!({
        "provider_id": provider_id,
        "name": name,
        "network_status": network_status
    })
}

// ── Procedure coverage (mock) ─────────────────────────────────────────────────

/// Return the plan's coverage for a CDT procedure code.
///
/// - D2740 crown, porcelain/ceramic             → covered at 80%
/// - D2750 crown, porcelain fused to high noble → covered at 80%
/// - D9972 external bleaching                   → not covered
///
/// Codes not on the schedule are not covered.
pub fn get_procedure_coverage(procedure_code: &str) -> Value {
    let (covered, coverage_percentage, is_crown) = match procedure_code {
        "D2740" | "D2750" => (true, 80, true),
        // D9972 and anything else off the schedule.
        _ => (false, 0, false),
    };

    json!({
        "procedure_code": procedure_code,
        "covered": covered,
        "coverage_percentage": coverage_percentage,
        "is_crown": is_crown
    })
}

// ── Pricing benchmarks (mock) ─────────────────────────────────────────────────

/// Return the maximum allowed charge for a procedure code.
///
/// Codes without a benchmark have a maximum of zero, so any charge is above
/// range.
pub fn get_pricing_benchmark(procedure_code: &str) -> Value {
    let max_allowed = match procedure_code {
        "D2740" => 1500,
        "D2750" => 1400,
        "D9972" => 700,
        _ => 0,
    };

    json!({
        "procedure_code": procedure_code,
        "max_allowed": max_allowed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_claim_has_a_submission() {
        for id in known_claim_ids() {
            let claim = get_claim_submission(id).expect("known claim must resolve");
            assert_eq!(claim["claim_id"], *id);
            assert_eq!(claim["amount"], claim["submitted_data"]["claim_amount"]);
            assert_eq!(claim["procedure_code"], claim["submitted_data"]["procedure_code"]);
        }
        assert!(get_claim_submission("CLM999").is_none());
    }

    #[test]
    fn test_unknown_lookups_fail_closed() {
        assert_eq!(get_member_record("MBR999")["remaining_benefits"], 0);
        assert_eq!(get_provider_record("PRV999")["network_status"], "NOT_IN_NETWORK");
        assert_eq!(get_procedure_coverage("D0000")["covered"], false);
        assert_eq!(get_pricing_benchmark("D0000")["max_allowed"], 0);
    }
}
