//! Dental reference runtime demo scenarios.
//!
//! Each scenario drives a real `ReviewSession` (standard decision policy,
//! schema verifier, static PAS) through one review path and prints what a
//! reviewer would see at every step.

pub mod crown_approval;
pub mod crown_denial;
pub mod reset_cycle;
pub mod uncovered_procedure;

use serde_json::Value;

use claimstream_contracts::{
    claim::ClaimRecord,
    error::{ClaimStreamError, ClaimStreamResult},
    review::ReviewSnapshot,
    verification::VerificationRecord,
};

use crate::settlement::{self, usd};

// ── Shared printing helpers ───────────────────────────────────────────────────

pub(crate) fn print_step(snapshot: &ReviewSnapshot) {
    println!(
        "  Step {}/4 ({})  status: {}",
        snapshot.step.ordinal(),
        snapshot.step,
        snapshot
            .claim_status()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
}

pub(crate) fn print_claim(claim: &ClaimRecord) {
    println!("  Claim ID:   {}", claim.claim_id);
    println!("  Provider:   {} ({})", claim.provider_name, claim.provider_id);
    println!("  Member:     {} ({})", claim.member_name, claim.member_id);
    println!(
        "  Procedure:  {} {}",
        claim.procedure_code, claim.procedure_description
    );
    println!("  Amount:     {}", usd(claim.amount));
}

fn cell(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n.as_u64().map(usd).unwrap_or_else(|| n.to_string()),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}

pub(crate) fn print_comparison(record: &VerificationRecord) {
    println!(
        "  {:<28} {:<16} {:<16} {}",
        "Data Field", "Submitted", "PAS", "Status"
    );
    for row in record.comparison_rows() {
        println!(
            "  {:<28} {:<16} {:<16} {}",
            row.label,
            cell(row.submitted.as_ref()),
            cell(row.reference.as_ref()),
            row.status.map(|s| s.as_str()).unwrap_or("-")
        );
    }
    let benefit = &record.benefit_calculation;
    println!();
    println!("  Recommendation:        {}", record.recommendation);
    println!("  Coverage:              {}%", benefit.coverage_percentage);
    println!("  Covered amount:        {}", usd(benefit.covered_amount));
    println!("  Member responsibility: {}", usd(benefit.member_responsibility));
}

pub(crate) fn print_settlement(snapshot: &ReviewSnapshot) -> ClaimStreamResult<()> {
    let summary = settlement::summarize(snapshot).ok_or_else(|| {
        ClaimStreamError::PreconditionViolation {
            reason: format!("no settlement for a session in {}", snapshot.step),
        }
    })?;
    for line in summary.to_string().lines() {
        println!("  {}", line);
    }
    Ok(())
}

/// Fail the scenario when an outcome differs from the scripted one.
pub(crate) fn unexpected(what: &str, got: impl std::fmt::Debug) -> ClaimStreamError {
    ClaimStreamError::PreconditionViolation {
        reason: format!("scenario expected {}, got {:?}", what, got),
    }
}
