//! Scenario 1: Crown Approval
//!
//! Susan Davis's crown claim (CLM001) goes through the full happy path:
//! open the case, verify against the PAS, approve. The PAS reports every
//! field as passing and recommends APPROVE; the plan covers 80%, so the
//! payer owes 960 of the 1200 billed and the member 240.

use claimstream_contracts::{
    claim::ClaimStatus,
    error::ClaimStreamResult,
    review::{ReviewEvent, ReviewStep},
    verification::Recommendation,
};

use super::{print_claim, print_comparison, print_settlement, print_step, unexpected};
use crate::wiring::standard_session;

pub const CLAIM_ID: &str = "CLM001";

/// Run Scenario 1: Crown Approval.
pub fn run_scenario() -> ClaimStreamResult<()> {
    println!("=== Scenario 1: Crown Approval ===");
    println!();

    let mut session = standard_session(CLAIM_ID)?;

    let snapshot = session.dispatch(ReviewEvent::OpenCase)?;
    print_step(&snapshot);
    if let Some(claim) = &snapshot.claim {
        print_claim(claim);
    }
    println!();

    let snapshot = session.dispatch(ReviewEvent::Verify)?;
    print_step(&snapshot);
    let record = snapshot
        .verification
        .as_ref()
        .ok_or_else(|| unexpected("a verification record", &snapshot.step))?;
    print_comparison(record);
    if record.recommendation != Recommendation::Approve {
        return Err(unexpected("APPROVE", record.recommendation));
    }
    println!();

    let snapshot = session.dispatch(ReviewEvent::Approve)?;
    print_step(&snapshot);
    if snapshot.step != ReviewStep::Decided || snapshot.claim_status() != Some(ClaimStatus::Approved)
    {
        return Err(unexpected("DECIDED/APPROVED", snapshot.claim_status()));
    }
    print_settlement(&snapshot)?;
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::{summarize, SettlementSummary};

    #[test]
    fn test_scenario_runs() {
        run_scenario().unwrap();
    }

    #[test]
    fn test_approval_settles_960_and_leaves_540() {
        let mut session = standard_session(CLAIM_ID).unwrap();
        session.dispatch(ReviewEvent::OpenCase).unwrap();
        session.dispatch(ReviewEvent::Verify).unwrap();
        let snapshot = session.dispatch(ReviewEvent::Approve).unwrap();

        assert!(snapshot.decided_at.is_some());
        match summarize(&snapshot) {
            Some(SettlementSummary::Approved {
                payment_amount,
                payee,
                remaining_benefits,
                eob_recipient,
                ..
            }) => {
                assert_eq!(payment_amount, 960);
                assert_eq!(payee, "Dr. Johnson's Dental Practice");
                assert_eq!(remaining_benefits, Some(540));
                assert_eq!(eob_recipient, "susan.davis@email.com");
            }
            other => panic!("expected Approved settlement, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_twice_replaces_record() {
        let mut session = standard_session(CLAIM_ID).unwrap();
        session.dispatch(ReviewEvent::OpenCase).unwrap();
        let first = session.dispatch(ReviewEvent::Verify).unwrap();
        let second = session.dispatch(ReviewEvent::Verify).unwrap();

        assert_eq!(second.step, ReviewStep::Verified);
        let (a, b) = (first.verification.unwrap(), second.verification.unwrap());
        assert_eq!(a.field_status, b.field_status);
        assert_eq!(a.benefit_calculation, b.benefit_calculation);
    }
}
