//! Scenario 3: Uncovered Procedure
//!
//! Priya Nair's whitening claim (CLM003) is for a procedure the plan does
//! not cover. The PAS recommends DENY. The reviewer first tries to approve;
//! the standard decision policy refuses and the session stays VERIFIED with
//! the claim still PENDING. The reviewer then denies.

use claimstream_contracts::{
    claim::ClaimStatus,
    error::{ClaimStreamError, ClaimStreamResult},
    review::{ReviewEvent, ReviewStep},
};

use super::{print_claim, print_comparison, print_settlement, print_step, unexpected};
use crate::wiring::standard_session;

pub const CLAIM_ID: &str = "CLM003";

/// Run Scenario 3: Uncovered Procedure.
pub fn run_scenario() -> ClaimStreamResult<()> {
    println!("=== Scenario 3: Uncovered Procedure ===");
    println!();

    let mut session = standard_session(CLAIM_ID)?;

    let snapshot = session.dispatch(ReviewEvent::OpenCase)?;
    if let Some(claim) = &snapshot.claim {
        print_claim(claim);
    }
    println!();

    let snapshot = session.dispatch(ReviewEvent::Verify)?;
    print_step(&snapshot);
    if let Some(record) = &snapshot.verification {
        print_comparison(record);
    }
    println!();

    println!("  Reviewer attempts: approve");
    match session.dispatch(ReviewEvent::Approve) {
        Err(ClaimStreamError::PolicyRejected { reason }) => {
            println!("  Policy verdict:    Reject");
            println!("  Reason:            {}", reason);
        }
        other => return Err(unexpected("PolicyRejected", other)),
    }
    let snapshot = session.snapshot();
    print_step(&snapshot);
    if snapshot.step != ReviewStep::Verified || snapshot.claim_status() != Some(ClaimStatus::Pending)
    {
        return Err(unexpected("VERIFIED/PENDING after rejection", snapshot.step));
    }
    println!();

    println!("  Reviewer attempts: deny");
    let snapshot = session.dispatch(ReviewEvent::Deny)?;
    print_step(&snapshot);
    print_settlement(&snapshot)?;
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimstream_contracts::verification::{fields, FieldStatus, Recommendation};

    #[test]
    fn test_scenario_runs() {
        run_scenario().unwrap();
    }

    #[test]
    fn test_policy_blocks_approval_without_changing_state() {
        let mut session = standard_session(CLAIM_ID).unwrap();
        session.dispatch(ReviewEvent::OpenCase).unwrap();
        let verified = session.dispatch(ReviewEvent::Verify).unwrap();

        let record = verified.verification.as_ref().unwrap();
        assert_eq!(record.recommendation, Recommendation::Deny);
        assert_eq!(
            record.field_status[fields::PROCEDURE_COVERAGE],
            FieldStatus::Mismatch
        );

        match session.dispatch(ReviewEvent::Approve) {
            Err(ClaimStreamError::PolicyRejected { reason }) => {
                assert!(reason.contains("recommends denial"), "got: {reason}");
            }
            other => panic!("expected PolicyRejected, got {:?}", other),
        }
        assert_eq!(session.snapshot(), verified);

        let denied = session.dispatch(ReviewEvent::Deny).unwrap();
        assert_eq!(denied.claim_status(), Some(ClaimStatus::Denied));
    }
}
