//! Scenario 2: Crown Denial
//!
//! Marcus Lee's crown claim (CLM002) bills 1200 against a 400 benefit
//! balance, and the PAS has a prior crown on file. The PAS recommends DENY;
//! the reviewer denies and both parties are notified. The verification
//! record stays on the decided snapshot for the EOB.

use claimstream_contracts::{
    claim::ClaimStatus,
    error::ClaimStreamResult,
    review::ReviewEvent,
    verification::Recommendation,
};

use super::{print_claim, print_comparison, print_settlement, print_step, unexpected};
use crate::wiring::standard_session;

pub const CLAIM_ID: &str = "CLM002";

/// Run Scenario 2: Crown Denial.
pub fn run_scenario() -> ClaimStreamResult<()> {
    println!("=== Scenario 2: Crown Denial ===");
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
    if record.recommendation != Recommendation::Deny {
        return Err(unexpected("DENY", record.recommendation));
    }
    println!();

    let snapshot = session.dispatch(ReviewEvent::Deny)?;
    print_step(&snapshot);
    if snapshot.claim_status() != Some(ClaimStatus::Denied) {
        return Err(unexpected("DENIED", snapshot.claim_status()));
    }
    print_settlement(&snapshot)?;
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimstream_contracts::{error::ClaimStreamError, review::ReviewStep};

    #[test]
    fn test_scenario_runs() {
        run_scenario().unwrap();
    }

    #[test]
    fn test_denial_retains_record() {
        let mut session = standard_session(CLAIM_ID).unwrap();
        session.dispatch(ReviewEvent::OpenCase).unwrap();
        session.dispatch(ReviewEvent::Verify).unwrap();
        let snapshot = session.dispatch(ReviewEvent::Deny).unwrap();

        assert_eq!(snapshot.step, ReviewStep::Decided);
        assert_eq!(snapshot.claim_status(), Some(ClaimStatus::Denied));
        assert!(snapshot.verification.is_some());
    }

    #[test]
    fn test_second_decision_is_rejected() {
        let mut session = standard_session(CLAIM_ID).unwrap();
        session.dispatch(ReviewEvent::OpenCase).unwrap();
        session.dispatch(ReviewEvent::Verify).unwrap();
        session.dispatch(ReviewEvent::Deny).unwrap();

        let before = session.snapshot();
        let err = session.dispatch(ReviewEvent::Approve).unwrap_err();
        assert!(matches!(err, ClaimStreamError::InvalidTransition { .. }));
        assert_eq!(session.snapshot(), before);
    }
}
