//! Scenario 4: Reset Cycle
//!
//! A verification for CLM001 is started on a worker thread, and the reviewer
//! resets before it returns. When the late result arrives it is discarded as
//! stale. The reviewer then runs a second, clean cycle through to approval;
//! the reset claim comes back PENDING with the same identity.

use std::thread;

use claimstream_contracts::{
    claim::ClaimStatus,
    error::{ClaimStreamError, ClaimStreamResult},
    review::{ReviewEvent, ReviewStep},
};

use super::{print_settlement, print_step, unexpected};
use crate::wiring::standard_session;

pub const CLAIM_ID: &str = "CLM001";

/// Run Scenario 4: Reset Cycle.
pub fn run_scenario() -> ClaimStreamResult<()> {
    println!("=== Scenario 4: Reset Cycle ===");
    println!();

    let mut session = standard_session(CLAIM_ID)?;
    session.dispatch(ReviewEvent::OpenCase)?;

    // ── Cycle 1: verification abandoned by reset ──────────────────────────────

    println!("  ── Cycle 1: reset while verification is in flight ──");
    let ticket = session.begin_verification()?;
    println!("  Verification attempt {} started", ticket.attempt);
    print_step(&session.snapshot());

    let source = session.verification_source();
    let claim_id = ticket.claim_id.clone();
    let worker = thread::spawn(move || source.fetch_verification(&claim_id));

    let snapshot = session.dispatch(ReviewEvent::Reset)?;
    println!("  Reviewer reset the session");
    print_step(&snapshot);

    let late = worker.join().map_err(|_| ClaimStreamError::VerificationFailed {
        reason: "PAS worker panicked".to_string(),
    })?;
    match session.complete_verification(ticket, late) {
        Err(ClaimStreamError::StaleVerification { attempt }) => {
            println!("  Late result for attempt {} discarded", attempt);
        }
        other => return Err(unexpected("StaleVerification", other)),
    }
    let snapshot = session.snapshot();
    if snapshot.step != ReviewStep::View || snapshot.verification.is_some() {
        return Err(unexpected("VIEW with no record", snapshot.step));
    }
    print_step(&snapshot);
    println!();

    // ── Cycle 2: clean review ─────────────────────────────────────────────────

    println!("  ── Cycle 2: open, verify, approve ──");
    session.dispatch(ReviewEvent::OpenCase)?;
    session.dispatch(ReviewEvent::Verify)?;
    let snapshot = session.dispatch(ReviewEvent::Approve)?;
    print_step(&snapshot);
    if snapshot.claim_status() != Some(ClaimStatus::Approved) {
        return Err(unexpected("APPROVED", snapshot.claim_status()));
    }
    print_settlement(&snapshot)?;
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_runs() {
        run_scenario().unwrap();
    }

    #[test]
    fn test_reset_after_decision_restores_pending_claim() {
        let mut session = standard_session(CLAIM_ID).unwrap();
        session.dispatch(ReviewEvent::OpenCase).unwrap();
        session.dispatch(ReviewEvent::Verify).unwrap();
        let decided = session.dispatch(ReviewEvent::Approve).unwrap();

        let reset = session.dispatch(ReviewEvent::Reset).unwrap();
        assert_eq!(reset.step, ReviewStep::View);
        assert!(reset.verification.is_none());
        assert!(reset.decided_at.is_none());

        let (before, after) = (decided.claim.unwrap(), reset.claim.unwrap());
        assert_eq!(after.status, ClaimStatus::Pending);
        assert_eq!(after.claim_id, before.claim_id);
        assert_eq!(after.amount, before.amount);
    }

    #[test]
    fn test_duplicate_verify_while_in_flight() {
        let mut session = standard_session(CLAIM_ID).unwrap();
        session.dispatch(ReviewEvent::OpenCase).unwrap();
        let ticket = session.begin_verification().unwrap();

        assert!(matches!(
            session.dispatch(ReviewEvent::Verify),
            Err(ClaimStreamError::VerificationInFlight { attempt }) if attempt == ticket.attempt
        ));
        assert!(session.snapshot().verification_in_flight);
    }
}
