//! The claim-review state machine.
//!
//! A `ReviewSession` walks one claim through
//!
//!   VIEW → DETAIL → VERIFIED → DECIDED
//!
//! driven by named events. `reset` returns to VIEW from anywhere. DECIDED is
//! only reachable from VERIFIED, and VERIFIED is only reachable after a PAS
//! record has been fetched and passed the record verifier, so a decision can
//! never be recorded against an unverified claim.
//!
//! Every public operation either applies completely or returns an error and
//! leaves the session exactly as it was.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use claimstream_contracts::{
    claim::ClaimRecord,
    decision::{DecisionContext, DecisionVerdict},
    error::{ClaimStreamError, ClaimStreamResult},
    review::{DecisionOutcome, ReviewEvent, ReviewId, ReviewSnapshot, ReviewStep, VerificationTicket},
    verification::VerificationRecord,
};

use crate::traits::{DecisionPolicy, RecordVerifier, VerificationSource};

/// One reviewer's session over one claim.
///
/// Create one per review session and drop it when the session ends. The
/// session is mutated through `&mut self` only, so events are applied one at
/// a time by construction.
pub struct ReviewSession {
    review_id: ReviewId,
    step: ReviewStep,
    claim: Option<ClaimRecord>,
    verification: Option<VerificationRecord>,
    decided_at: Option<DateTime<Utc>>,
    /// Last attempt number issued by `begin_verification`.
    attempt: u64,
    /// Attempt currently awaiting `complete_verification`, if any.
    in_flight: Option<u64>,
    source: Arc<dyn VerificationSource>,
    verifier: Box<dyn RecordVerifier>,
    policy: Box<dyn DecisionPolicy>,
}

impl ReviewSession {
    /// Create an empty session in VIEW with no claim loaded.
    pub fn new(
        source: Arc<dyn VerificationSource>,
        verifier: Box<dyn RecordVerifier>,
        policy: Box<dyn DecisionPolicy>,
    ) -> Self {
        Self {
            review_id: ReviewId::new(),
            step: ReviewStep::View,
            claim: None,
            verification: None,
            decided_at: None,
            attempt: 0,
            in_flight: None,
            source,
            verifier,
            policy,
        }
    }

    pub fn review_id(&self) -> ReviewId {
        self.review_id
    }

    pub fn step(&self) -> ReviewStep {
        self.step
    }

    pub fn claim(&self) -> Option<&ClaimRecord> {
        self.claim.as_ref()
    }

    pub fn verification(&self) -> Option<&VerificationRecord> {
        self.verification.as_ref()
    }

    /// Shared handle to the PAS collaborator, for hosts that run the fetch
    /// for a `VerificationTicket` off the event loop.
    pub fn verification_source(&self) -> Arc<dyn VerificationSource> {
        Arc::clone(&self.source)
    }

    /// The immutable view a presentation layer renders from.
    pub fn snapshot(&self) -> ReviewSnapshot {
        ReviewSnapshot {
            review_id: self.review_id,
            step: self.step,
            claim: self.claim.clone(),
            verification: self.verification.clone(),
            verification_in_flight: self.in_flight.is_some(),
            decided_at: self.decided_at,
        }
    }

    /// Install the claim to review. Only legal in VIEW.
    ///
    /// The claim is always loaded as PENDING.
    pub fn load_claim(&mut self, claim: ClaimRecord) -> ClaimStreamResult<ReviewSnapshot> {
        if self.step != ReviewStep::View {
            return Err(ClaimStreamError::PreconditionViolation {
                reason: format!("a claim can only be loaded in VIEW, session is in {}", self.step),
            });
        }

        info!(
            review_id = %self.review_id,
            claim_id = %claim.claim_id,
            "claim loaded"
        );
        self.claim = Some(claim.fresh());
        self.verification = None;
        self.decided_at = None;
        Ok(self.snapshot())
    }

    /// Apply one named event and return the resulting snapshot.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` — the event is not legal in the current step
    /// - `VerificationFailed` — the PAS failed or its record was rejected
    /// - `VerificationInFlight` — a ticketed verification is outstanding
    /// - `PolicyRejected` — the decision policy refused approve/deny
    /// - `PreconditionViolation` — internal state is inconsistent
    pub fn dispatch(&mut self, event: ReviewEvent) -> ClaimStreamResult<ReviewSnapshot> {
        debug!(
            review_id = %self.review_id,
            step = %self.step,
            event = %event,
            "dispatching review event"
        );

        let result = match event {
            ReviewEvent::OpenCase => self.open_case(),
            ReviewEvent::Verify => self.request_verification(),
            ReviewEvent::Approve => self.decide(DecisionOutcome::Approve),
            ReviewEvent::Deny => self.decide(DecisionOutcome::Deny),
            ReviewEvent::Reset => Ok(self.reset()),
        };

        if let Err(e) = &result {
            warn!(
                review_id = %self.review_id,
                step = %self.step,
                event = %event,
                error = %e,
                "review event rejected"
            );
        }
        result
    }

    /// VIEW → DETAIL. Requires a loaded claim.
    pub fn open_case(&mut self) -> ClaimStreamResult<ReviewSnapshot> {
        let event = ReviewEvent::OpenCase;
        if self.step != ReviewStep::View {
            return Err(self.invalid(event, "the case is already open"));
        }
        let Some(claim) = &self.claim else {
            return Err(self.invalid(event, "no claim is loaded"));
        };

        info!(
            review_id = %self.review_id,
            claim_id = %claim.claim_id,
            "case opened"
        );
        self.step = ReviewStep::Detail;
        Ok(self.snapshot())
    }

    /// DETAIL|VERIFIED → VERIFIED, fetching from the PAS synchronously.
    pub fn request_verification(&mut self) -> ClaimStreamResult<ReviewSnapshot> {
        let ticket = self.begin_verification()?;
        let result = self.source.fetch_verification(&ticket.claim_id);
        self.complete_verification(ticket, result)
    }

    /// Start a verification attempt and return its ticket.
    ///
    /// At most one attempt may be outstanding per session. The step does not
    /// change until `complete_verification` succeeds.
    pub fn begin_verification(&mut self) -> ClaimStreamResult<VerificationTicket> {
        let event = ReviewEvent::Verify;

        if let Some(attempt) = self.in_flight {
            return Err(ClaimStreamError::VerificationInFlight { attempt });
        }
        if !matches!(self.step, ReviewStep::Detail | ReviewStep::Verified) {
            return Err(self.invalid(event, "the case must be open and undecided"));
        }
        let claim = self.claim.as_ref().ok_or_else(|| ClaimStreamError::PreconditionViolation {
            reason: format!("session is in {} with no claim loaded", self.step),
        })?;
        if claim.status.is_terminal() {
            return Err(self.invalid(event, &format!("claim is already {}", claim.status)));
        }

        let claim_id = claim.claim_id.clone();
        self.attempt += 1;
        self.in_flight = Some(self.attempt);

        debug!(
            review_id = %self.review_id,
            claim_id = %claim_id,
            attempt = self.attempt,
            "verification attempt started"
        );

        Ok(VerificationTicket {
            review_id: self.review_id,
            attempt: self.attempt,
            claim_id,
        })
    }

    /// Apply the result of the attempt identified by `ticket`.
    ///
    /// A ticket that is not the current in-flight attempt of this session is
    /// rejected with `StaleVerification` and nothing changes. Otherwise the
    /// attempt is closed; a failed fetch or a record that does not pass the
    /// record verifier yields `VerificationFailed` and the step is unchanged.
    pub fn complete_verification(
        &mut self,
        ticket: VerificationTicket,
        result: ClaimStreamResult<VerificationRecord>,
    ) -> ClaimStreamResult<ReviewSnapshot> {
        if ticket.review_id != self.review_id || self.in_flight != Some(ticket.attempt) {
            warn!(
                review_id = %self.review_id,
                attempt = ticket.attempt,
                "discarding stale verification result"
            );
            return Err(ClaimStreamError::StaleVerification {
                attempt: ticket.attempt,
            });
        }

        let claim = self.claim.as_ref().ok_or_else(|| ClaimStreamError::PreconditionViolation {
            reason: "verification completed with no claim loaded".to_string(),
        })?;
        if claim.claim_id != ticket.claim_id {
            return Err(ClaimStreamError::PreconditionViolation {
                reason: format!(
                    "ticket was issued for claim {} but session holds {}",
                    ticket.claim_id, claim.claim_id
                ),
            });
        }
        // Close the attempt only once it is known to belong to this claim.
        self.in_flight = None;

        let record = result.map_err(|e| match e {
            failed @ ClaimStreamError::VerificationFailed { .. } => failed,
            other => ClaimStreamError::VerificationFailed {
                reason: other.to_string(),
            },
        })?;

        let report = self.verifier.verify(claim, &record).map_err(|e| match e {
            failed @ ClaimStreamError::VerificationFailed { .. } => failed,
            other => ClaimStreamError::VerificationFailed {
                reason: format!("record verifier failed: {other}"),
            },
        })?;
        if !report.passed {
            let summary = report.failure_summary();
            warn!(
                review_id = %self.review_id,
                claim_id = %claim.claim_id,
                failures = %summary,
                "verification record rejected"
            );
            return Err(ClaimStreamError::VerificationFailed { reason: summary });
        }

        info!(
            review_id = %self.review_id,
            claim_id = %claim.claim_id,
            recommendation = %record.recommendation,
            covered_amount = record.benefit_calculation.covered_amount,
            replaced = self.verification.is_some(),
            "verification complete"
        );
        self.verification = Some(record);
        self.step = ReviewStep::Verified;
        Ok(self.snapshot())
    }

    /// VERIFIED → DECIDED, recording APPROVED or DENIED.
    pub fn decide(&mut self, outcome: DecisionOutcome) -> ClaimStreamResult<ReviewSnapshot> {
        let event = match outcome {
            DecisionOutcome::Approve => ReviewEvent::Approve,
            DecisionOutcome::Deny => ReviewEvent::Deny,
        };

        match self.step {
            ReviewStep::Verified => {}
            ReviewStep::Decided => return Err(self.invalid(event, "the claim is already decided")),
            _ => return Err(self.invalid(event, "the claim has not been verified")),
        }
        if let Some(attempt) = self.in_flight {
            return Err(self.invalid(
                event,
                &format!("re-verification attempt {attempt} is still in flight"),
            ));
        }

        let ctx = {
            let claim = self.claim.as_ref().ok_or_else(|| ClaimStreamError::PreconditionViolation {
                reason: "session is VERIFIED with no claim loaded".to_string(),
            })?;
            if claim.status.is_terminal() {
                return Err(self.invalid(event, &format!("claim is already {}", claim.status)));
            }
            let record = self.verification.as_ref().ok_or_else(|| {
                ClaimStreamError::PreconditionViolation {
                    reason: "session is VERIFIED with no verification record".to_string(),
                }
            })?;
            DecisionContext {
                review_id: self.review_id.to_string(),
                claim_id: claim.claim_id.to_string(),
                outcome,
                recommendation: record.recommendation,
                coverage_percentage: record.benefit_calculation.coverage_percentage,
                all_fields_pass: record.all_fields_pass(),
            }
        };

        if let DecisionVerdict::Reject { reason } = self.policy.evaluate(&ctx)? {
            warn!(
                review_id = %self.review_id,
                claim_id = %ctx.claim_id,
                outcome = %outcome,
                recommendation = %ctx.recommendation,
                reason = %reason,
                "decision rejected by policy"
            );
            return Err(ClaimStreamError::PolicyRejected { reason });
        }

        let claim = self.claim.as_mut().ok_or_else(|| ClaimStreamError::PreconditionViolation {
            reason: "claim disappeared during decision".to_string(),
        })?;
        claim.settle(outcome)?;

        info!(
            review_id = %self.review_id,
            claim_id = %claim.claim_id,
            status = %claim.status,
            "claim decided"
        );
        self.step = ReviewStep::Decided;
        self.decided_at = Some(Utc::now());
        Ok(self.snapshot())
    }

    /// Return to VIEW with a fresh PENDING claim and no verification.
    ///
    /// Always legal. An outstanding verification attempt is abandoned; its
    /// result will be rejected as stale.
    pub fn reset(&mut self) -> ReviewSnapshot {
        if let Some(attempt) = self.in_flight.take() {
            info!(
                review_id = %self.review_id,
                attempt,
                "abandoning in-flight verification"
            );
        }
        self.step = ReviewStep::View;
        self.claim = self.claim.as_ref().map(ClaimRecord::fresh);
        self.verification = None;
        self.decided_at = None;
        debug!(review_id = %self.review_id, "session reset");
        self.snapshot()
    }

    fn invalid(&self, event: ReviewEvent, reason: &str) -> ClaimStreamError {
        ClaimStreamError::InvalidTransition {
            event,
            step: self.step,
            reason: reason.to_string(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
