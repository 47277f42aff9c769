//! Collaborator traits for the claim-review state machine.
//!
//! - `VerificationSource` — the PAS, consulted by `verify`
//! - `RecordVerifier`     — checks a PAS record before the session stores it
//! - `DecisionPolicy`     — gates `approve` and `deny`
//!
//! The session owns one of each and calls them in a fixed order; none of them
//! may mutate the claim.

use claimstream_contracts::{
    claim::{ClaimId, ClaimRecord},
    decision::{DecisionContext, DecisionVerdict},
    error::ClaimStreamResult,
    verification::{VerificationRecord, VerificationReport},
};

/// The external system of record the session verifies claims against.
///
/// Must be idempotent per `claim_id` within a session. Implementations may
/// block; hosts that need the session to stay responsive run the fetch on
/// another thread using a `VerificationTicket`.
pub trait VerificationSource: Send + Sync {
    /// Compare the submitted claim with reference data and return the record.
    ///
    /// Timeouts, unknown claims and malformed responses are all reported as
    /// `ClaimStreamError::VerificationFailed`.
    fn fetch_verification(&self, claim_id: &ClaimId) -> ClaimStreamResult<VerificationRecord>;
}

/// The last gate before a verification record is stored.
///
/// Implementations collect every failure rather than stopping at the first.
pub trait RecordVerifier: Send + Sync {
    fn verify(
        &self,
        claim: &ClaimRecord,
        record: &VerificationRecord,
    ) -> ClaimStreamResult<VerificationReport>;
}

/// Decides whether an approve/deny may be recorded.
///
/// Must be deterministic and free of I/O.
pub trait DecisionPolicy: Send + Sync {
    fn evaluate(&self, ctx: &DecisionContext) -> ClaimStreamResult<DecisionVerdict>;
}
