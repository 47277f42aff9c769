//! Error types for the ClaimStream review workflow.
//!
//! Every fallible operation returns `ClaimStreamResult<T>`. No variant is
//! fatal: a session that returns an error is left in the state it was in
//! before the call.

use thiserror::Error;

use crate::review::{ReviewEvent, ReviewStep};

/// The unified error type for ClaimStream.
#[derive(Debug, Error)]
pub enum ClaimStreamError {
    /// The event is not legal in the session's current step.
    #[error("event '{event}' is not valid in step {step}: {reason}")]
    InvalidTransition {
        event: ReviewEvent,
        step: ReviewStep,
        reason: String,
    },

    /// The PAS collaborator failed, or its record did not pass verification.
    #[error("verification failed: {reason}")]
    VerificationFailed { reason: String },

    /// Session state is inconsistent with its own guards.
    ///
    /// Unreachable through `dispatch`; seeing one means a bug.
    #[error("precondition violated: {reason}")]
    PreconditionViolation { reason: String },

    /// The decision policy refused the requested outcome.
    #[error("decision rejected by policy: {reason}")]
    PolicyRejected { reason: String },

    /// A verification attempt is already outstanding for this session.
    #[error("verification attempt {attempt} is already in flight")]
    VerificationInFlight { attempt: u64 },

    /// A result arrived for an attempt the session has since abandoned.
    #[error("stale verification result for attempt {attempt} discarded")]
    StaleVerification { attempt: u64 },

    /// The event name could not be parsed.
    #[error("unknown review event '{name}'")]
    UnknownEvent { name: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The verification record schema could not be compiled.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },
}

/// Convenience alias used throughout the ClaimStream crates.
pub type ClaimStreamResult<T> = Result<T, ClaimStreamError>;
