//! Decision policy context and verdict types.
//!
//! Before a review session records APPROVED or DENIED it builds a
//! `DecisionContext` and asks the decision policy for a `DecisionVerdict`.
//! Any verdict other than `Allow` leaves the session untouched.

use serde::{Deserialize, Serialize};

use crate::{review::DecisionOutcome, verification::Recommendation};

/// What the policy engine returns for one decision attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionVerdict {
    /// The decision may be recorded.
    Allow,

    /// The decision is refused. The session stays in VERIFIED.
    Reject {
        /// Human-readable explanation surfaced to the reviewer.
        reason: String,
    },
}

/// Everything the decision policy sees about the attempted decision.
///
/// Plain values only, so policy rules can be written without the full
/// verification record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionContext {
    pub review_id: String,
    pub claim_id: String,
    /// The outcome the reviewer is trying to record.
    pub outcome: DecisionOutcome,
    /// The PAS recommendation from the current verification record.
    pub recommendation: Recommendation,
    pub coverage_percentage: u8,
    /// True if every field status in the record is a pass.
    pub all_fields_pass: bool,
}
