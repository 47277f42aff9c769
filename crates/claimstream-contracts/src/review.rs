//! Review-session steps, events and snapshots.
//!
//! The presentation layer talks to a review session in exactly two shapes:
//! it sends a named `ReviewEvent` and receives an immutable `ReviewSnapshot`.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    claim::{ClaimId, ClaimRecord, ClaimStatus},
    error::ClaimStreamError,
    verification::VerificationRecord,
};

/// Unique identifier for one review session.
///
/// Verification tickets carry it so results from another session can never
/// be applied to this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub uuid::Uuid);

impl ReviewId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ReviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where the reviewer is in the inspect → cross-check → decide workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStep {
    View,
    Detail,
    Verified,
    Decided,
}

impl ReviewStep {
    /// 1-based position in the workflow, for "step 2/4" style displays.
    pub fn ordinal(self) -> u8 {
        match self {
            ReviewStep::View => 1,
            ReviewStep::Detail => 2,
            ReviewStep::Verified => 3,
            ReviewStep::Decided => 4,
        }
    }

    pub const COUNT: u8 = 4;
}

impl fmt::Display for ReviewStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewStep::View => "VIEW",
            ReviewStep::Detail => "DETAIL",
            ReviewStep::Verified => "VERIFIED",
            ReviewStep::Decided => "DECIDED",
        };
        f.write_str(s)
    }
}

/// The reviewer's final call on a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Approve,
    Deny,
}

impl DecisionOutcome {
    pub fn resulting_status(self) -> ClaimStatus {
        match self {
            DecisionOutcome::Approve => ClaimStatus::Approved,
            DecisionOutcome::Deny => ClaimStatus::Denied,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DecisionOutcome::Approve => "approve",
            DecisionOutcome::Deny => "deny",
        }
    }
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named event from the presentation layer. Events carry no arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewEvent {
    OpenCase,
    Verify,
    Approve,
    Deny,
    Reset,
}

impl ReviewEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewEvent::OpenCase => "open_case",
            ReviewEvent::Verify => "verify",
            ReviewEvent::Approve => "approve",
            ReviewEvent::Deny => "deny",
            ReviewEvent::Reset => "reset",
        }
    }
}

impl fmt::Display for ReviewEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewEvent {
    type Err = ClaimStreamError;

    /// Accepts snake_case, kebab-case and camelCase names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "opencase" | "open" => Ok(ReviewEvent::OpenCase),
            "verify" => Ok(ReviewEvent::Verify),
            "approve" => Ok(ReviewEvent::Approve),
            "deny" => Ok(ReviewEvent::Deny),
            "reset" => Ok(ReviewEvent::Reset),
            _ => Err(ClaimStreamError::UnknownEvent {
                name: s.to_string(),
            }),
        }
    }
}

/// Immutable view of a review session after a transition.
///
/// This is everything a presentation layer needs to render the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSnapshot {
    pub review_id: ReviewId,
    pub step: ReviewStep,
    pub claim: Option<ClaimRecord>,
    pub verification: Option<VerificationRecord>,
    /// True while a verification attempt has been started but not completed.
    pub verification_in_flight: bool,
    /// When the claim was approved or denied in this cycle.
    pub decided_at: Option<DateTime<Utc>>,
}

impl ReviewSnapshot {
    pub fn claim_status(&self) -> Option<ClaimStatus> {
        self.claim.as_ref().map(|c| c.status)
    }
}

/// Handle for one verification attempt.
///
/// Issued by `begin_verification` and handed back with the result. A ticket
/// from an abandoned attempt (or another session) is rejected as stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationTicket {
    pub review_id: ReviewId,
    pub attempt: u64,
    pub claim_id: ClaimId,
}
