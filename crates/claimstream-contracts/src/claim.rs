//! Claim identity and lifecycle status.
//!
//! A `ClaimRecord` is the unit under review. Its `status` is the only field
//! the review session ever changes, and it moves at most once per review
//! cycle: PENDING → APPROVED or PENDING → DENIED.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ClaimStreamError, ClaimStreamResult},
    review::DecisionOutcome,
};

/// Opaque identifier for a submitted claim, e.g. `ClaimId("CLM001")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimId(pub String);

impl ClaimId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Adjudication status of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Denied,
}

impl ClaimStatus {
    /// True for APPROVED and DENIED.
    pub fn is_terminal(self) -> bool {
        !matches!(self, ClaimStatus::Pending)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClaimStatus::Pending => "PENDING",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Denied => "DENIED",
        };
        f.write_str(s)
    }
}

/// A single dental claim under review.
///
/// `amount` is expressed in whole currency units (dollars). Cents are not
/// modelled; the reference PAS prices procedures in whole dollars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claim_id: ClaimId,
    pub provider_name: String,
    pub provider_id: String,
    pub member_name: String,
    pub member_id: String,
    /// Human-readable description of the billed procedure.
    pub procedure_description: String,
    /// CDT procedure code, e.g. "D2750".
    pub procedure_code: String,
    /// Billed amount in whole currency units.
    pub amount: u64,
    pub status: ClaimStatus,
}

impl ClaimRecord {
    /// Record the reviewer's decision on this claim.
    ///
    /// Fails with `PreconditionViolation` if the claim has already been
    /// decided. The session guards this before calling, so reaching the
    /// error means session state is corrupt.
    pub fn settle(&mut self, outcome: DecisionOutcome) -> ClaimStreamResult<()> {
        if self.status.is_terminal() {
            return Err(ClaimStreamError::PreconditionViolation {
                reason: format!(
                    "claim {} is already {}; status may change only once",
                    self.claim_id, self.status
                ),
            });
        }
        self.status = outcome.resulting_status();
        Ok(())
    }

    /// A copy of this claim with identical identity fields and status PENDING.
    pub fn fresh(&self) -> Self {
        Self {
            status: ClaimStatus::Pending,
            ..self.clone()
        }
    }
}
