//! Assembles review sessions over the static PAS.

use std::sync::Arc;

use claimstream_contracts::error::ClaimStreamResult;
use claimstream_core::{traits::DecisionPolicy, ReviewSession};
use claimstream_policy::TomlDecisionPolicy;
use claimstream_verify::RecordSchemaVerifier;

use crate::pas::{load_claim, StaticPasClient};

/// A session for `claim_id` under the standard decision policy.
pub fn standard_session(claim_id: &str) -> ClaimStreamResult<ReviewSession> {
    session_with_policy(claim_id, Box::new(TomlDecisionPolicy::standard()?))
}

/// A session for `claim_id` under `policy`, still in VIEW with the claim
/// loaded.
pub fn session_with_policy(
    claim_id: &str,
    policy: Box<dyn DecisionPolicy>,
) -> ClaimStreamResult<ReviewSession> {
    let mut session = ReviewSession::new(
        Arc::new(StaticPasClient::new()),
        Box::new(RecordSchemaVerifier::new()?),
        policy,
    );
    session.load_claim(load_claim(claim_id)?)?;
    Ok(session)
}
