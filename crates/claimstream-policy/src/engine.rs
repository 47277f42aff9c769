//! TOML-driven decision policy implementation.
//!
//! `TomlDecisionPolicy` loads a `PolicyConfig` and implements the
//! `DecisionPolicy` trait from claimstream-core.
//!
//! Evaluation algorithm:
//!
//! 1. Iterate rules in declaration order.
//! 2. The first rule whose `outcome`, `recommendation` and `fields_pass`
//!    conditions all match decides: `allow` → `Allow`, `reject` → `Reject`.
//! 3. If no rule matched → `Reject` with "rejected by default".

use std::path::Path;

use tracing::{debug, warn};

use claimstream_contracts::{
    decision::{DecisionContext, DecisionVerdict},
    error::{ClaimStreamError, ClaimStreamResult},
};
use claimstream_core::traits::DecisionPolicy;

use crate::rule::{PolicyConfig, RuleVerdict};

/// The decision policy shipped with ClaimStream.
///
/// Blocks approval when the PAS recommends DENY; allows everything else.
pub const STANDARD_POLICY: &str = include_str!("../policies/decision.toml");

/// Lets a reviewer approve against a DENY recommendation when every field
/// check passed.
pub const REVIEWER_OVERRIDE_POLICY: &str = include_str!("../policies/reviewer_override.toml");

/// A `DecisionPolicy` implementation that reads rules from a TOML document.
///
/// ```rust,ignore
/// use claimstream_policy::engine::TomlDecisionPolicy;
///
/// let policy = TomlDecisionPolicy::from_file(Path::new("policies/decision.toml"))?;
/// ```
#[derive(Debug)]
pub struct TomlDecisionPolicy {
    config: PolicyConfig,
}

impl TomlDecisionPolicy {
    /// Parse `s` as TOML and build a policy.
    ///
    /// Returns `ClaimStreamError::ConfigError` if the TOML is malformed or
    /// does not match `PolicyConfig`.
    pub fn from_toml_str(s: &str) -> ClaimStreamResult<Self> {
        let config: PolicyConfig = toml::from_str(s).map_err(|e| ClaimStreamError::ConfigError {
            reason: format!("failed to parse decision policy TOML: {}", e),
        })?;
        Ok(Self { config })
    }

    /// Read the file at `path` and parse it as a decision policy.
    pub fn from_file(path: &Path) -> ClaimStreamResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ClaimStreamError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The embedded standard policy.
    pub fn standard() -> ClaimStreamResult<Self> {
        Self::from_toml_str(STANDARD_POLICY)
    }
}

impl DecisionPolicy for TomlDecisionPolicy {
    fn evaluate(&self, ctx: &DecisionContext) -> ClaimStreamResult<DecisionVerdict> {
        debug!(
            claim_id = %ctx.claim_id,
            outcome = %ctx.outcome,
            recommendation = %ctx.recommendation,
            "evaluating decision policy"
        );

        if let Some(rule) = self.config.rules.iter().find(|r| r.matches(ctx)) {
            debug!(rule_id = %rule.id, "rule matched");

            return Ok(match rule.verdict {
                RuleVerdict::Allow => DecisionVerdict::Allow,
                RuleVerdict::Reject => DecisionVerdict::Reject {
                    reason: rule
                        .reject_reason
                        .clone()
                        .unwrap_or_else(|| format!("rejected by rule '{}'", rule.id)),
                },
            });
        }

        warn!(
            claim_id = %ctx.claim_id,
            outcome = %ctx.outcome,
            recommendation = %ctx.recommendation,
            "no decision rule matched; rejecting by default"
        );

        Ok(DecisionVerdict::Reject {
            reason: format!(
                "rejected by default: no decision rule matched outcome '{}' with recommendation '{}'",
                ctx.outcome, ctx.recommendation
            ),
        })
    }
}
