//! Decision rule types and configuration schema.
//!
//! A `PolicyConfig` is deserialized from TOML and holds an ordered list of
//! `DecisionRule`s. Rules are evaluated in declaration order and the first
//! matching rule wins. If no rule matches, the decision is rejected.

use serde::{Deserialize, Serialize};

use claimstream_contracts::decision::DecisionContext;

/// What a matching rule does with the attempted decision.
///
/// ```toml
/// verdict = "allow"
/// verdict = "reject"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleVerdict {
    Allow,
    Reject,
}

/// A single decision rule loaded from TOML.
///
/// `outcome` and `recommendation` accept the wildcard `"*"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRule {
    /// Stable identifier used in logs and rejection messages.
    pub id: String,

    pub description: String,

    /// `"approve"`, `"deny"` or `"*"`.
    pub outcome: String,

    /// `"APPROVE"`, `"DENY"`, `"MANUAL_REVIEW"` or `"*"`.
    pub recommendation: String,

    /// When set, the rule only matches if `DecisionContext::all_fields_pass`
    /// equals this value.
    #[serde(default)]
    pub fields_pass: Option<bool>,

    pub verdict: RuleVerdict,

    /// Shown to the reviewer when `verdict = "reject"`.
    pub reject_reason: Option<String>,
}

impl DecisionRule {
    /// Return true if this rule applies to `ctx`.
    ///
    /// `outcome` compares case-insensitively; `recommendation` compares
    /// against the PAS wire name (e.g. `MANUAL_REVIEW`), also
    /// case-insensitively.
    pub fn matches(&self, ctx: &DecisionContext) -> bool {
        let outcome_matches =
            self.outcome == "*" || self.outcome.eq_ignore_ascii_case(ctx.outcome.as_str());
        let recommendation_matches = self.recommendation == "*"
            || self
                .recommendation
                .eq_ignore_ascii_case(ctx.recommendation.as_str());
        let fields_match = self.fields_pass.map_or(true, |want| want == ctx.all_fields_pass);
        outcome_matches && recommendation_matches && fields_match
    }
}

/// The top-level structure deserialized from a TOML policy file.
///
/// ```toml
/// [[rules]]
/// id = "allow-reviewer-decision"
/// description = "The reviewer's decision stands"
/// outcome = "*"
/// recommendation = "*"
/// verdict = "allow"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Ordered list of rules. First match wins.
    pub rules: Vec<DecisionRule>,
}
