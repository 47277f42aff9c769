//! # claimstream-policy
//!
//! A TOML-driven, reject-by-default decision policy for ClaimStream.
//!
//! ## Overview
//!
//! [`TomlDecisionPolicy`] implements
//! [`DecisionPolicy`](claimstream_core::traits::DecisionPolicy). Before a
//! review session records APPROVED or DENIED it asks the policy whether that
//! outcome is permitted given the PAS recommendation. Whether a reviewer may
//! approve a claim the PAS recommends denying is a deployment choice, so it
//! lives here rather than in the state machine.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use claimstream_policy::TomlDecisionPolicy;
//!
//! let policy = TomlDecisionPolicy::standard()?;
//! // Pass `Box::new(policy)` to `ReviewSession::new(...)`.
//! ```

pub mod engine;
pub mod rule;

pub use engine::TomlDecisionPolicy;
pub use rule::{DecisionRule, PolicyConfig, RuleVerdict};

// ── Tests ─────────────────────────────────────────────────────────────────────
