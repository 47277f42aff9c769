//! # claimstream-core
//!
//! The claim-review state machine for ClaimStream.
//!
//! This crate provides:
//! - The three collaborator traits (`VerificationSource`, `RecordVerifier`,
//!   `DecisionPolicy`)
//! - The `ReviewSession` that drives a claim through
//!   VIEW → DETAIL → VERIFIED → DECIDED
//!
//! ## Usage
//!
//! ```rust,ignore
//! use claimstream_core::{ReviewSession, traits::{VerificationSource, RecordVerifier, DecisionPolicy}};
//!
//! let mut session = ReviewSession::new(source, verifier, policy);
//! session.load_claim(claim)?;
//! let snapshot = session.dispatch("open_case".parse()?)?;
//! ```

pub mod session;
pub mod traits;

pub use session::ReviewSession;
