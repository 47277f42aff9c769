//! # claimstream-contracts
//!
//! Shared types for the ClaimStream claim-review workflow.
//!
//! Every crate in the workspace imports from here. No workflow logic lives in
//! this crate, only data definitions, their invariant-preserving helpers, and
//! the error type.

pub mod claim;
pub mod decision;
pub mod error;
pub mod review;
pub mod verification;
