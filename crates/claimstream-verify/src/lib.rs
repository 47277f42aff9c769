//! # claimstream-verify
//!
//! Checks every PAS verification record before a review session stores it.
//!
//! [`RecordSchemaVerifier`] implements
//! [`RecordVerifier`](claimstream_core::traits::RecordVerifier) in two phases:
//! JSON Schema validation of the record's wire shape, then semantic rules that
//! tie the record to the claim under review (benefit split, claim amount,
//! procedure code, recommendation consistency).

pub mod engine;

pub use engine::{record_schema, RecordSchemaVerifier};
