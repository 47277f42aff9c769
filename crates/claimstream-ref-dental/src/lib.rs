//! # claimstream-ref-dental
//!
//! Dental reference runtime for the ClaimStream claim-review state machine.
//!
//! Provides a static Policy Administration System (`pas::StaticPasClient`)
//! over hardcoded member, provider, coverage and pricing tables, the
//! settlement (EOB) summary shown after a decision, and four review
//! scenarios:
//!
//! 1. **Crown Approval** — every check passes; approve pays 960 of 1200.
//! 2. **Crown Denial** — insufficient benefits; the reviewer denies.
//! 3. **Uncovered Procedure** — the decision policy blocks approval against
//!    a DENY recommendation.
//! 4. **Reset Cycle** — a late verification result is discarded after reset.
//!
//! All data is hardcoded and fictional. No external API calls are made.

pub mod mock_data;
pub mod pas;
pub mod scenarios;
pub mod settlement;
pub mod wiring;
