//! # Shared Harness Types
//!
//! This crate contains the domain types shared by every harness crate:
//! addresses and 32-byte words, funding-cycle configuration records with
//! their packed-metadata bitfield, payout/ticket mods, protocol constants,
//! and the locally computed expected-value math used by assertions.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **External State**: None of these types have a lifecycle of their own;
//!   they mirror call arguments and return tuples of the external contracts.

pub mod constants;
pub mod curve;
pub mod entities;
pub mod errors;

pub use curve::bonding_curve_amount;
pub use entities::*;
pub use errors::TypeError;

// Re-export U256 from primitive-types for use across all crates.
pub use primitive_types::U256;
