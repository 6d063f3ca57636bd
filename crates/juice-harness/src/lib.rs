//! # Test Harness Bootstrap
//!
//! Binds everything a scenario suite needs onto a shared [`TestContext`]:
//! the deployer and signer accounts, protocol constants, random fixture
//! generators, the transaction executor with event and revert assertions,
//! read-back checkers, time travel, and mock-contract binding.
//!
//! ## Structure
//!
//! - `context` - Shared context and contract deployment
//! - `random` - Bounded generators with a 50% edge bias
//! - `executor` - Transaction execution and assertions
//! - `checks` - Getter and balance verification
//! - `mocks` - Mock-contract binding on the dev chain
//! - `snapshot` - Per-suite chain state isolation
//!
//! Everything runs sequentially; a step's transaction is confirmed before
//! the next step starts.

pub mod checks;
pub mod context;
pub mod errors;
pub mod executor;
pub mod mocks;
pub mod random;
pub mod snapshot;

pub use checks::{Check, Expected};
pub use context::{DeployedContract, TestContext};
pub use errors::HarnessError;
pub use executor::{ArgSource, Execution, ExpectedEvent, Target};
pub use mocks::MockContract;
pub use random::{RandomString, RandomU256};
pub use snapshot::SnapshotGuard;
