//! # Chain Client
//!
//! Everything the harness needs from a blockchain node, behind ports.
//!
//! ## Structure
//!
//! - `domain/` - Transaction requests, receipts, logs, errors
//! - `ports/` - The `ChainClient` and `MockHost` traits
//! - `adapters/` - `RpcChainClient` (live JSON-RPC node), `DevChain`
//!   (in-memory double with snapshots and mocked contracts), `LocalSigner`
//!
//! All operations are sequential: every transaction is awaited to its
//! receipt before the next one is issued. There is no retry logic; any
//! unexpected failure propagates to the caller.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::dev_chain::DevChain;
pub use adapters::rpc::RpcChainClient;
pub use adapters::signer::LocalSigner;
pub use domain::entities::*;
pub use domain::errors::ChainError;
pub use ports::{ChainClient, MockBehavior, MockHost};
