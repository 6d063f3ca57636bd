//! Chain adapters.

pub mod dev_chain;
pub mod rpc;
pub mod signer;
