//! # Chain Errors

use juice_abi::AbiError;
use juice_types::Address;
use thiserror::Error;

/// Errors raised by chain adapters.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The node executed the transaction and it reverted.
    #[error("reverted: {message}")]
    Reverted {
        /// Revert reason reported by the node.
        message: String,
    },

    /// Transport or protocol failure talking to the node.
    #[error("rpc failure: {0}")]
    Rpc(String),

    /// The node exposes no unlocked accounts.
    #[error("no accounts available on the node")]
    NoAccounts,

    /// Sender is not one of the node's accounts.
    #[error("unknown sender account {0}")]
    UnknownAccount(Address),

    /// Snapshot id was never taken or already consumed.
    #[error("unknown snapshot id {0}")]
    UnknownSnapshot(u64),

    /// Call target is not a deployed contract.
    #[error("invalid call target {0}: no contract at address")]
    InvalidTarget(Address),

    /// A mocked contract received a call with no matching expectation.
    #[error("mock not primed: {contract}.{function}({rendered_args})")]
    MockUnprimed {
        /// Mocked contract name.
        contract: String,
        /// Called function.
        function: String,
        /// Rendered argument list.
        rendered_args: String,
    },

    /// Transaction never got a receipt within the polling budget.
    #[error("transaction {0} not confirmed")]
    NotConfirmed(String),

    /// Signer misuse or malformed key material.
    #[error("signer error: {0}")]
    Signer(String),

    /// ABI lookup or encoding failure while preparing the request.
    #[error(transparent)]
    Abi(#[from] AbiError),
}

impl ChainError {
    /// Whether this is a revert whose message contains `substring`.
    pub fn reverted_with(&self, substring: &str) -> bool {
        matches!(self, Self::Reverted { message } if message.contains(substring))
    }
}
