//! # Chain Ports
//!
//! Traits the harness programs against. `ChainClient` is implemented by
//! every adapter; `MockHost` only by the dev chain, since a live node
//! cannot fabricate contract behavior.

use async_trait::async_trait;

use juice_abi::Token;
use juice_types::{Address, U256};

use crate::domain::entities::{CallOutcome, CallRequest, SnapshotId, TxReceipt, TxRequest};
use crate::domain::errors::ChainError;

/// Everything the harness needs from a node.
///
/// All methods complete before returning; implementations must not retry.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Unlocked accounts, deployer first.
    async fn accounts(&self) -> Result<Vec<Address>, ChainError>;

    /// Current balance of an address.
    async fn balance_of(&self, address: Address) -> Result<U256, ChainError>;

    /// Sign, send, and confirm a transaction.
    async fn send_transaction(&self, tx: TxRequest) -> Result<TxReceipt, ChainError>;

    /// Execute a read-only call.
    async fn call(&self, request: CallRequest) -> Result<CallOutcome, ChainError>;

    /// Capture the full chain state.
    async fn snapshot(&self) -> Result<SnapshotId, ChainError>;

    /// Restore a previously captured state. The id is consumed.
    async fn revert_to(&self, id: SnapshotId) -> Result<(), ChainError>;

    /// Timestamp of the latest block.
    async fn latest_timestamp(&self) -> Result<u64, ChainError>;

    /// Advance the chain clock.
    async fn increase_time(&self, seconds: u64) -> Result<(), ChainError>;

    /// Mine an empty block.
    async fn mine(&self) -> Result<(), ChainError>;
}

/// A primed behavior for one mocked function call.
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    /// Return values produced on match.
    pub returns: Vec<Token>,
    /// Revert message produced on match, overriding `returns`.
    pub revert: Option<String>,
    /// Events emitted on match.
    pub events: Vec<(String, Vec<Token>)>,
}

impl MockBehavior {
    /// Behavior that returns the given tokens.
    pub fn returns(tokens: Vec<Token>) -> Self {
        Self {
            returns: tokens,
            ..Default::default()
        }
    }

    /// Behavior that reverts with the given message.
    pub fn reverts(message: impl Into<String>) -> Self {
        Self {
            revert: Some(message.into()),
            ..Default::default()
        }
    }

    /// Attach an emitted event.
    pub fn emitting(mut self, event: impl Into<String>, params: Vec<Token>) -> Self {
        self.events.push((event.into(), params));
        self
    }
}

/// Host-side contract mocking, implemented by the dev chain only.
#[async_trait]
pub trait MockHost: Send + Sync {
    /// Register a mocked contract and return its address.
    async fn deploy_mock(&self, contract: &str) -> Result<Address, ChainError>;

    /// Prime a persistent expectation: matched whenever the function is
    /// called with the given arguments (`None` matches any arguments).
    async fn prime(
        &self,
        contract: Address,
        function: &str,
        args: Option<Vec<Token>>,
        behavior: MockBehavior,
    ) -> Result<(), ChainError>;

    /// Queue a one-shot expectation consumed by the next call to the
    /// function, optionally constrained to a specific caller. One-shots
    /// take precedence over persistent expectations.
    async fn prime_next(
        &self,
        contract: Address,
        function: &str,
        caller: Option<Address>,
        behavior: MockBehavior,
    ) -> Result<(), ChainError>;
}
