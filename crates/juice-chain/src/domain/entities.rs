//! # Chain Entities
//!
//! Requests and receipts exchanged with a node. The structured call form
//! travels alongside the encoded calldata so the dev chain can match mock
//! expectations without re-decoding bytes.

use juice_types::{Address, Bytes32, U256};

use juice_abi::Token;

/// Identifier of a chain state snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotId(pub u64);

/// What a transaction carries besides value.
#[derive(Debug, Clone)]
pub enum TxData {
    /// Plain value transfer.
    Transfer,
    /// Contract deployment by artifact name.
    Deploy {
        /// Contract name resolved against the artifact store.
        contract: String,
        /// Constructor arguments.
        args: Vec<Token>,
    },
    /// Function call.
    Call {
        /// Function name.
        function: String,
        /// Structured arguments.
        args: Vec<Token>,
        /// ABI-encoded calldata (selector + arguments).
        calldata: Vec<u8>,
    },
}

/// A transaction to be signed and sent by the node.
#[derive(Debug, Clone)]
pub struct TxRequest {
    /// Sending account.
    pub from: Address,
    /// Target; `None` for deployments.
    pub to: Option<Address>,
    /// Attached value in wei.
    pub value: U256,
    /// Payload.
    pub data: TxData,
}

impl TxRequest {
    /// A plain value transfer.
    pub fn transfer(from: Address, to: Address, value: U256) -> Self {
        Self {
            from,
            to: Some(to),
            value,
            data: TxData::Transfer,
        }
    }
}

/// A read-only call.
#[derive(Debug, Clone)]
pub struct CallRequest {
    /// Caller account (affects access-gated getters).
    pub from: Address,
    /// Target contract.
    pub to: Address,
    /// Function name.
    pub function: String,
    /// Structured arguments.
    pub args: Vec<Token>,
    /// ABI-encoded calldata.
    pub calldata: Vec<u8>,
}

/// A log emitted during transaction execution.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Emitting contract.
    pub address: Address,
    /// Raw topics; `topics[0]` is the event signature hash.
    pub topics: Vec<Bytes32>,
    /// Raw unindexed data.
    pub data: Vec<u8>,
    /// Structured form, when the source can provide it directly.
    pub decoded: Option<DecodedEvent>,
}

/// A log already resolved to its event name and parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
    /// Event name.
    pub name: String,
    /// Parameters in declaration order.
    pub params: Vec<Token>,
}

/// Confirmation of an executed transaction.
///
/// A receipt is only produced for transactions that did not revert; the
/// revert path surfaces as [`ChainError::Reverted`](super::errors::ChainError).
#[derive(Debug, Clone)]
pub struct TxReceipt {
    /// Transaction hash.
    pub tx_hash: Bytes32,
    /// Address of the created contract, for deployments.
    pub contract_address: Option<Address>,
    /// Block the transaction was included in.
    pub block_number: u64,
    /// Timestamp of that block.
    pub block_timestamp: u64,
    /// Logs emitted during execution.
    pub logs: Vec<LogEntry>,
}

/// Outcome of a read-only call.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    /// Decoded return values, when the adapter can produce them.
    pub tokens: Vec<Token>,
    /// Raw return data.
    pub raw: Vec<u8>,
}
