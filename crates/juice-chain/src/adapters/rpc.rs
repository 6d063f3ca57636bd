//! # JSON-RPC Chain Client
//!
//! Drives a live node (a local dev node by default) over JSON-RPC 2.0.
//! Transactions are sent through `eth_sendTransaction` and rely on the
//! node's unlocked accounts for signing; the receipt is polled until the
//! transaction is mined. Snapshot and time-travel methods map to the
//! `evm_*` namespace a dev node exposes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use juice_abi::ArtifactStore;
use juice_types::{Address, Bytes32, U256};

use crate::domain::entities::{
    CallOutcome, CallRequest, LogEntry, SnapshotId, TxData, TxReceipt, TxRequest,
};
use crate::domain::errors::ChainError;
use crate::ports::ChainClient;

/// How many times a receipt is polled before giving up.
const RECEIPT_POLL_ATTEMPTS: u32 = 50;

/// Delay between receipt polls.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// JSON-RPC client for a live node.
pub struct RpcChainClient {
    http: reqwest::Client,
    endpoint: String,
    artifacts: Arc<ArtifactStore>,
    gas_price: U256,
    gas_limit: u64,
    next_id: AtomicU64,
}

impl RpcChainClient {
    /// Connect to an endpoint with the network's gas settings.
    pub fn new(
        endpoint: impl Into<String>,
        artifacts: Arc<ArtifactStore>,
        gas_price: U256,
        gas_limit: u64,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            artifacts,
            gas_price,
            gas_limit,
            next_id: AtomicU64::new(1),
        }
    }

    /// Issue a single JSON-RPC request.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(target: "juice::chain", method, id, "rpc request");
        let response: Value = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .json()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        if let Some(error) = response.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown rpc error")
                .to_string();
            return Err(classify_node_error(message));
        }
        Ok(response.get("result").cloned().unwrap_or(Value::Null))
    }

    fn tx_payload(&self, tx: &TxRequest) -> Result<Value, ChainError> {
        let data = match &tx.data {
            TxData::Transfer => Vec::new(),
            TxData::Call { calldata, .. } => calldata.clone(),
            TxData::Deploy { contract, args } => {
                let mut code = self.artifacts.load_bytecode(contract)?;
                let abi = self.artifacts.load_abi(contract)?;
                code.extend(abi.encode_constructor(args)?);
                code
            }
        };
        let mut payload = json!({
            "from": tx.from.to_string(),
            "value": hex_u256(tx.value),
            "gas": format!("0x{:x}", self.gas_limit),
            "gasPrice": hex_u256(self.gas_price),
            "data": format!("0x{}", hex::encode(data)),
        });
        if let Some(to) = tx.to {
            payload["to"] = Value::String(to.to_string());
        }
        Ok(payload)
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<Value, ChainError> {
        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            let receipt = self
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            if !receipt.is_null() {
                return Ok(receipt);
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
        Err(ChainError::NotConfirmed(tx_hash.to_string()))
    }

    async fn block_timestamp(&self, block_number: &str) -> Result<u64, ChainError> {
        let block = self
            .request("eth_getBlockByNumber", json!([block_number, false]))
            .await?;
        block
            .get("timestamp")
            .and_then(Value::as_str)
            .map(parse_hex_u64)
            .transpose()?
            .ok_or_else(|| ChainError::Rpc("block without timestamp".to_string()))
    }
}

/// Map a node error message onto revert vs transport failure.
///
/// Dev nodes wrap reasons as
/// `... reverted with reason string 'TV1_1::setFee: BAD_FEE'`.
fn classify_node_error(message: String) -> ChainError {
    if let Some(start) = message.find("reverted with reason string '") {
        let tail = &message[start + "reverted with reason string '".len()..];
        if let Some(end) = tail.find('\'') {
            return ChainError::Reverted {
                message: tail[..end].to_string(),
            };
        }
    }
    if message.contains("revert") {
        return ChainError::Reverted { message };
    }
    ChainError::Rpc(message)
}

fn hex_u256(value: U256) -> String {
    format!("0x{value:x}")
}

fn parse_hex_u64(value: &str) -> Result<u64, ChainError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    u64::from_str_radix(stripped, 16).map_err(|e| ChainError::Rpc(format!("bad hex {value}: {e}")))
}

fn parse_hex_u256(value: &str) -> Result<U256, ChainError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    U256::from_str_radix(stripped, 16).map_err(|e| ChainError::Rpc(format!("bad hex {value}: {e}")))
}

fn parse_address(value: &str) -> Result<Address, ChainError> {
    value
        .parse()
        .map_err(|_| ChainError::Rpc(format!("bad address {value}")))
}

fn parse_bytes32(value: &str) -> Result<Bytes32, ChainError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(stripped).map_err(|e| ChainError::Rpc(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(ChainError::Rpc(format!("bad word {value}")));
    }
    let mut word = [0u8; 32];
    word.copy_from_slice(&bytes);
    Ok(Bytes32(word))
}

fn parse_logs(receipt: &Value) -> Result<Vec<LogEntry>, ChainError> {
    let Some(raw_logs) = receipt.get("logs").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    let mut logs = Vec::with_capacity(raw_logs.len());
    for raw in raw_logs {
        let address = raw
            .get("address")
            .and_then(Value::as_str)
            .map(parse_address)
            .transpose()?
            .unwrap_or_default();
        let topics = raw
            .get("topics")
            .and_then(Value::as_array)
            .map(|topics| {
                topics
                    .iter()
                    .filter_map(Value::as_str)
                    .map(parse_bytes32)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();
        let data = raw
            .get("data")
            .and_then(Value::as_str)
            .map(|d| hex::decode(d.strip_prefix("0x").unwrap_or(d)))
            .transpose()
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .unwrap_or_default();
        logs.push(LogEntry {
            address,
            topics,
            data,
            decoded: None,
        });
    }
    Ok(logs)
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        let result = self.request("eth_accounts", json!([])).await?;
        let accounts: Vec<Address> = result
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(parse_address)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .unwrap_or_default();
        if accounts.is_empty() {
            return Err(ChainError::NoAccounts);
        }
        Ok(accounts)
    }

    async fn balance_of(&self, address: Address) -> Result<U256, ChainError> {
        let result = self
            .request("eth_getBalance", json!([address.to_string(), "latest"]))
            .await?;
        result
            .as_str()
            .map(parse_hex_u256)
            .transpose()?
            .ok_or_else(|| ChainError::Rpc("non-string balance".to_string()))
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<TxReceipt, ChainError> {
        let payload = self.tx_payload(&tx)?;
        let result = self.request("eth_sendTransaction", json!([payload])).await?;
        let tx_hash = result
            .as_str()
            .ok_or_else(|| ChainError::Rpc("non-string transaction hash".to_string()))?
            .to_string();

        let receipt = self.wait_for_receipt(&tx_hash).await?;

        if receipt.get("status").and_then(Value::as_str) == Some("0x0") {
            return Err(ChainError::Reverted {
                message: "transaction reverted without reason".to_string(),
            });
        }

        let block_number_hex = receipt
            .get("blockNumber")
            .and_then(Value::as_str)
            .unwrap_or("0x0")
            .to_string();
        let block_timestamp = self.block_timestamp(&block_number_hex).await?;

        Ok(TxReceipt {
            tx_hash: parse_bytes32(&tx_hash)?,
            contract_address: receipt
                .get("contractAddress")
                .and_then(Value::as_str)
                .map(parse_address)
                .transpose()?,
            block_number: parse_hex_u64(&block_number_hex)?,
            block_timestamp,
            logs: parse_logs(&receipt)?,
        })
    }

    async fn call(&self, request: CallRequest) -> Result<CallOutcome, ChainError> {
        let payload = json!({
            "from": request.from.to_string(),
            "to": request.to.to_string(),
            "data": format!("0x{}", hex::encode(&request.calldata)),
        });
        let result = self.request("eth_call", json!([payload, "latest"])).await?;
        let raw = result
            .as_str()
            .map(|d| hex::decode(d.strip_prefix("0x").unwrap_or(d)))
            .transpose()
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .unwrap_or_default();
        // callers decode against the target ABI
        Ok(CallOutcome {
            tokens: Vec::new(),
            raw,
        })
    }

    async fn snapshot(&self) -> Result<SnapshotId, ChainError> {
        let result = self.request("evm_snapshot", json!([])).await?;
        let id = result
            .as_str()
            .map(parse_hex_u64)
            .transpose()?
            .ok_or_else(|| ChainError::Rpc("non-string snapshot id".to_string()))?;
        Ok(SnapshotId(id))
    }

    async fn revert_to(&self, id: SnapshotId) -> Result<(), ChainError> {
        let result = self
            .request("evm_revert", json!([format!("0x{:x}", id.0)]))
            .await?;
        if result.as_bool() != Some(true) {
            warn!(target: "juice::chain", id = id.0, "snapshot revert rejected by node");
            return Err(ChainError::UnknownSnapshot(id.0));
        }
        Ok(())
    }

    async fn latest_timestamp(&self) -> Result<u64, ChainError> {
        self.block_timestamp("latest").await
    }

    async fn increase_time(&self, seconds: u64) -> Result<(), ChainError> {
        self.request("evm_increaseTime", json!([seconds])).await?;
        Ok(())
    }

    async fn mine(&self) -> Result<(), ChainError> {
        self.request("evm_mine", json!([])).await?;
        Ok(())
    }
}
