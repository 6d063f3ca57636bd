//! # In-Memory Dev Chain
//!
//! A chain double for the test suites: deterministic accounts, keccak-derived
//! contract addresses, balance accounting, a block clock, full-state
//! snapshots, and a mock registry for contract behavior.
//!
//! Real deployments are accepted permissively (the dev chain cannot execute
//! bytecode, and the wiring scripts only need confirmations); *mocked*
//! contracts are strict and fail on any call with no matching expectation.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use sha3::{Digest, Keccak256};
use tracing::debug;

use juice_abi::Token;
use juice_types::{eth, Address, Bytes32, U256};

use crate::domain::entities::{
    CallOutcome, CallRequest, DecodedEvent, LogEntry, SnapshotId, TxData, TxReceipt, TxRequest,
};
use crate::domain::errors::ChainError;
use crate::ports::{ChainClient, MockBehavior, MockHost};

/// Number of pre-funded accounts.
const ACCOUNT_COUNT: usize = 20;

/// Starting balance of each account.
const STARTING_BALANCE_ETH: u64 = 10_000;

/// Genesis block timestamp.
const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// Seconds the clock advances per mined block.
const BLOCK_TIME_SECS: u64 = 1;

/// A deployed contract record.
#[derive(Debug, Clone)]
struct ContractRecord {
    name: String,
    is_mock: bool,
}

/// A one-shot expectation, consumed by the next matching call.
#[derive(Debug, Clone)]
struct OneShot {
    caller: Option<Address>,
    behavior: MockBehavior,
}

/// All expectations primed for one (contract, function) pair.
#[derive(Debug, Clone, Default)]
struct MockSlot {
    queued: VecDeque<OneShot>,
    arg_matched: Vec<(Vec<Token>, MockBehavior)>,
    catch_all: Option<MockBehavior>,
}

/// The complete, snapshottable chain state.
#[derive(Debug, Clone)]
struct ChainState {
    accounts: Vec<Address>,
    balances: HashMap<Address, U256>,
    nonces: HashMap<Address, u64>,
    contracts: HashMap<Address, ContractRecord>,
    mocks: HashMap<(Address, String), MockSlot>,
    height: u64,
    timestamp: u64,
}

impl ChainState {
    fn genesis() -> Self {
        let accounts: Vec<Address> = (0..ACCOUNT_COUNT).map(derive_account).collect();
        let balances = accounts
            .iter()
            .map(|a| (*a, eth(STARTING_BALANCE_ETH)))
            .collect();
        Self {
            accounts,
            balances,
            nonces: HashMap::new(),
            contracts: HashMap::new(),
            mocks: HashMap::new(),
            height: 0,
            timestamp: GENESIS_TIMESTAMP,
        }
    }

    fn balance(&self, address: Address) -> U256 {
        self.balances.get(&address).copied().unwrap_or_default()
    }

    fn credit(&mut self, address: Address, amount: U256) {
        let entry = self.balances.entry(address).or_default();
        *entry = entry.saturating_add(amount);
    }

    fn next_address(&mut self, from: Address) -> Address {
        let nonce = self.nonces.entry(from).or_insert(0);
        let address = derive_contract_address(from, *nonce);
        *nonce += 1;
        address
    }

    fn advance_block(&mut self) {
        self.height += 1;
        self.timestamp += BLOCK_TIME_SECS;
    }
}

fn keccak(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Deterministic dev account addresses.
fn derive_account(index: usize) -> Address {
    let hash = keccak(format!("juice-dev-account-{index}").as_bytes());
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address(address)
}

/// Deterministic contract address from (deployer, nonce).
fn derive_contract_address(from: Address, nonce: u64) -> Address {
    let mut preimage = Vec::with_capacity(28);
    preimage.extend_from_slice(from.as_bytes());
    preimage.extend_from_slice(&nonce.to_be_bytes());
    let hash = keccak(&preimage);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address(address)
}

fn render_args(args: &[Token]) -> String {
    let parts: Vec<String> = args.iter().map(|t| format!("{t:?}")).collect();
    parts.join(", ")
}

/// The in-memory chain double.
pub struct DevChain {
    state: RwLock<ChainState>,
    snapshots: RwLock<HashMap<u64, ChainState>>,
    next_snapshot: AtomicU64,
}

impl DevChain {
    /// A fresh chain with pre-funded accounts.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ChainState::genesis()),
            snapshots: RwLock::new(HashMap::new()),
            next_snapshot: AtomicU64::new(1),
        }
    }

    /// Name of the contract deployed at an address, when one exists.
    pub fn contract_name_at(&self, address: Address) -> Option<String> {
        self.state
            .read()
            .contracts
            .get(&address)
            .map(|c| c.name.clone())
    }

    /// Resolve a mocked call, consuming a queued one-shot when one matches.
    fn resolve_mock(
        state: &mut ChainState,
        caller: Address,
        to: Address,
        contract_name: &str,
        function: &str,
        args: &[Token],
        consume_queue: bool,
    ) -> Result<MockBehavior, ChainError> {
        let slot = state
            .mocks
            .entry((to, function.to_string()))
            .or_default();

        if consume_queue {
            let front_matches = slot
                .queued
                .front()
                .is_some_and(|one_shot| one_shot.caller.is_none_or(|c| c == caller));
            if front_matches {
                // consumed whether it returns or reverts
                return Ok(slot.queued.pop_front().map(|s| s.behavior).unwrap_or_default());
            }
        }

        if let Some((_, behavior)) = slot.arg_matched.iter().find(|(expected, _)| expected == args)
        {
            return Ok(behavior.clone());
        }
        if let Some(behavior) = &slot.catch_all {
            return Ok(behavior.clone());
        }
        Err(ChainError::MockUnprimed {
            contract: contract_name.to_string(),
            function: function.to_string(),
            rendered_args: render_args(args),
        })
    }

    fn behavior_to_logs(to: Address, behavior: &MockBehavior) -> Vec<LogEntry> {
        behavior
            .events
            .iter()
            .map(|(name, params)| LogEntry {
                address: to,
                topics: Vec::new(),
                data: Vec::new(),
                decoded: Some(DecodedEvent {
                    name: name.clone(),
                    params: params.clone(),
                }),
            })
            .collect()
    }
}

impl Default for DevChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainClient for DevChain {
    async fn accounts(&self) -> Result<Vec<Address>, ChainError> {
        let accounts = self.state.read().accounts.clone();
        if accounts.is_empty() {
            return Err(ChainError::NoAccounts);
        }
        Ok(accounts)
    }

    async fn balance_of(&self, address: Address) -> Result<U256, ChainError> {
        Ok(self.state.read().balance(address))
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.write();
        if !state.accounts.contains(&tx.from) {
            return Err(ChainError::UnknownAccount(tx.from));
        }
        if state.balance(tx.from) < tx.value {
            return Err(ChainError::Reverted {
                message: "sender doesn't have enough funds".to_string(),
            });
        }

        state.advance_block();

        let (to, contract_address, logs) = match &tx.data {
            TxData::Transfer => {
                let to = tx.to.ok_or(ChainError::InvalidTarget(Address::zero()))?;
                (to, None, Vec::new())
            }
            TxData::Deploy { contract, .. } => {
                let address = state.next_address(tx.from);
                state.contracts.insert(
                    address,
                    ContractRecord {
                        name: contract.clone(),
                        is_mock: false,
                    },
                );
                debug!(target: "juice::chain", contract = %contract, %address, "deployed");
                (address, Some(address), Vec::new())
            }
            TxData::Call { function, args, .. } => {
                let to = tx.to.ok_or(ChainError::InvalidTarget(Address::zero()))?;
                let record = state
                    .contracts
                    .get(&to)
                    .cloned()
                    .ok_or(ChainError::InvalidTarget(to))?;
                if record.is_mock {
                    let behavior = Self::resolve_mock(
                        &mut state, tx.from, to, &record.name, function, args, true,
                    )?;
                    if let Some(message) = &behavior.revert {
                        return Err(ChainError::Reverted {
                            message: message.clone(),
                        });
                    }
                    let logs = Self::behavior_to_logs(to, &behavior);
                    (to, None, logs)
                } else {
                    // permissive: confirmation only, no execution
                    (to, None, Vec::new())
                }
            }
        };

        // Move the attached value only on success.
        if !tx.value.is_zero() {
            let from_balance = state.balance(tx.from) - tx.value;
            state.balances.insert(tx.from, from_balance);
            state.credit(to, tx.value);
        }

        let nonce = state.nonces.get(&tx.from).copied().unwrap_or(0);
        let mut preimage = Vec::new();
        preimage.extend_from_slice(tx.from.as_bytes());
        preimage.extend_from_slice(&nonce.to_be_bytes());
        preimage.extend_from_slice(&state.height.to_be_bytes());
        let receipt = TxReceipt {
            tx_hash: Bytes32(keccak(&preimage)),
            contract_address,
            block_number: state.height,
            block_timestamp: state.timestamp,
            logs,
        };
        Ok(receipt)
    }

    async fn call(&self, request: CallRequest) -> Result<CallOutcome, ChainError> {
        let mut state = self.state.write();
        let record = state
            .contracts
            .get(&request.to)
            .cloned()
            .ok_or(ChainError::InvalidTarget(request.to))?;
        if !record.is_mock {
            return Err(ChainError::MockUnprimed {
                contract: record.name,
                function: request.function.clone(),
                rendered_args: render_args(&request.args),
            });
        }
        // read-only calls never consume queued one-shots
        let behavior = Self::resolve_mock(
            &mut state,
            request.from,
            request.to,
            &record.name,
            &request.function,
            &request.args,
            false,
        )?;
        if let Some(message) = behavior.revert {
            return Err(ChainError::Reverted { message });
        }
        Ok(CallOutcome {
            tokens: behavior.returns,
            raw: Vec::new(),
        })
    }

    async fn snapshot(&self) -> Result<SnapshotId, ChainError> {
        let id = self.next_snapshot.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().clone();
        self.snapshots.write().insert(id, state);
        debug!(target: "juice::chain", id, "snapshot taken");
        Ok(SnapshotId(id))
    }

    async fn revert_to(&self, id: SnapshotId) -> Result<(), ChainError> {
        let state = self
            .snapshots
            .write()
            .remove(&id.0)
            .ok_or(ChainError::UnknownSnapshot(id.0))?;
        *self.state.write() = state;
        debug!(target: "juice::chain", id = id.0, "snapshot restored");
        Ok(())
    }

    async fn latest_timestamp(&self) -> Result<u64, ChainError> {
        Ok(self.state.read().timestamp)
    }

    async fn increase_time(&self, seconds: u64) -> Result<(), ChainError> {
        self.state.write().timestamp += seconds;
        Ok(())
    }

    async fn mine(&self) -> Result<(), ChainError> {
        self.state.write().advance_block();
        Ok(())
    }
}

#[async_trait]
impl MockHost for DevChain {
    async fn deploy_mock(&self, contract: &str) -> Result<Address, ChainError> {
        let mut state = self.state.write();
        let deployer = *state.accounts.first().ok_or(ChainError::NoAccounts)?;
        let address = state.next_address(deployer);
        state.contracts.insert(
            address,
            ContractRecord {
                name: contract.to_string(),
                is_mock: true,
            },
        );
        state.advance_block();
        debug!(target: "juice::chain", contract, %address, "mock deployed");
        Ok(address)
    }

    async fn prime(
        &self,
        contract: Address,
        function: &str,
        args: Option<Vec<Token>>,
        behavior: MockBehavior,
    ) -> Result<(), ChainError> {
        let mut state = self.state.write();
        if !state.contracts.get(&contract).is_some_and(|c| c.is_mock) {
            return Err(ChainError::InvalidTarget(contract));
        }
        let slot = state
            .mocks
            .entry((contract, function.to_string()))
            .or_default();
        match args {
            Some(args) => {
                // later primings for the same args replace earlier ones
                slot.arg_matched.retain(|(expected, _)| expected != &args);
                slot.arg_matched.push((args, behavior));
            }
            None => slot.catch_all = Some(behavior),
        }
        Ok(())
    }

    async fn prime_next(
        &self,
        contract: Address,
        function: &str,
        caller: Option<Address>,
        behavior: MockBehavior,
    ) -> Result<(), ChainError> {
        let mut state = self.state.write();
        if !state.contracts.get(&contract).is_some_and(|c| c.is_mock) {
            return Err(ChainError::InvalidTarget(contract));
        }
        state
            .mocks
            .entry((contract, function.to_string()))
            .or_default()
            .queued
            .push_back(OneShot { caller, behavior });
        Ok(())
    }
}
