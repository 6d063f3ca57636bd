//! # Shared Test Context
//!
//! One context is bootstrapped per suite and threaded through every step.
//! It binds the deployer, the other signer accounts, the artifact store,
//! a seedable random source, and the time mark used by fast-forwarding.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use juice_abi::{Abi, ArtifactStore, Token};
use juice_chain::{ChainClient, DevChain, MockHost, TxData, TxRequest};
use juice_types::{Address, U256};

use crate::errors::HarnessError;

/// A contract bound to its address and parsed ABI.
#[derive(Clone)]
pub struct DeployedContract {
    /// Contract name as used for artifact lookup.
    pub name: String,
    /// Deployed address.
    pub address: Address,
    /// Parsed ABI.
    pub abi: Arc<Abi>,
}

impl std::fmt::Debug for DeployedContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.address)
    }
}

/// Shared state for a suite run.
pub struct TestContext {
    client: Arc<dyn ChainClient>,
    mock_host: Option<Arc<dyn MockHost>>,
    artifacts: Arc<ArtifactStore>,
    /// First node account; signs deployments by default.
    pub deployer: Address,
    /// The remaining node accounts.
    pub addrs: Vec<Address>,
    pub(crate) rng: Mutex<StdRng>,
    pub(crate) time_mark: Mutex<u64>,
}

impl TestContext {
    /// Bootstrap against any chain client.
    pub async fn bootstrap(
        client: Arc<dyn ChainClient>,
        artifacts: Arc<ArtifactStore>,
    ) -> Result<Self, HarnessError> {
        Self::bootstrap_inner(client, None, artifacts).await
    }

    /// Bootstrap against a fresh in-memory dev chain, with mocking enabled.
    pub async fn on_dev_chain(artifacts: Arc<ArtifactStore>) -> Result<Self, HarnessError> {
        let chain = Arc::new(DevChain::new());
        Self::bootstrap_inner(chain.clone(), Some(chain), artifacts).await
    }

    async fn bootstrap_inner(
        client: Arc<dyn ChainClient>,
        mock_host: Option<Arc<dyn MockHost>>,
        artifacts: Arc<ArtifactStore>,
    ) -> Result<Self, HarnessError> {
        let accounts = client.accounts().await?;
        let (deployer, addrs) = accounts
            .split_first()
            .map(|(first, rest)| (*first, rest.to_vec()))
            .ok_or(juice_chain::ChainError::NoAccounts)?;
        let start = client.latest_timestamp().await?;
        info!(
            target: "juice::harness",
            %deployer,
            accounts = addrs.len() + 1,
            "context bootstrapped"
        );
        Ok(Self {
            client,
            mock_host,
            artifacts,
            deployer,
            addrs,
            rng: Mutex::new(StdRng::from_entropy()),
            time_mark: Mutex::new(start),
        })
    }

    /// Reseed the random source for reproducible fixtures.
    pub fn with_seed(self, seed: u64) -> Self {
        *self.rng.lock() = StdRng::seed_from_u64(seed);
        self
    }

    /// The underlying chain client.
    pub fn client(&self) -> &Arc<dyn ChainClient> {
        &self.client
    }

    /// The mock host, when the context runs on the dev chain.
    pub(crate) fn mock_host(&self) -> Result<&Arc<dyn MockHost>, HarnessError> {
        self.mock_host
            .as_ref()
            .ok_or(HarnessError::MockingUnavailable)
    }

    /// The artifact store.
    pub fn artifacts(&self) -> &Arc<ArtifactStore> {
        &self.artifacts
    }

    /// Deploy a contract by artifact name with constructor arguments.
    pub async fn deploy_contract(
        &self,
        name: &str,
        args: Vec<Token>,
    ) -> Result<DeployedContract, HarnessError> {
        let abi = self.artifacts.load_abi(name)?;
        let receipt = self
            .client
            .send_transaction(TxRequest {
                from: self.deployer,
                to: None,
                value: U256::zero(),
                data: TxData::Deploy {
                    contract: name.to_string(),
                    args,
                },
            })
            .await?;
        let address = receipt
            .contract_address
            .ok_or_else(|| juice_chain::ChainError::Rpc("deployment without address".into()))?;
        info!(target: "juice::harness", contract = name, %address, "deployed");
        Ok(DeployedContract {
            name: name.to_string(),
            address,
            abi,
        })
    }

    /// Current balance of an address.
    pub async fn get_balance(&self, address: Address) -> Result<U256, HarnessError> {
        Ok(self.client.balance_of(address).await?)
    }

    /// Timestamp of the latest block.
    pub async fn timestamp(&self) -> Result<u64, HarnessError> {
        Ok(self.client.latest_timestamp().await?)
    }

    /// Record the time mark fast-forwards are measured against.
    pub fn set_time_mark(&self, block_timestamp: u64) {
        *self.time_mark.lock() = block_timestamp;
    }

    /// Advance the chain clock so that `seconds` have passed since the
    /// last time mark, discounting time that already elapsed, then mine.
    pub async fn fast_forward(&self, seconds: u64) -> Result<(), HarnessError> {
        let now = self.client.latest_timestamp().await?;
        let elapsed = now.saturating_sub(*self.time_mark.lock());
        let amount = seconds.saturating_sub(elapsed);
        debug!(target: "juice::harness", seconds, elapsed, amount, "fast forward");
        self.client.increase_time(amount).await?;
        self.client.mine().await?;
        *self.time_mark.lock() = now + amount;
        Ok(())
    }
}
