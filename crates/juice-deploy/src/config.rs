//! # Network and Environment Configuration
//!
//! Named networks with their endpoints, chain ids, and gas settings, plus
//! strictly parsed environment settings. A private key is mandatory off
//! the local network; locally the node's unlocked accounts sign.

use std::str::FromStr;

use primitive_types::U256;

use juice_types::Address;

use crate::errors::DeployError;

/// Environment variable holding the deployer private key.
pub const ENV_PRIVATE_KEY: &str = "JUICE_PRIVATE_KEY";

/// Environment variable holding the block-explorer API key.
pub const ENV_ETHERSCAN_API_KEY: &str = "JUICE_ETHERSCAN_API_KEY";

/// Environment variable enabling gas reporting.
pub const ENV_REPORT_GAS: &str = "JUICE_REPORT_GAS";

/// A supported deployment network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// Local dev node; the default.
    Localhost,
    /// Production network.
    Mainnet,
    /// Public test network.
    Testnet,
}

impl Network {
    /// Resolve a network from its chain id.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::UnsupportedChainId` for anything else.
    pub fn from_chain_id(chain_id: u64) -> Result<Self, DeployError> {
        match chain_id {
            1 => Ok(Self::Mainnet),
            5 => Ok(Self::Testnet),
            31_337 => Ok(Self::Localhost),
            other => Err(DeployError::UnsupportedChainId(other)),
        }
    }

    /// The network's chain id.
    pub fn chain_id(self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Testnet => 5,
            Self::Localhost => 31_337,
        }
    }

    /// Canonical name, used for deployment record directories.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Localhost => "localhost",
        }
    }

    /// JSON-RPC endpoint.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Mainnet => "https://mainnet.rpc.juice.internal/v1",
            Self::Testnet => "https://testnet.rpc.juice.internal/v1",
            Self::Localhost => "http://localhost:8545",
        }
    }

    /// Gas price in wei.
    pub fn gas_price(self) -> U256 {
        match self {
            // 50 gwei on public networks
            Self::Mainnet | Self::Testnet => U256::from(50_000_000_000u64),
            Self::Localhost => U256::from(8_000_000_000u64),
        }
    }

    /// Gas limit per transaction.
    pub fn gas_limit(self) -> u64 {
        2_100_000
    }

    /// The multisig that receives governance ownership on this network.
    pub fn multisig(self) -> Address {
        let literal = match self {
            Self::Mainnet => "0xAF28bcB48C40dBC86f52D459A6562F658fc94B1e",
            Self::Testnet => "0x98c40E18372F2b01317727e19f7BaC27C9e3De5E",
            Self::Localhost => "0x69C6026e3938adE9e1ddE8Ff6A37eC96595bF1e1",
        };
        // literals above are well-formed
        literal.parse().unwrap_or(Address::zero())
    }

    /// Whether a configured private key is required.
    pub fn requires_private_key(self) -> bool {
        !matches!(self, Self::Localhost)
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::Localhost
    }
}

impl FromStr for Network {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "localhost" => Ok(Self::Localhost),
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(DeployError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Settings read from the environment, parsed strictly: present-but-empty
/// values are rejected rather than silently ignored.
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    /// Deployer private key, hex encoded.
    pub private_key: Option<String>,
    /// Block-explorer API key for contract verification.
    pub etherscan_api_key: Option<String>,
    /// Whether gas usage is reported per transaction.
    pub report_gas: bool,
}

impl EnvSettings {
    /// Load from process environment.
    pub fn load() -> Result<Self, DeployError> {
        Ok(Self {
            private_key: read_nonempty(ENV_PRIVATE_KEY)?,
            etherscan_api_key: read_nonempty(ENV_ETHERSCAN_API_KEY)?,
            report_gas: read_nonempty(ENV_REPORT_GAS)?
                .map(|value| parse_bool(ENV_REPORT_GAS, &value))
                .transpose()?
                .unwrap_or(false),
        })
    }

    /// Enforce per-network requirements.
    pub fn validate_for(&self, network: Network) -> Result<(), DeployError> {
        if network.requires_private_key() && self.private_key.is_none() {
            return Err(DeployError::MissingEnv(ENV_PRIVATE_KEY));
        }
        Ok(())
    }
}

fn read_nonempty(name: &'static str) -> Result<Option<String>, DeployError> {
    match std::env::var(name) {
        Ok(value) if value.is_empty() => Err(DeployError::InvalidEnv {
            name,
            value,
        }),
        Ok(value) => Ok(Some(value)),
        Err(_) => Ok(None),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, DeployError> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(DeployError::InvalidEnv {
            name,
            value: other.to_string(),
        }),
    }
}
