//! # Secondary Deployment: TerminalV1_1
//!
//! Deploys the upgraded payment terminal against an existing deployment,
//! reading the prior contract addresses from the per-network records and
//! wiring the network's multisig as governance.

use std::path::PathBuf;

use tracing::info;

use juice_harness::{DeployedContract, TestContext};

use crate::config::Network;
use crate::errors::DeployError;
use crate::records::read_contract_address;

/// Contracts the upgraded terminal is wired to, in constructor order.
const DEPENDENCIES: [&str; 7] = [
    "Projects",
    "FundingCycles",
    "TicketBooth",
    "OperatorStore",
    "ModStore",
    "Prices",
    "TerminalDirectory",
];

/// The secondary deployment.
pub struct TerminalUpgradeDeploy {
    deployments_dir: PathBuf,
}

impl TerminalUpgradeDeploy {
    /// Read prior addresses from the given deployments directory.
    pub fn new(deployments_dir: impl Into<PathBuf>) -> Self {
        Self {
            deployments_dir: deployments_dir.into(),
        }
    }

    /// Deploy TerminalV1_1 on the network selected by chain id.
    ///
    /// # Errors
    ///
    /// Fails on an unsupported chain id or a missing deployment record.
    pub async fn run(
        &self,
        ctx: &TestContext,
        chain_id: u64,
    ) -> Result<DeployedContract, DeployError> {
        let network = Network::from_chain_id(chain_id)?;
        let multisig = network.multisig();
        info!(
            target: "juice::deploy",
            chain_id,
            network = network.name(),
            %multisig,
            "deploying TerminalV1_1"
        );

        let mut args = Vec::with_capacity(DEPENDENCIES.len() + 1);
        for contract in DEPENDENCIES {
            let address = read_contract_address(&self.deployments_dir, network, contract)?;
            args.push(address.into());
        }
        args.push(multisig.into());

        let terminal = ctx.deploy_contract("TerminalV1_1", args).await?;
        info!(
            target: "juice::deploy",
            address = %terminal.address,
            "TerminalV1_1 deployed"
        );
        Ok(terminal)
    }
}
