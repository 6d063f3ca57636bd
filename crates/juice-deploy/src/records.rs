//! # Deployment Records
//!
//! Per-network address records under a deployments directory:
//! `deployments/<network>/<Contract>.json`, each holding the deployed
//! address. The secondary deployment consumes these.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use juice_types::Address;

use crate::config::Network;
use crate::errors::DeployError;
use crate::pipeline::Deployment;

/// One persisted contract address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Deployed address.
    pub address: Address,
}

fn record_path(dir: &Path, network: Network, contract: &str) -> PathBuf {
    dir.join(network.name()).join(format!("{contract}.json"))
}

/// Read a contract's recorded address for a network.
///
/// # Errors
///
/// Returns `MissingRecord` when the file does not exist and
/// `MalformedRecord` when it cannot be parsed.
pub fn read_contract_address(
    dir: &Path,
    network: Network,
    contract: &str,
) -> Result<Address, DeployError> {
    let path = record_path(dir, network, contract);
    let raw = fs::read_to_string(&path).map_err(|_| DeployError::MissingRecord {
        contract: contract.to_string(),
        network: network.name().to_string(),
        path: path.clone(),
    })?;
    let record: DeploymentRecord =
        serde_json::from_str(&raw).map_err(|e| DeployError::MalformedRecord {
            path: path.clone(),
            reason: e.to_string(),
        })?;
    Ok(record.address)
}

/// Persist every address of a completed deployment.
pub fn write_deployment(
    dir: &Path,
    network: Network,
    deployment: &Deployment,
) -> Result<(), DeployError> {
    for (contract, address) in deployment.addresses() {
        let path = record_path(dir, network, contract);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| DeployError::RecordIo {
                path: path.clone(),
                source,
            })?;
        }
        let record = DeploymentRecord { address };
        let raw = serde_json::to_string_pretty(&record).map_err(|e| {
            DeployError::MalformedRecord {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;
        fs::write(&path, raw).map_err(|source| DeployError::RecordIo {
            path: path.clone(),
            source,
        })?;
        info!(target: "juice::deploy", contract, %address, ?path, "record written");
    }
    Ok(())
}
