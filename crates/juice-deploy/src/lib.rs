//! # Deployment Pipeline
//!
//! Deploys the protocol contract graph in dependency order, performs the
//! initial configuration transactions, and persists per-network address
//! records consumed by the secondary terminal-upgrade deployment.
//!
//! ## Modules
//!
//! - `config` - Named networks and environment settings
//! - `records` - Per-network deployment address records
//! - `pipeline` - The primary one-shot deployment
//! - `upgrade` - The secondary TerminalV1_1 deployment
//!
//! The binary exits non-zero on any unhandled error and zero on
//! completion; no step is retried.

pub mod config;
pub mod errors;
pub mod pipeline;
pub mod records;
pub mod upgrade;

pub use config::{EnvSettings, Network};
pub use errors::DeployError;
pub use pipeline::{DeployPipeline, Deployment, GovernanceProjectParams};
pub use records::{read_contract_address, write_deployment};
pub use upgrade::TerminalUpgradeDeploy;
