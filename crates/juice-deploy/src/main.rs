//! # Deployment Binary
//!
//! Usage:
//!
//! ```text
//! juice-deploy [network]            # primary deployment (default: localhost)
//! juice-deploy [network] --upgrade  # secondary TerminalV1_1 deployment
//! ```
//!
//! Environment:
//!
//! - `JUICE_PRIVATE_KEY` - deployer key, required off localhost
//! - `JUICE_ETHERSCAN_API_KEY` - explorer key for verification
//! - `JUICE_REPORT_GAS` - `1`/`true` to report gas usage
//! - `JUICE_ARTIFACTS` - artifacts directory (default `./artifacts`)
//! - `JUICE_DEPLOYMENTS` - records directory (default `./deployments`)
//!
//! Exits non-zero on any unhandled error, zero on completion.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use juice_abi::ArtifactStore;
use juice_chain::{ChainClient, LocalSigner, RpcChainClient};
use juice_deploy::{
    write_deployment, DeployPipeline, EnvSettings, Network, TerminalUpgradeDeploy,
};
use juice_harness::TestContext;

struct CliArgs {
    network: Network,
    upgrade: bool,
}

fn parse_args() -> Result<CliArgs> {
    let mut network = Network::default();
    let mut upgrade = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--upgrade" => upgrade = true,
            name => {
                network = name
                    .parse()
                    .with_context(|| format!("unknown network {name}"))?;
            }
        }
    }
    Ok(CliArgs { network, upgrade })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = parse_args()?;
    let settings = EnvSettings::load()?;
    settings.validate_for(args.network)?;

    if let Some(key) = &settings.private_key {
        let signer = LocalSigner::from_hex(key)?;
        info!(deployer = %signer.address(), "configured deployer key");
    }
    if settings.report_gas {
        info!("gas reporting enabled");
    }

    let artifacts_dir =
        std::env::var("JUICE_ARTIFACTS").unwrap_or_else(|_| "./artifacts".to_string());
    let deployments_dir =
        std::env::var("JUICE_DEPLOYMENTS").unwrap_or_else(|_| "./deployments".to_string());

    let artifacts = Arc::new(ArtifactStore::new(&artifacts_dir));
    let client: Arc<dyn ChainClient> = Arc::new(RpcChainClient::new(
        args.network.endpoint(),
        Arc::clone(&artifacts),
        args.network.gas_price(),
        args.network.gas_limit(),
    ));

    info!(
        network = args.network.name(),
        chain_id = args.network.chain_id(),
        endpoint = args.network.endpoint(),
        "connecting"
    );

    let ctx = TestContext::bootstrap(client, artifacts)
        .await
        .context("failed to bootstrap deployment context")?;

    if args.upgrade {
        TerminalUpgradeDeploy::new(&deployments_dir)
            .run(&ctx, args.network.chain_id())
            .await
            .context("terminal upgrade deployment failed")?;
    } else {
        let deployment = DeployPipeline::new(args.network.multisig())
            .run(&ctx)
            .await
            .context("deployment failed")?;
        write_deployment(std::path::Path::new(&deployments_dir), args.network, &deployment)?;
    }

    info!("deployment complete");
    Ok(())
}
