//! # Primary Deployment Pipeline
//!
//! Deploys the protocol contract graph in dependency order, registers the
//! price feed, hands governance to the multisig, and deploys the
//! governance project itself (ID 1).

use tracing::info;

use juice_abi::{metadata_v1_token, properties_token, Token};
use juice_harness::{DeployedContract, Execution, TestContext};
use juice_types::{
    eth, Address, Bytes32, FundingCycleMetadata, FundingCycleProperties, U256,
};

use crate::errors::DeployError;

/// ETH/USD price feed registered with the prices contract.
const PRICE_FEED: &str = "0x0567F2323251f0Aab15c8dFb1967E4e8A7D42aeE";

/// Currency index the price feed is registered under.
const PRICE_FEED_CURRENCY: u64 = 1;

/// Configuration of the governance project deployed last.
#[derive(Debug, Clone)]
pub struct GovernanceProjectParams {
    /// Project owner; the deployer when unset.
    pub owner: Option<Address>,
    /// Unique project handle.
    pub handle: String,
    /// Metadata URI.
    pub uri: String,
    /// First funding cycle configuration.
    pub properties: FundingCycleProperties,
    /// First funding cycle metadata.
    pub metadata: FundingCycleMetadata,
}

impl Default for GovernanceProjectParams {
    fn default() -> Self {
        Self {
            owner: None,
            handle: "juicebox".to_string(),
            uri: String::new(),
            properties: FundingCycleProperties {
                target: eth(19_967),
                currency: 1,
                duration: U256::from(30u64),
                cycle_limit: U256::zero(),
                discount_rate: U256::from(200u64),
                ballot: Address::zero(),
            },
            metadata: FundingCycleMetadata {
                reserved_rate: 20,
                bonding_curve_rate: 120,
                reconfiguration_bonding_curve_rate: 120,
                ..Default::default()
            },
        }
    }
}

impl GovernanceProjectParams {
    /// An all-zero configuration; duration zero keeps the same cycle
    /// active for the whole suite run.
    pub fn zeroed() -> Self {
        Self {
            owner: None,
            handle: "juicebox".to_string(),
            uri: String::new(),
            properties: FundingCycleProperties::default(),
            metadata: FundingCycleMetadata::default(),
        }
    }
}

/// Addresses of a completed deployment.
#[derive(Debug, Clone)]
pub struct Deployment {
    /// Operator permission store.
    pub operator_store: Address,
    /// Price feed registry.
    pub prices: Address,
    /// Project registry.
    pub projects: Address,
    /// Terminal directory.
    pub terminal_directory: Address,
    /// Governance contract.
    pub governance: Address,
    /// Payout/ticket mod store.
    pub mod_store: Address,
    /// Ticket accounting.
    pub ticket_booth: Address,
    /// Funding cycle store.
    pub funding_cycles: Address,
    /// Payment terminal.
    pub terminal_v1: Address,
}

impl Deployment {
    /// All addresses, keyed by contract name.
    pub fn addresses(&self) -> Vec<(&'static str, Address)> {
        vec![
            ("OperatorStore", self.operator_store),
            ("Prices", self.prices),
            ("Projects", self.projects),
            ("TerminalDirectory", self.terminal_directory),
            ("Governance", self.governance),
            ("ModStore", self.mod_store),
            ("TicketBooth", self.ticket_booth),
            ("FundingCycles", self.funding_cycles),
            ("TerminalV1", self.terminal_v1),
        ]
    }
}

/// The one-shot deployment.
pub struct DeployPipeline {
    multisig: Address,
    params: GovernanceProjectParams,
}

impl DeployPipeline {
    /// Deploy with the default governance project configuration.
    pub fn new(multisig: Address) -> Self {
        Self {
            multisig,
            params: GovernanceProjectParams::default(),
        }
    }

    /// Override the governance project configuration.
    pub fn with_params(mut self, params: GovernanceProjectParams) -> Self {
        self.params = params;
        self
    }

    /// Run every deployment and initialization step in order.
    pub async fn run(&self, ctx: &TestContext) -> Result<Deployment, DeployError> {
        let deployer = ctx.deployer;
        info!(target: "juice::deploy", %deployer, multisig = %self.multisig, "starting deployment");

        let operator_store = ctx.deploy_contract("OperatorStore", vec![]).await?;
        let prices = ctx.deploy_contract("Prices", vec![]).await?;
        let projects = ctx
            .deploy_contract("Projects", vec![operator_store.address.into()])
            .await?;
        let terminal_directory = ctx
            .deploy_contract(
                "TerminalDirectory",
                vec![projects.address.into(), operator_store.address.into()],
            )
            .await?;
        let governance = ctx
            .deploy_contract(
                "Governance",
                vec![Token::from(1u64), terminal_directory.address.into()],
            )
            .await?;

        // Governance owns the price registry before any feed is added.
        self.execute_step(
            ctx,
            Execution::new(deployer, &prices, "transferOwnership")
                .with_args(vec![governance.address.into()]),
        )
        .await?;

        let feed: Address = PRICE_FEED.parse().unwrap_or(Address::zero());
        self.execute_step(
            ctx,
            Execution::new(deployer, &governance, "addPriceFeed").with_args(vec![
                prices.address.into(),
                feed.into(),
                Token::from(PRICE_FEED_CURRENCY),
            ]),
        )
        .await?;

        self.execute_step(
            ctx,
            Execution::new(deployer, &governance, "transferOwnership")
                .with_args(vec![self.multisig.into()]),
        )
        .await?;

        let mod_store = ctx
            .deploy_contract(
                "ModStore",
                vec![
                    projects.address.into(),
                    operator_store.address.into(),
                    terminal_directory.address.into(),
                ],
            )
            .await?;
        let ticket_booth = ctx
            .deploy_contract(
                "TicketBooth",
                vec![
                    projects.address.into(),
                    operator_store.address.into(),
                    terminal_directory.address.into(),
                ],
            )
            .await?;
        let funding_cycles = ctx
            .deploy_contract("FundingCycles", vec![terminal_directory.address.into()])
            .await?;
        let terminal_v1 = ctx
            .deploy_contract(
                "TerminalV1",
                vec![
                    projects.address.into(),
                    funding_cycles.address.into(),
                    ticket_booth.address.into(),
                    operator_store.address.into(),
                    mod_store.address.into(),
                    prices.address.into(),
                    terminal_directory.address.into(),
                    governance.address.into(),
                ],
            )
            .await?;

        self.deploy_governance_project(ctx, &terminal_v1).await?;

        let deployment = Deployment {
            operator_store: operator_store.address,
            prices: prices.address,
            projects: projects.address,
            terminal_directory: terminal_directory.address,
            governance: governance.address,
            mod_store: mod_store.address,
            ticket_booth: ticket_booth.address,
            funding_cycles: funding_cycles.address,
            terminal_v1: terminal_v1.address,
        };
        for (contract, address) in deployment.addresses() {
            info!(target: "juice::deploy", contract, %address, "deployed");
        }
        Ok(deployment)
    }

    /// Deploy the governance project. It receives ID 1.
    async fn deploy_governance_project(
        &self,
        ctx: &TestContext,
        terminal: &DeployedContract,
    ) -> Result<(), DeployError> {
        let owner = self.params.owner.unwrap_or(ctx.deployer);
        let handle = Bytes32::from_string(&self.params.handle)
            .map_err(juice_harness::HarnessError::from)?;
        info!(
            target: "juice::deploy",
            %owner,
            handle = %self.params.handle,
            "deploying governance project"
        );
        self.execute_step(
            ctx,
            Execution::new(ctx.deployer, terminal, "deploy").with_args(vec![
                owner.into(),
                handle.into(),
                self.params.uri.as_str().into(),
                properties_token(&self.params.properties),
                metadata_v1_token(&self.params.metadata),
                Token::Array(vec![]),
                Token::Array(vec![]),
            ]),
        )
        .await
    }

    async fn execute_step(
        &self,
        ctx: &TestContext,
        execution: Execution,
    ) -> Result<(), DeployError> {
        ctx.execute(execution).await?;
        Ok(())
    }
}
