//! # Test Fixtures
//!
//! Builds an artifacts directory covering the contract surface the suites
//! drive, and bootstraps the mocked terminal set: every protocol
//! dependency deployed as a mock plus the terminal under test.

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use juice_abi::{ArtifactStore, Token};
use juice_harness::{MockContract, TestContext};
use juice_types::{Address, U256};

// =============================================================================
// ARTIFACT JSON BUILDERS
// =============================================================================

fn p(name: &str, ty: &str) -> Value {
    json!({ "name": name, "type": ty })
}

fn indexed(name: &str, ty: &str) -> Value {
    json!({ "name": name, "type": ty, "indexed": true })
}

fn tuple(name: &str, components: Vec<Value>) -> Value {
    json!({ "name": name, "type": "tuple", "components": components })
}

fn tuple_array(name: &str, components: Vec<Value>) -> Value {
    json!({ "name": name, "type": "tuple[]", "components": components })
}

fn func(name: &str, inputs: Vec<Value>, outputs: Vec<Value>) -> Value {
    json!({ "type": "function", "name": name, "inputs": inputs, "outputs": outputs })
}

fn event(name: &str, inputs: Vec<Value>) -> Value {
    json!({ "type": "event", "name": name, "inputs": inputs })
}

fn ctor(inputs: Vec<Value>) -> Value {
    json!({ "type": "constructor", "inputs": inputs })
}

fn properties_components() -> Vec<Value> {
    vec![
        p("target", "uint256"),
        p("currency", "uint256"),
        p("duration", "uint256"),
        p("cycleLimit", "uint256"),
        p("discountRate", "uint256"),
        p("ballot", "address"),
    ]
}

fn metadata_v1_components() -> Vec<Value> {
    vec![
        p("reservedRate", "uint256"),
        p("bondingCurveRate", "uint256"),
        p("reconfigurationBondingCurveRate", "uint256"),
    ]
}

fn metadata_components() -> Vec<Value> {
    vec![
        p("reservedRate", "uint256"),
        p("bondingCurveRate", "uint256"),
        p("reconfigurationBondingCurveRate", "uint256"),
        p("payIsPaused", "bool"),
        p("ticketPrintingIsAllowed", "bool"),
        p("treasuryExtension", "address"),
    ]
}

fn payout_mod_components() -> Vec<Value> {
    vec![
        p("preferUnstaked", "bool"),
        p("percent", "uint16"),
        p("lockedUntil", "uint48"),
        p("beneficiary", "address"),
        p("allocator", "address"),
        p("projectId", "uint256"),
    ]
}

fn ticket_mod_components() -> Vec<Value> {
    vec![
        p("preferUnstaked", "bool"),
        p("percent", "uint16"),
        p("lockedUntil", "uint48"),
        p("beneficiary", "address"),
    ]
}

fn funding_cycle_components() -> Vec<Value> {
    vec![
        p("configured", "uint256"),
        p("cycleLimit", "uint256"),
        p("id", "uint256"),
        p("projectId", "uint256"),
        p("number", "uint256"),
        p("basedOn", "uint256"),
        p("weight", "uint256"),
        p("ballot", "address"),
        p("start", "uint256"),
        p("duration", "uint256"),
        p("target", "uint256"),
        p("currency", "uint256"),
        p("fee", "uint256"),
        p("discountRate", "uint256"),
        p("tapped", "uint256"),
        p("metadata", "uint256"),
    ]
}

fn terminal_ctor() -> Value {
    ctor(vec![
        p("_projects", "address"),
        p("_fundingCycles", "address"),
        p("_ticketBooth", "address"),
        p("_operatorStore", "address"),
        p("_modStore", "address"),
        p("_prices", "address"),
        p("_terminalDirectory", "address"),
        p("_governance", "address"),
    ])
}

fn artifact(name: &str, entries: Vec<Value>) -> Value {
    json!({
        "contractName": name,
        "abi": entries,
        "bytecode": "0x60806040",
    })
}

fn all_artifacts() -> Vec<Value> {
    vec![
        artifact("OperatorStore", vec![func(
            "hasPermission",
            vec![
                p("_operator", "address"),
                p("_account", "address"),
                p("_projectId", "uint256"),
                p("_permissionIndex", "uint256"),
            ],
            vec![p("", "bool")],
        )]),
        artifact(
            "Prices",
            vec![func("transferOwnership", vec![p("newOwner", "address")], vec![])],
        ),
        artifact(
            "Projects",
            vec![
                ctor(vec![p("_operatorStore", "address")]),
                func(
                    "create",
                    vec![
                        p("_owner", "address"),
                        p("_handle", "bytes32"),
                        p("_uri", "string"),
                        p("_terminal", "address"),
                    ],
                    vec![p("", "uint256")],
                ),
                func("ownerOf", vec![p("_projectId", "uint256")], vec![p("", "address")]),
                event(
                    "Create",
                    vec![
                        indexed("projectId", "uint256"),
                        indexed("owner", "address"),
                        indexed("handle", "bytes32"),
                        p("uri", "string"),
                        p("caller", "address"),
                    ],
                ),
            ],
        ),
        artifact(
            "TerminalDirectory",
            vec![
                ctor(vec![p("_projects", "address"), p("_operatorStore", "address")]),
                func("terminalOf", vec![p("_projectId", "uint256")], vec![p("", "address")]),
            ],
        ),
        artifact(
            "Governance",
            vec![
                ctor(vec![p("_projectId", "uint256"), p("_terminalDirectory", "address")]),
                func(
                    "addPriceFeed",
                    vec![
                        p("_prices", "address"),
                        p("_feed", "address"),
                        p("_currency", "uint256"),
                    ],
                    vec![],
                ),
                func("transferOwnership", vec![p("newOwner", "address")], vec![]),
                func(
                    "setFee",
                    vec![p("_terminal", "address"), p("_fee", "uint256")],
                    vec![],
                ),
            ],
        ),
        artifact(
            "ModStore",
            vec![
                ctor(vec![
                    p("_projects", "address"),
                    p("_operatorStore", "address"),
                    p("_terminalDirectory", "address"),
                ]),
                func(
                    "payoutModsOf",
                    vec![p("_projectId", "uint256"), p("_configuration", "uint256")],
                    vec![tuple_array("", payout_mod_components())],
                ),
                func(
                    "setPayoutMods",
                    vec![
                        p("_projectId", "uint256"),
                        p("_configuration", "uint256"),
                        tuple_array("_mods", payout_mod_components()),
                    ],
                    vec![],
                ),
            ],
        ),
        artifact(
            "TicketBooth",
            vec![
                ctor(vec![
                    p("_projects", "address"),
                    p("_operatorStore", "address"),
                    p("_terminalDirectory", "address"),
                ]),
                func("totalSupplyOf", vec![p("_projectId", "uint256")], vec![p("", "uint256")]),
                func(
                    "balanceOf",
                    vec![p("_holder", "address"), p("_projectId", "uint256")],
                    vec![p("", "uint256")],
                ),
                func(
                    "stakedBalanceOf",
                    vec![p("_holder", "address"), p("_projectId", "uint256")],
                    vec![p("", "uint256")],
                ),
                func(
                    "print",
                    vec![
                        p("_holder", "address"),
                        p("_projectId", "uint256"),
                        p("_amount", "uint256"),
                        p("_preferUnstakedTickets", "bool"),
                    ],
                    vec![],
                ),
                func(
                    "issue",
                    vec![p("_projectId", "uint256"), p("_name", "string"), p("_symbol", "string")],
                    vec![],
                ),
                func(
                    "transfer",
                    vec![
                        p("_holder", "address"),
                        p("_projectId", "uint256"),
                        p("_amount", "uint256"),
                        p("_recipient", "address"),
                    ],
                    vec![],
                ),
                event(
                    "Issue",
                    vec![
                        indexed("projectId", "uint256"),
                        p("name", "string"),
                        p("symbol", "string"),
                        p("caller", "address"),
                    ],
                ),
            ],
        ),
        artifact(
            "FundingCycles",
            vec![
                ctor(vec![p("_terminalDirectory", "address")]),
                func(
                    "currentOf",
                    vec![p("_projectId", "uint256")],
                    vec![tuple("", funding_cycle_components())],
                ),
                func(
                    "queuedOf",
                    vec![p("_projectId", "uint256")],
                    vec![tuple("", funding_cycle_components())],
                ),
                func("BASE_WEIGHT", vec![], vec![p("", "uint256")]),
                func("MAX_CYCLE_LIMIT", vec![], vec![p("", "uint256")]),
            ],
        ),
        artifact(
            "TerminalV1",
            vec![
                terminal_ctor(),
                func(
                    "deploy",
                    vec![
                        p("_owner", "address"),
                        p("_handle", "bytes32"),
                        p("_uri", "string"),
                        tuple("_properties", properties_components()),
                        tuple("_metadata", metadata_v1_components()),
                        tuple_array("_payoutMods", payout_mod_components()),
                        tuple_array("_ticketMods", ticket_mod_components()),
                    ],
                    vec![],
                ),
                func(
                    "migrate",
                    vec![p("_projectId", "uint256"), p("_to", "address")],
                    vec![],
                ),
                func("allowMigration", vec![p("_contract", "address")], vec![]),
            ],
        ),
        artifact(
            "TerminalV1_1",
            vec![
                terminal_ctor(),
                func("setFee", vec![p("_fee", "uint256")], vec![]),
                func("fee", vec![], vec![p("", "uint256")]),
                func("allowMigration", vec![p("_contract", "address")], vec![]),
                func(
                    "migrationIsAllowed",
                    vec![p("_contract", "address")],
                    vec![p("", "bool")],
                ),
                func("addToBalance", vec![p("_projectId", "uint256")], vec![]),
                func("balanceOf", vec![p("_projectId", "uint256")], vec![p("", "uint256")]),
                func(
                    "migrate",
                    vec![p("_projectId", "uint256"), p("_to", "address")],
                    vec![],
                ),
                func(
                    "deploy",
                    vec![
                        p("_owner", "address"),
                        p("_handle", "bytes32"),
                        p("_uri", "string"),
                        tuple("_properties", properties_components()),
                        tuple("_metadata", metadata_components()),
                        tuple_array("_payoutMods", payout_mod_components()),
                        tuple_array("_ticketMods", ticket_mod_components()),
                    ],
                    vec![],
                ),
                func(
                    "configure",
                    vec![
                        p("_projectId", "uint256"),
                        tuple("_properties", properties_components()),
                        tuple("_metadata", metadata_components()),
                        tuple_array("_payoutMods", payout_mod_components()),
                        tuple_array("_ticketMods", ticket_mod_components()),
                    ],
                    vec![p("", "uint256")],
                ),
                func(
                    "pay",
                    vec![
                        p("_projectId", "uint256"),
                        p("_beneficiary", "address"),
                        p("_memo", "string"),
                        p("_preferUnstakedTickets", "bool"),
                    ],
                    vec![p("", "uint256")],
                ),
                func(
                    "printTickets",
                    vec![
                        p("_projectId", "uint256"),
                        p("_amount", "uint256"),
                        p("_beneficiary", "address"),
                        p("_memo", "string"),
                        p("_preferUnstakedTickets", "bool"),
                    ],
                    vec![],
                ),
                func(
                    "redeem",
                    vec![
                        p("_account", "address"),
                        p("_projectId", "uint256"),
                        p("_count", "uint256"),
                        p("_minReturnedWei", "uint256"),
                        p("_beneficiary", "address"),
                        p("_preferUnstaked", "bool"),
                    ],
                    vec![p("", "uint256")],
                ),
                func(
                    "tap",
                    vec![
                        p("_projectId", "uint256"),
                        p("_amount", "uint256"),
                        p("_currency", "uint256"),
                        p("_minReturnedWei", "uint256"),
                    ],
                    vec![p("", "uint256")],
                ),
                func(
                    "currentOverflowOf",
                    vec![p("_projectId", "uint256")],
                    vec![p("", "uint256")],
                ),
                func("burnFromDeadAddress", vec![p("_projectId", "uint256")], vec![]),
                func("transferOwnership", vec![p("newOwner", "address")], vec![]),
                event("SetFee", vec![p("fee", "uint256")]),
                event("AllowMigration", vec![p("terminal", "address")]),
                event(
                    "AddToBalance",
                    vec![
                        indexed("projectId", "uint256"),
                        p("value", "uint256"),
                        p("caller", "address"),
                    ],
                ),
                event(
                    "PrintTickets",
                    vec![
                        indexed("projectId", "uint256"),
                        indexed("beneficiary", "address"),
                        p("amount", "uint256"),
                        p("memo", "string"),
                        p("caller", "address"),
                    ],
                ),
                event(
                    "Pay",
                    vec![
                        indexed("fundingCycleId", "uint256"),
                        indexed("projectId", "uint256"),
                        indexed("beneficiary", "address"),
                        p("amount", "uint256"),
                        p("memo", "string"),
                        p("caller", "address"),
                    ],
                ),
                event(
                    "Migrate",
                    vec![
                        indexed("projectId", "uint256"),
                        indexed("to", "address"),
                        p("amount", "uint256"),
                        p("caller", "address"),
                    ],
                ),
            ],
        ),
    ]
}

/// An artifacts directory alive for the duration of a test.
pub struct ArtifactFixture {
    dir: TempDir,
    /// The store rooted at the fixture directory.
    pub store: Arc<ArtifactStore>,
}

/// Write every known artifact into a fresh directory.
pub fn artifact_fixture() -> ArtifactFixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let contracts_root = dir.path().join("contracts");
    for value in all_artifacts() {
        let name = value
            .get("contractName")
            .and_then(Value::as_str)
            .expect("artifact name")
            .to_string();
        let sol_dir = contracts_root.join(format!("{name}.sol"));
        std::fs::create_dir_all(&sol_dir).expect("artifact dir");
        std::fs::write(
            sol_dir.join(format!("{name}.json")),
            serde_json::to_string_pretty(&value).expect("artifact json"),
        )
        .expect("artifact write");
    }
    let store = Arc::new(ArtifactStore::new(dir.path()));
    ArtifactFixture { dir, store }
}

// =============================================================================
// MOCKED TERMINAL SET
// =============================================================================

/// Every protocol dependency mocked, plus the terminal under test.
pub struct TerminalFixture {
    /// Bootstrapped context on a fresh dev chain.
    pub ctx: TestContext,
    /// Mocked operator permission store.
    pub operator_store: MockContract,
    /// Mocked project registry.
    pub projects: MockContract,
    /// Mocked price registry.
    pub prices: MockContract,
    /// Mocked terminal directory.
    pub terminal_directory: MockContract,
    /// Mocked funding cycle store.
    pub funding_cycles: MockContract,
    /// Mocked ticket accounting.
    pub ticket_booth: MockContract,
    /// Mocked mod store.
    pub mod_store: MockContract,
    /// Mocked governance contract.
    pub governance: MockContract,
    /// The terminal under test.
    pub terminal: MockContract,
    /// Account holding governance over the terminal.
    pub multisig: Address,
    _artifacts: ArtifactFixture,
}

/// Deploy the mocked dependency set and the target terminal.
pub async fn terminal_fixture() -> TerminalFixture {
    let artifacts = artifact_fixture();
    let ctx = TestContext::on_dev_chain(Arc::clone(&artifacts.store))
        .await
        .expect("bootstrap");
    let operator_store = ctx.deploy_mock_by_name("OperatorStore").await.expect("mock");
    let projects = ctx.deploy_mock_by_name("Projects").await.expect("mock");
    let prices = ctx.deploy_mock_by_name("Prices").await.expect("mock");
    let terminal_directory = ctx
        .deploy_mock_by_name("TerminalDirectory")
        .await
        .expect("mock");
    let funding_cycles = ctx.deploy_mock_by_name("FundingCycles").await.expect("mock");
    let ticket_booth = ctx.deploy_mock_by_name("TicketBooth").await.expect("mock");
    let mod_store = ctx.deploy_mock_by_name("ModStore").await.expect("mock");
    let governance = ctx.deploy_mock_by_name("Governance").await.expect("mock");
    let terminal = ctx.deploy_mock_by_name("TerminalV1_1").await.expect("mock");
    let multisig = ctx.addrs[9];
    TerminalFixture {
        ctx,
        operator_store,
        projects,
        prices,
        terminal_directory,
        funding_cycles,
        ticket_booth,
        mod_store,
        governance,
        terminal,
        multisig,
        _artifacts: artifacts,
    }
}

/// A `currentOf`/`queuedOf` return tuple with the given identity fields
/// and packed metadata; everything else zeroed.
pub fn funding_cycle_token(
    project_id: u64,
    number: u64,
    target: U256,
    metadata: U256,
) -> Token {
    Token::Tuple(vec![
        Token::Uint(U256::zero()),            // configured
        Token::Uint(U256::zero()),            // cycleLimit
        Token::Uint(U256::from(number)),      // id
        Token::Uint(U256::from(project_id)),  // projectId
        Token::Uint(U256::from(number)),      // number
        Token::Uint(U256::zero()),            // basedOn
        Token::Uint(U256::zero()),            // weight
        Token::Address(Address::zero()),      // ballot
        Token::Uint(U256::zero()),            // start
        Token::Uint(U256::zero()),            // duration
        Token::Uint(target),                  // target
        Token::Uint(U256::zero()),            // currency
        Token::Uint(U256::zero()),            // fee
        Token::Uint(U256::zero()),            // discountRate
        Token::Uint(U256::zero()),            // tapped
        Token::Uint(metadata),                // metadata
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_artifact_resolves_uniquely() {
        let fixture = artifact_fixture();
        for name in [
            "OperatorStore",
            "Prices",
            "Projects",
            "TerminalDirectory",
            "Governance",
            "ModStore",
            "TicketBooth",
            "FundingCycles",
            "TerminalV1",
            "TerminalV1_1",
        ] {
            let abi = fixture.store.load_abi(name).expect(name);
            assert_eq!(abi.contract, name);
        }
    }

    #[test]
    fn test_terminal_abi_declares_suite_surface() {
        let fixture = artifact_fixture();
        let abi = fixture.store.load_abi("TerminalV1_1").unwrap();
        for function in [
            "setFee",
            "allowMigration",
            "addToBalance",
            "deploy",
            "configure",
            "pay",
            "printTickets",
            "tap",
            "burnFromDeadAddress",
        ] {
            assert!(abi.function(function).is_ok(), "missing {function}");
        }
        assert!(abi.event("SetFee").is_some());
        assert!(abi.event("PrintTickets").is_some());
    }
}
