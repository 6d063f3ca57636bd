//! Projects can be configured to pause payments. A paused project
//! rejects `pay` until a reconfiguration unpauses it.

use juice_abi::{metadata_token, properties_token, Token};
use juice_chain::MockBehavior;
use juice_harness::{Execution, RandomString, RandomU256};
use juice_types::{
    constants, Address, FundingCycleMetadata, FundingCycleProperties, U256,
};

use crate::fixtures::TerminalFixture;
use crate::integration::runner::Workflow;
use crate::integration::workflows::{deploy_project, random_payment};

/// Values threaded between steps.
#[derive(Default)]
pub struct State {
    /// Owner of the deployed project.
    pub owner: Option<Address>,
    /// The project's expected id.
    pub project_id: u64,
}

async fn pay_args(ctx: &juice_harness::TestContext, project_id: u64) -> Vec<Token> {
    vec![
        Token::Uint(U256::from(project_id)),
        ctx.random_signer(&[]).into(),
        ctx.random_string(&RandomString::default()).as_str().into(),
        ctx.random_bool().into(),
    ]
}

/// Build the suite against the mocked terminal set.
pub fn suite(f: &TerminalFixture) -> Workflow<State> {
    let terminal = f.terminal.clone();

    Workflow::new("pause payments")
        .step("Deploy a project for the owner", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    // ID 1 belongs to governance; this project comes next.
                    let owner = ctx.random_signer(&[]);
                    state.owner = Some(owner);
                    state.project_id = 2;
                    deploy_project(ctx, &terminal, owner, state.project_id, true).await
                })
            }
        })
        .step("Making a payment to a paused project shouldnt work", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    let payer = ctx.random_signer(&[]);
                    ctx.prime_next(
                        &terminal,
                        "pay",
                        None,
                        MockBehavior::reverts("TV1_1::pay: PAUSED"),
                    )
                    .await?;
                    let value = random_payment(ctx, payer).await?;
                    let args = pay_args(ctx, state.project_id).await;
                    ctx.execute(
                        Execution::new(payer, terminal.as_contract(), "pay")
                            .with_args(args)
                            .with_value(value)
                            .expect_revert("TV1_1::pay: PAUSED"),
                    )
                    .await?;
                    Ok(())
                })
            }
        })
        .step("Reconfigure to unpause payments", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    let owner = state.owner.expect("project deployed");
                    ctx.prime_next(
                        &terminal,
                        "configure",
                        None,
                        MockBehavior::returns(vec![Token::Uint(U256::from(3u64))]),
                    )
                    .await?;
                    let properties = FundingCycleProperties {
                        target: ctx.random_u256(&RandomU256::default()),
                        currency: 0,
                        duration: U256::zero(),
                        cycle_limit: ctx.random_u256(&RandomU256::at_most(U256::from(
                            constants::MAX_CYCLE_LIMIT,
                        ))),
                        discount_rate: ctx
                            .random_u256(&RandomU256::at_most(U256::from(constants::MAX_PERCENT))),
                        ballot: Address::zero(),
                    };
                    let metadata = FundingCycleMetadata {
                        reserved_rate: constants::MAX_PERCENT as u16,
                        bonding_curve_rate: constants::MAX_PERCENT as u16,
                        reconfiguration_bonding_curve_rate: constants::MAX_PERCENT as u16,
                        pay_is_paused: false,
                        ticket_printing_is_allowed: false,
                        treasury_extension: Address::zero(),
                    };
                    ctx.execute(
                        Execution::new(owner, terminal.as_contract(), "configure").with_args(vec![
                            Token::Uint(U256::from(state.project_id)),
                            properties_token(&properties),
                            metadata_token(&metadata),
                            Token::Array(vec![]),
                            Token::Array(vec![]),
                        ]),
                    )
                    .await?;
                    Ok(())
                })
            }
        })
        .step("Making a payment to a unpaused project should work", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    let payer = ctx.random_signer(&[]);
                    ctx.prime_next(
                        &terminal,
                        "pay",
                        None,
                        MockBehavior::returns(vec![Token::Uint(U256::one())]),
                    )
                    .await?;
                    let value = random_payment(ctx, payer).await?;
                    let args = pay_args(ctx, state.project_id).await;
                    ctx.execute(
                        Execution::new(payer, terminal.as_contract(), "pay")
                            .with_args(args)
                            .with_value(value),
                    )
                    .await?;
                    Ok(())
                })
            }
        })
        .step("A second payment should work the same", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    let payer = ctx.random_signer(&[]);
                    ctx.prime_next(
                        &terminal,
                        "pay",
                        None,
                        MockBehavior::returns(vec![Token::Uint(U256::one())]),
                    )
                    .await?;
                    let value = random_payment(ctx, payer).await?;
                    let args = pay_args(ctx, state.project_id).await;
                    ctx.execute(
                        Execution::new(payer, terminal.as_contract(), "pay")
                            .with_args(args)
                            .with_value(value),
                    )
                    .await?;
                    Ok(())
                })
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::terminal_fixture;

    #[tokio::test]
    async fn test_pause_payments_workflow() {
        let f = terminal_fixture().await;
        let state = suite(&f).run(&f.ctx).await.unwrap();
        assert_eq!(state.project_id, 2);
    }
}
