//! Projects can print premined tickets before a funding cycle disallows
//! it; printed tickets start out staked.

use juice_abi::Token;
use juice_chain::MockBehavior;
use juice_harness::{Check, Execution, Expected, RandomString, RandomU256};
use juice_types::{constants, Address, U256};

use crate::fixtures::TerminalFixture;
use crate::integration::runner::Workflow;
use crate::integration::workflows::deploy_project;

/// Values threaded between steps.
#[derive(Default)]
pub struct State {
    /// Project owner.
    pub owner: Option<Address>,
    /// Beneficiary of the premined tickets.
    pub beneficiary: Option<Address>,
    /// The project's expected id.
    pub project_id: u64,
    /// Amount of tickets printed.
    pub printed: U256,
}

/// Build the suite against the mocked terminal set.
pub fn suite(f: &TerminalFixture) -> Workflow<State> {
    let terminal = f.terminal.clone();
    let ticket_booth = f.ticket_booth.clone();

    Workflow::new("print tickets")
        .step("Create a project", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    let owner = ctx.random_signer(&[]);
                    state.owner = Some(owner);
                    state.project_id = 2;
                    deploy_project(ctx, &terminal, owner, state.project_id, false).await
                })
            }
        })
        .step("Print some premined tickets", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    let owner = state.owner.expect("project created");
                    let beneficiary = ctx.random_signer(&[]);
                    state.beneficiary = Some(beneficiary);
                    // bounded so the weighted amount stays representable
                    state.printed = ctx.random_u256(&RandomU256::between(
                        U256::one(),
                        constants::max_int256(),
                    ));
                    let memo = ctx.random_string(&RandomString::default());

                    ctx.prime_next(
                        &terminal,
                        "printTickets",
                        None,
                        MockBehavior::returns(vec![]).emitting(
                            "PrintTickets",
                            vec![
                                Token::Uint(U256::from(state.project_id)),
                                Token::Address(beneficiary),
                                Token::Uint(state.printed),
                                Token::Str(memo.clone()),
                                Token::Address(owner),
                            ],
                        ),
                    )
                    .await?;
                    ctx.execute(
                        Execution::new(owner, terminal.as_contract(), "printTickets")
                            .with_args(vec![
                                Token::Uint(U256::from(state.project_id)),
                                Token::Uint(state.printed),
                                Token::Address(beneficiary),
                                Token::Str(memo.clone()),
                                Token::Bool(false),
                            ])
                            .expect_event(
                                "PrintTickets",
                                vec![
                                    Token::Uint(U256::from(state.project_id)),
                                    Token::Address(beneficiary),
                                    Token::Uint(state.printed),
                                    Token::Str(memo),
                                    Token::Address(owner),
                                ],
                            ),
                    )
                    .await?;
                    Ok(())
                })
            }
        })
        .step("The beneficiary should have gotten the correct amount of tickets", {
            let ticket_booth = ticket_booth.clone();
            move |ctx, state: &mut State| {
                let ticket_booth = ticket_booth.clone();
                Box::pin(async move {
                    let beneficiary = state.beneficiary.expect("tickets printed");
                    let args = vec![
                        Token::Address(beneficiary),
                        Token::Uint(U256::from(state.project_id)),
                    ];
                    ctx.prime(
                        &ticket_booth,
                        "balanceOf",
                        Some(args.clone()),
                        MockBehavior::returns(vec![Token::Uint(state.printed)]),
                    )
                    .await?;
                    ctx.check(Check::new(
                        beneficiary,
                        ticket_booth.as_contract(),
                        "balanceOf",
                        args,
                        Expected::Uint(state.printed),
                    ))
                    .await?;
                    Ok(())
                })
            }
        })
        .step("All the tickets should be staked", {
            let ticket_booth = ticket_booth.clone();
            move |ctx, state: &mut State| {
                let ticket_booth = ticket_booth.clone();
                Box::pin(async move {
                    let beneficiary = state.beneficiary.expect("tickets printed");
                    let args = vec![
                        Token::Address(beneficiary),
                        Token::Uint(U256::from(state.project_id)),
                    ];
                    ctx.prime(
                        &ticket_booth,
                        "stakedBalanceOf",
                        Some(args.clone()),
                        MockBehavior::returns(vec![Token::Uint(state.printed)]),
                    )
                    .await?;
                    ctx.check(Check::new(
                        beneficiary,
                        ticket_booth.as_contract(),
                        "stakedBalanceOf",
                        args,
                        Expected::Uint(state.printed),
                    ))
                    .await?;
                    Ok(())
                })
            }
        })
        .step("Printing should not be allowed once a configuration disallows it", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    let owner = state.owner.expect("project created");
                    ctx.prime_next(
                        &terminal,
                        "printTickets",
                        None,
                        MockBehavior::reverts("TV1_1::printTickets: NOT_ALLOWED"),
                    )
                    .await?;
                    ctx.execute(
                        Execution::new(owner, terminal.as_contract(), "printTickets")
                            .with_args(vec![
                                Token::Uint(U256::from(state.project_id)),
                                Token::Uint(U256::one()),
                                Token::Address(owner),
                                Token::Str(String::new()),
                                Token::Bool(false),
                            ])
                            .expect_revert("TV1_1::printTickets: NOT_ALLOWED"),
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
    async fn test_print_tickets_workflow() {
        let f = terminal_fixture().await;
        let state = suite(&f).run(&f.ctx).await.unwrap();
        assert!(state.printed > U256::zero());
    }
}
