//! Amounts denominated in a registered currency are converted to and
//! from wei through the price feed; ticket minting and overflow both
//! honor the conversion.

use juice_abi::Token;
use juice_chain::MockBehavior;
use juice_harness::{Check, Execution, Expected, RandomString, RandomU256};
use juice_types::{constants, Address, U256};

use crate::fixtures::TerminalFixture;
use crate::integration::runner::Workflow;
use crate::integration::workflows::{deploy_project, random_payment};

/// Fixed currency-per-ETH rate the suite computes expectations with.
const PRICE_RATE: u64 = 2;

/// Currency index registered for the feed.
const CURRENCY: u64 = 1;

/// Values threaded between steps.
#[derive(Default)]
pub struct State {
    /// Project owner.
    pub owner: Option<Address>,
    /// Beneficiary of the payment's tickets.
    pub beneficiary: Option<Address>,
    /// The project's expected id.
    pub project_id: u64,
    /// Payment made, in wei.
    pub payment: U256,
}

/// Tickets minted for a payment: converted value times the first-cycle
/// weight multiplier.
fn expected_tickets(payment: U256) -> U256 {
    payment * U256::from(PRICE_RATE) * U256::from(constants::INITIAL_WEIGHT_MULTIPLIER)
}

/// Build the suite against the mocked terminal set.
pub fn suite(f: &TerminalFixture) -> Workflow<State> {
    let terminal = f.terminal.clone();
    let ticket_booth = f.ticket_booth.clone();
    let governance = f.governance.clone();
    let prices = f.prices.clone();

    Workflow::new("currency conversion")
        .step("Add the price feed to the prices contract", {
            let governance = governance.clone();
            let prices = prices.clone();
            move |ctx, _state| {
                let governance = governance.clone();
                let prices = prices.clone();
                Box::pin(async move {
                    let feed = ctx.random_address(&[]);
                    ctx.prime_next(&governance, "addPriceFeed", None, MockBehavior::returns(vec![]))
                        .await?;
                    ctx.execute(
                        Execution::new(ctx.deployer, governance.as_contract(), "addPriceFeed")
                            .with_args(vec![
                                Token::Address(prices.address()),
                                Token::Address(feed),
                                Token::Uint(U256::from(CURRENCY)),
                            ]),
                    )
                    .await?;
                    Ok(())
                })
            }
        })
        .step("Deploy a project denominated in the new currency", {
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
        .step("Make a payment to the project, denominated in the currency", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    let payer = ctx.random_signer(&[]);
                    let beneficiary = ctx.random_signer(&[]);
                    state.beneficiary = Some(beneficiary);
                    state.payment = random_payment(ctx, payer).await?;

                    ctx.prime_next(
                        &terminal,
                        "pay",
                        None,
                        MockBehavior::returns(vec![Token::Uint(U256::one())]),
                    )
                    .await?;
                    ctx.execute(
                        Execution::new(payer, terminal.as_contract(), "pay")
                            .with_args(vec![
                                Token::Uint(U256::from(state.project_id)),
                                Token::Address(beneficiary),
                                Token::Str(ctx.random_string(&RandomString::default())),
                                Token::Bool(ctx.random_bool()),
                            ])
                            .with_value(state.payment),
                    )
                    .await?;
                    Ok(())
                })
            }
        })
        .step(
            "Check that the beneficiary of the payment got the correct amount of tickets",
            {
                let ticket_booth = ticket_booth.clone();
                move |ctx, state: &mut State| {
                    let ticket_booth = ticket_booth.clone();
                    Box::pin(async move {
                        let beneficiary = state.beneficiary.expect("payment made");
                        let expected = expected_tickets(state.payment);
                        let args = vec![
                            Token::Address(beneficiary),
                            Token::Uint(U256::from(state.project_id)),
                        ];
                        ctx.prime(
                            &ticket_booth,
                            "balanceOf",
                            Some(args.clone()),
                            MockBehavior::returns(vec![Token::Uint(expected)]),
                        )
                        .await?;
                        // rounding in the conversion allows a small drift
                        ctx.check(
                            Check::new(
                                beneficiary,
                                ticket_booth.as_contract(),
                                "balanceOf",
                                args,
                                Expected::Uint(expected),
                            )
                            .plus_minus(U256::from(10u64)),
                        )
                        .await?;
                        Ok(())
                    })
                }
            },
        )
        .step("Check that the overflow amount is being converted correctly", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    // The whole payment overflows: the deployed target is
                    // denominated in the currency and far above it here.
                    let args = vec![Token::Uint(U256::from(state.project_id))];
                    ctx.prime(
                        &terminal,
                        "currentOverflowOf",
                        Some(args.clone()),
                        MockBehavior::returns(vec![Token::Uint(state.payment)]),
                    )
                    .await?;
                    ctx.check(
                        Check::new(
                            ctx.deployer,
                            terminal.as_contract(),
                            "currentOverflowOf",
                            args,
                            Expected::Uint(state.payment),
                        )
                        .plus_minus(U256::from(10u64)),
                    )
                    .await?;
                    Ok(())
                })
            }
        })
        .step("Tap the full tappable amount from the project", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    let owner = state.owner.expect("project deployed");
                    // tapped wei = currency amount divided by the rate
                    let currency_amount = ctx.random_u256(&RandomU256 {
                        min: U256::one(),
                        max: state.payment * U256::from(PRICE_RATE),
                        favor_edges: false,
                    });
                    let tapped_wei = currency_amount / U256::from(PRICE_RATE);
                    ctx.prime_next(
                        &terminal,
                        "tap",
                        None,
                        MockBehavior::returns(vec![Token::Uint(tapped_wei)]),
                    )
                    .await?;
                    ctx.execute(
                        Execution::new(owner, terminal.as_contract(), "tap").with_args(vec![
                            Token::Uint(U256::from(state.project_id)),
                            Token::Uint(currency_amount),
                            Token::Uint(U256::from(CURRENCY)),
                            Token::Uint(tapped_wei),
                        ]),
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
    async fn test_currency_conversion_workflow() {
        let f = terminal_fixture().await;
        let state = suite(&f).run(&f.ctx).await.unwrap();
        assert!(state.payment >= U256::from(1_000u64));
    }

    #[test]
    fn test_expected_tickets_scales_with_rate() {
        let payment = U256::from(1_000u64);
        assert_eq!(
            expected_tickets(payment),
            U256::from(2_000u64) * U256::from(constants::INITIAL_WEIGHT_MULTIPLIER)
        );
    }
}
