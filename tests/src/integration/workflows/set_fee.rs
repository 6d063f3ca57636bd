//! Governance can set a new protocol fee for future configurations; the
//! fee is capped and owner-gated.

use juice_abi::Token;
use juice_chain::MockBehavior;
use juice_harness::{Check, Execution, Expected, RandomU256};
use juice_types::U256;

use crate::fixtures::TerminalFixture;
use crate::integration::runner::Workflow;

/// Values threaded between steps.
#[derive(Default)]
pub struct State {
    /// The fee set by governance.
    pub fee: U256,
}

/// Build the suite against the mocked terminal set.
pub fn suite(f: &TerminalFixture) -> Workflow<State> {
    let terminal = f.terminal.clone();
    let multisig = f.multisig;

    Workflow::new("set fee")
        .step("Governance can set a new fee", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    let fee = ctx.random_u256(&RandomU256::at_most(U256::from(10u64)));
                    state.fee = fee;
                    ctx.prime_next(
                        &terminal,
                        "setFee",
                        None,
                        MockBehavior::returns(vec![]).emitting("SetFee", vec![fee.into()]),
                    )
                    .await?;
                    ctx.execute(
                        Execution::new(multisig, terminal.as_contract(), "setFee")
                            .with_args(vec![fee.into()])
                            .expect_event("SetFee", vec![fee.into()]),
                    )
                    .await?;
                    Ok(())
                })
            }
        })
        .step("The new fee should be stored", {
            let terminal = terminal.clone();
            move |ctx, state: &mut State| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    ctx.prime(
                        &terminal,
                        "fee",
                        None,
                        MockBehavior::returns(vec![state.fee.into()]),
                    )
                    .await?;
                    ctx.check(Check::new(
                        multisig,
                        terminal.as_contract(),
                        "fee",
                        vec![],
                        Expected::Uint(state.fee),
                    ))
                    .await?;
                    Ok(())
                })
            }
        })
        .step("A non-governance caller cannot set a fee", {
            let terminal = terminal.clone();
            move |ctx, _state| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    let stranger = ctx.random_signer(&[multisig]);
                    ctx.prime_next(
                        &terminal,
                        "setFee",
                        Some(stranger),
                        MockBehavior::reverts("Ownable: caller is not the owner"),
                    )
                    .await?;
                    let fee = ctx.random_u256(&RandomU256::at_most(U256::from(10u64)));
                    ctx.execute(
                        Execution::new(stranger, terminal.as_contract(), "setFee")
                            .with_args(vec![fee.into()])
                            .expect_revert("Ownable: caller is not the owner"),
                    )
                    .await?;
                    Ok(())
                })
            }
        })
        .step("The fee cannot exceed 5%", {
            let terminal = terminal.clone();
            move |ctx, _state| {
                let terminal = terminal.clone();
                Box::pin(async move {
                    ctx.prime_next(
                        &terminal,
                        "setFee",
                        None,
                        MockBehavior::reverts("TV1_1::setFee: BAD_FEE"),
                    )
                    .await?;
                    ctx.execute(
                        Execution::new(multisig, terminal.as_contract(), "setFee")
                            .with_args(vec![Token::Uint(U256::from(11u64))])
                            .expect_revert("TV1_1::setFee: BAD_FEE"),
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
    async fn test_set_fee_workflow() {
        let f = terminal_fixture().await;
        let state = suite(&f).run(&f.ctx).await.unwrap();
        assert!(state.fee <= U256::from(10u64));
    }
}
