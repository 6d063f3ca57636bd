//! # Read-Back Checks
//!
//! Compares a contract getter's return against an expected value, with an
//! optional plus/minus tolerance for amounts subject to rounding, and
//! verifies account balances the same way.

use tracing::debug;

use juice_chain::CallRequest;
use juice_abi::Token;
use juice_types::{Address, U256};

use crate::context::{DeployedContract, TestContext};
use crate::errors::HarnessError;

/// Expected getter return.
#[derive(Debug, Clone)]
pub enum Expected {
    /// Exact token comparison.
    Tokens(Vec<Token>),
    /// A single unsigned return, optionally within a tolerance.
    Uint(U256),
}

/// A read-only call plus its expectation.
pub struct Check {
    /// Caller account.
    pub caller: Address,
    /// Target contract.
    pub contract: DeployedContract,
    /// Getter to call.
    pub function: String,
    /// Arguments.
    pub args: Vec<Token>,
    /// Expected return.
    pub expect: Expected,
    /// Allowed deviation for `Expected::Uint`.
    pub plus_minus: Option<U256>,
}

impl Check {
    /// Exact-match check.
    pub fn new(
        caller: Address,
        contract: &DeployedContract,
        function: &str,
        args: Vec<Token>,
        expect: Expected,
    ) -> Self {
        Self {
            caller,
            contract: contract.clone(),
            function: function.to_string(),
            args,
            expect,
            plus_minus: None,
        }
    }

    /// Allow the actual value to deviate by `amount`.
    pub fn plus_minus(mut self, amount: U256) -> Self {
        self.plus_minus = Some(amount);
        self
    }
}

fn within(actual: U256, expected: U256, tolerance: U256) -> bool {
    actual <= expected.saturating_add(tolerance) && actual >= expected.saturating_sub(tolerance)
}

impl TestContext {
    /// Run a getter and assert its return value.
    pub async fn check(&self, check: Check) -> Result<(), HarnessError> {
        let calldata = check
            .contract
            .abi
            .encode_call(&check.function, &check.args)?;
        let outcome = self
            .client()
            .call(CallRequest {
                from: check.caller,
                to: check.contract.address,
                function: check.function.clone(),
                args: check.args.clone(),
                calldata,
            })
            .await?;
        let tokens = if outcome.tokens.is_empty() && !outcome.raw.is_empty() {
            check.contract.abi.decode_outputs(&check.function, &outcome.raw)?
        } else {
            outcome.tokens
        };

        let subject = format!("{}.{}", check.contract.name, check.function);
        match (&check.expect, check.plus_minus) {
            (Expected::Uint(expected), Some(tolerance)) => {
                let actual = tokens
                    .first()
                    .and_then(Token::as_uint)
                    .ok_or_else(|| HarnessError::ValueMismatch {
                        subject: subject.clone(),
                        expected: expected.to_string(),
                        actual: format!("{tokens:?}"),
                    })?;
                debug!(
                    target: "juice::harness",
                    %subject,
                    %actual,
                    %expected,
                    tolerance = %tolerance,
                    "tolerant check"
                );
                if !within(actual, *expected, tolerance) {
                    return Err(HarnessError::ValueMismatch {
                        subject,
                        expected: format!("{expected} (±{tolerance})"),
                        actual: actual.to_string(),
                    });
                }
            }
            (Expected::Uint(expected), None) => {
                if tokens.first().and_then(Token::as_uint) != Some(*expected) {
                    return Err(HarnessError::ValueMismatch {
                        subject,
                        expected: expected.to_string(),
                        actual: format!("{tokens:?}"),
                    });
                }
            }
            (Expected::Tokens(expected), _) => {
                if &tokens != expected {
                    return Err(HarnessError::ValueMismatch {
                        subject,
                        expected: format!("{expected:?}"),
                        actual: format!("{tokens:?}"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Assert an account's balance, optionally within a tolerance.
    pub async fn verify_balance(
        &self,
        address: Address,
        expected: U256,
        plus_minus: Option<U256>,
    ) -> Result<(), HarnessError> {
        let actual = self.get_balance(address).await?;
        let tolerance = plus_minus.unwrap_or_default();
        if plus_minus.is_some() {
            debug!(
                target: "juice::harness",
                %address,
                %actual,
                %expected,
                tolerance = %tolerance,
                "tolerant balance check"
            );
        }
        if !within(actual, expected, tolerance) {
            return Err(HarnessError::BalanceMismatch {
                address,
                expected: expected.to_string(),
                tolerance: tolerance.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }
}
