//! # Transaction Executor
//!
//! Issues one transaction and asserts the outcome: either an expected
//! revert whose message must contain a given substring, or a confirmed
//! receipt whose logs must contain the expected events. The target can be
//! a bound contract or a name resolved against the artifact store, in
//! which case an address is mandatory.

use tracing::{debug, info};

use juice_abi::{decode_event, event_topic, Abi, Token};
use juice_chain::{ChainError, LogEntry, TxData, TxReceipt, TxRequest};
use juice_types::{Address, U256};

use crate::context::{DeployedContract, TestContext};
use crate::errors::HarnessError;

/// What an execution is aimed at.
pub enum Target {
    /// A contract already bound to its ABI.
    Contract(DeployedContract),
    /// A contract name resolved against the artifact store. The address
    /// is mandatory; a name alone cannot be dialed.
    ByName {
        /// Contract name.
        name: String,
        /// Address the contract lives at.
        address: Option<Address>,
    },
}

/// Literal arguments, or a closure producing them at execution time.
pub enum ArgSource {
    /// Arguments known up front.
    Literal(Vec<Token>),
    /// Arguments computed when the step runs.
    Lazy(Box<dyn FnOnce() -> Vec<Token> + Send>),
}

impl Default for ArgSource {
    fn default() -> Self {
        Self::Literal(Vec::new())
    }
}

/// An event the receipt must contain.
#[derive(Debug, Clone)]
pub struct ExpectedEvent {
    /// Event name.
    pub name: String,
    /// Expected parameters in declaration order.
    pub params: Vec<Token>,
}

/// A single transaction plus its assertions.
pub struct Execution {
    /// Sending account.
    pub caller: Address,
    /// Target contract.
    pub target: Target,
    /// Function to call.
    pub function: String,
    /// Arguments.
    pub args: ArgSource,
    /// Attached value in wei.
    pub value: U256,
    /// Events that must appear in the receipt.
    pub expected_events: Vec<ExpectedEvent>,
    /// When set, the call must revert with a message containing this.
    pub expect_revert: Option<String>,
}

impl Execution {
    /// Call `function` on a bound contract.
    pub fn new(caller: Address, contract: &DeployedContract, function: &str) -> Self {
        Self {
            caller,
            target: Target::Contract(contract.clone()),
            function: function.to_string(),
            args: ArgSource::default(),
            value: U256::zero(),
            expected_events: Vec::new(),
            expect_revert: None,
        }
    }

    /// Call `function` on a contract resolved by name and address.
    pub fn by_name(caller: Address, name: &str, address: Option<Address>, function: &str) -> Self {
        Self {
            caller,
            target: Target::ByName {
                name: name.to_string(),
                address,
            },
            function: function.to_string(),
            args: ArgSource::default(),
            value: U256::zero(),
            expected_events: Vec::new(),
            expect_revert: None,
        }
    }

    /// Set literal arguments.
    pub fn with_args(mut self, args: Vec<Token>) -> Self {
        self.args = ArgSource::Literal(args);
        self
    }

    /// Set lazily produced arguments.
    pub fn with_lazy_args(mut self, args: impl FnOnce() -> Vec<Token> + Send + 'static) -> Self {
        self.args = ArgSource::Lazy(Box::new(args));
        self
    }

    /// Attach value.
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Require an emitted event.
    pub fn expect_event(mut self, name: &str, params: Vec<Token>) -> Self {
        self.expected_events.push(ExpectedEvent {
            name: name.to_string(),
            params,
        });
        self
    }

    /// Require a revert containing the substring.
    pub fn expect_revert(mut self, substring: &str) -> Self {
        self.expect_revert = Some(substring.to_string());
        self
    }
}

impl TestContext {
    /// Execute a transaction and assert its outcome.
    ///
    /// Returns the receipt on the success path and `None` when an expected
    /// revert was observed.
    pub async fn execute(&self, execution: Execution) -> Result<Option<TxReceipt>, HarnessError> {
        let (abi, address, name) = match execution.target {
            Target::Contract(contract) => (contract.abi, contract.address, contract.name),
            Target::ByName { name, address } => {
                let address = address.ok_or_else(|| {
                    HarnessError::InvalidTarget(format!(
                        "contract name {name} provided without an address"
                    ))
                })?;
                (self.artifacts().load_abi(&name)?, address, name)
            }
        };

        let args = match execution.args {
            ArgSource::Literal(args) => args,
            ArgSource::Lazy(produce) => produce(),
        };
        let calldata = abi.encode_call(&execution.function, &args)?;

        debug!(
            target: "juice::harness",
            contract = %name,
            function = %execution.function,
            caller = %execution.caller,
            expecting_revert = execution.expect_revert.is_some(),
            "executing"
        );

        let result = self
            .client()
            .send_transaction(TxRequest {
                from: execution.caller,
                to: Some(address),
                value: execution.value,
                data: TxData::Call {
                    function: execution.function.clone(),
                    args,
                    calldata,
                },
            })
            .await;

        if let Some(expected) = execution.expect_revert {
            return match result {
                Err(ChainError::Reverted { message }) if message.contains(&expected) => {
                    info!(
                        target: "juice::harness",
                        function = %execution.function,
                        revert = %message,
                        "reverted as expected"
                    );
                    Ok(None)
                }
                Err(ChainError::Reverted { message }) => Err(HarnessError::WrongRevert {
                    function: execution.function,
                    expected,
                    actual: message,
                }),
                Err(other) => Err(other.into()),
                Ok(_) => Err(HarnessError::ExpectedRevert {
                    function: execution.function,
                    expected,
                }),
            };
        }

        let receipt = result.map_err(|e| match e {
            ChainError::Reverted { message } => HarnessError::UnexpectedRevert {
                function: execution.function.clone(),
                message,
            },
            other => other.into(),
        })?;

        self.set_time_mark(receipt.block_timestamp);

        for expected in &execution.expected_events {
            assert_event(&abi, &receipt.logs, &execution.function, expected)?;
        }
        Ok(Some(receipt))
    }

    /// Send plain value from one account to another, asserting a revert
    /// when one is expected.
    pub async fn send_eth(
        &self,
        from: Address,
        to: Address,
        value: U256,
        expect_revert: Option<&str>,
    ) -> Result<(), HarnessError> {
        let result = self
            .client()
            .send_transaction(TxRequest::transfer(from, to, value))
            .await;
        match (expect_revert, result) {
            (Some(expected), Err(ChainError::Reverted { message })) => {
                if message.contains(expected) {
                    Ok(())
                } else {
                    Err(HarnessError::WrongRevert {
                        function: "sendTransaction".to_string(),
                        expected: expected.to_string(),
                        actual: message,
                    })
                }
            }
            (Some(expected), Ok(_)) => Err(HarnessError::ExpectedRevert {
                function: "sendTransaction".to_string(),
                expected: expected.to_string(),
            }),
            (None, Ok(receipt)) => {
                self.set_time_mark(receipt.block_timestamp);
                Ok(())
            }
            (None, Err(ChainError::Reverted { message })) => {
                Err(HarnessError::UnexpectedRevert {
                    function: "sendTransaction".to_string(),
                    message,
                })
            }
            (_, Err(other)) => Err(other.into()),
        }
    }
}

/// Assert one expected event against the receipt logs.
fn assert_event(
    abi: &Abi,
    logs: &[LogEntry],
    function: &str,
    expected: &ExpectedEvent,
) -> Result<(), HarnessError> {
    let mut mismatched: Option<Vec<Token>> = None;
    for log in logs {
        let params = match &log.decoded {
            Some(decoded) if decoded.name == expected.name => Some(decoded.params.clone()),
            Some(_) => None,
            None => match abi.event(&expected.name) {
                Some(event)
                    if log.topics.first() == Some(&event_topic(&event.signature())) =>
                {
                    Some(decode_event(event, &log.topics, &log.data)?)
                }
                _ => None,
            },
        };
        if let Some(params) = params {
            if params == expected.params {
                return Ok(());
            }
            mismatched = Some(params);
        }
    }
    match mismatched {
        Some(actual) => Err(HarnessError::EventMismatch {
            function: function.to_string(),
            event: expected.name.clone(),
            expected: format!("{:?}", expected.params),
            actual: format!("{actual:?}"),
        }),
        None => Err(HarnessError::MissingEvent {
            function: function.to_string(),
            event: expected.name.clone(),
        }),
    }
}
