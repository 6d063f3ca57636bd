//! # Mock-Contract Binding
//!
//! Registers mocked contracts on the dev chain and primes their behavior.
//! A persistent expectation answers every matching call; a one-shot
//! expectation answers exactly one and takes precedence, which is how a
//! suite scripts a sequence like "succeeds, then reverts for the old owner".

use std::sync::Arc;

use juice_abi::{Abi, Token};
use juice_chain::MockBehavior;
use juice_types::Address;

use crate::context::{DeployedContract, TestContext};
use crate::errors::HarnessError;

/// A mocked contract bound to its ABI.
#[derive(Clone)]
pub struct MockContract {
    /// The underlying contract handle, usable as an execution target.
    pub contract: DeployedContract,
}

impl MockContract {
    /// Address of the mock.
    pub fn address(&self) -> Address {
        self.contract.address
    }

    /// The contract handle for executions and checks.
    pub fn as_contract(&self) -> &DeployedContract {
        &self.contract
    }
}

impl TestContext {
    /// Deploy a mock from a parsed ABI.
    pub async fn deploy_mock(&self, abi: Arc<Abi>) -> Result<MockContract, HarnessError> {
        let address = self.mock_host()?.deploy_mock(&abi.contract).await?;
        Ok(MockContract {
            contract: DeployedContract {
                name: abi.contract.clone(),
                address,
                abi,
            },
        })
    }

    /// Deploy a mock by looking its ABI up in the artifact store.
    pub async fn deploy_mock_by_name(&self, name: &str) -> Result<MockContract, HarnessError> {
        let abi = self.artifacts().load_abi(name)?;
        self.deploy_mock(abi).await
    }

    /// Prime a persistent expectation on a mock.
    ///
    /// With `args`, only calls carrying exactly those arguments match;
    /// without, the behavior answers any call to the function.
    pub async fn prime(
        &self,
        mock: &MockContract,
        function: &str,
        args: Option<Vec<Token>>,
        behavior: MockBehavior,
    ) -> Result<(), HarnessError> {
        mock.contract.abi.function(function)?;
        self.mock_host()?
            .prime(mock.address(), function, args, behavior)
            .await?;
        Ok(())
    }

    /// Queue a one-shot expectation, optionally bound to a caller.
    pub async fn prime_next(
        &self,
        mock: &MockContract,
        function: &str,
        caller: Option<Address>,
        behavior: MockBehavior,
    ) -> Result<(), HarnessError> {
        mock.contract.abi.function(function)?;
        self.mock_host()?
            .prime_next(mock.address(), function, caller, behavior)
            .await?;
        Ok(())
    }
}
