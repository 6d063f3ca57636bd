//! # Harness Errors
//!
//! Assertion failures and harness misuse. Expected contract reverts are
//! asserted by substring; everything else propagates immediately.

use juice_types::Address;
use thiserror::Error;

use juice_abi::AbiError;
use juice_chain::ChainError;

/// Errors raised by the harness helpers.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The execution was expected to revert but succeeded.
    #[error("{function}: expected revert containing {expected:?}, but the call succeeded")]
    ExpectedRevert {
        /// Function that was called.
        function: String,
        /// Expected revert substring.
        expected: String,
    },

    /// The execution reverted with a different message.
    #[error("{function}: expected revert containing {expected:?}, got {actual:?}")]
    WrongRevert {
        /// Function that was called.
        function: String,
        /// Expected revert substring.
        expected: String,
        /// Actual revert message.
        actual: String,
    },

    /// The execution reverted although no revert was expected.
    #[error("{function}: unexpected revert: {message}")]
    UnexpectedRevert {
        /// Function that was called.
        function: String,
        /// Revert message.
        message: String,
    },

    /// An expected event was not found in the receipt logs.
    #[error("{function}: expected event {event} not emitted")]
    MissingEvent {
        /// Function that was called.
        function: String,
        /// Expected event name.
        event: String,
    },

    /// An emitted event carried different parameters.
    #[error("{function}: event {event} emitted with {actual}, expected {expected}")]
    EventMismatch {
        /// Function that was called.
        function: String,
        /// Event name.
        event: String,
        /// Rendered expected parameters.
        expected: String,
        /// Rendered actual parameters.
        actual: String,
    },

    /// A read-back value differed from the expectation.
    #[error("{subject}: expected {expected}, got {actual}")]
    ValueMismatch {
        /// What was checked.
        subject: String,
        /// Rendered expected value.
        expected: String,
        /// Rendered actual value.
        actual: String,
    },

    /// A balance differed from the expectation beyond the tolerance.
    #[error("balance of {address}: expected {expected} (±{tolerance}), got {actual}")]
    BalanceMismatch {
        /// Checked address.
        address: Address,
        /// Rendered expected balance.
        expected: String,
        /// Allowed deviation.
        tolerance: String,
        /// Rendered actual balance.
        actual: String,
    },

    /// Invalid target combination for an execution.
    #[error("invalid execution target: {0}")]
    InvalidTarget(String),

    /// Mocking was requested but the client is not a mock host.
    #[error("contract mocking requires the dev chain")]
    MockingUnavailable,

    /// Domain value failed validation while building arguments.
    #[error(transparent)]
    Type(#[from] juice_types::TypeError),

    /// Underlying chain failure.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// ABI lookup or encoding failure.
    #[error(transparent)]
    Abi(#[from] AbiError),
}
