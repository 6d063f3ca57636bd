//! # Domain Errors
//!
//! Validation errors for the shared harness types.

use thiserror::Error;

/// Errors raised while constructing or validating domain values.
#[derive(Debug, Error)]
pub enum TypeError {
    /// String does not fit a 32-byte word.
    #[error("string exceeds 31 bytes ({len}): {value:?}")]
    StringTooLong {
        /// The offending string.
        value: String,
        /// Its byte length.
        len: usize,
    },

    /// Malformed address literal.
    #[error("bad address literal: {0}")]
    BadAddress(String),

    /// A rate or mod percent outside its denominator.
    #[error("{field} out of range: {value} (max {max})")]
    PercentOutOfRange {
        /// Field name as used by the contracts.
        field: &'static str,
        /// Provided value.
        value: u64,
        /// Inclusive maximum.
        max: u64,
    },
}
