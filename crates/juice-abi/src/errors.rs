//! # ABI Errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating artifacts or encoding call data.
#[derive(Debug, Error)]
pub enum AbiError {
    /// No artifact file matched the contract name.
    #[error("no artifact found for contract {contract}")]
    ArtifactNotFound {
        /// Contract name used in the lookup.
        contract: String,
    },

    /// More than one artifact file matched the contract name.
    #[error("ambiguous artifact lookup for contract {contract}: {count} matches")]
    AmbiguousArtifact {
        /// Contract name used in the lookup.
        contract: String,
        /// Number of matches found.
        count: usize,
    },

    /// Artifact file could not be read.
    #[error("failed to read artifact {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Artifact JSON is malformed or missing the `abi` key.
    #[error("malformed artifact for contract {contract}: {reason}")]
    MalformedArtifact {
        /// Contract name used in the lookup.
        contract: String,
        /// What went wrong.
        reason: String,
    },

    /// The ABI does not declare the requested function.
    #[error("unknown function {function} on contract {contract}")]
    UnknownFunction {
        /// Contract name.
        contract: String,
        /// Function name used in the lookup.
        function: String,
    },

    /// A token does not match the declared parameter type.
    #[error("type mismatch for parameter {param}: expected {expected}, got {got}")]
    TypeMismatch {
        /// Parameter name or index.
        param: String,
        /// Declared canonical type.
        expected: String,
        /// Provided token kind.
        got: String,
    },

    /// Wrong number of arguments for a function.
    #[error("wrong argument count for {function}: expected {expected}, got {got}")]
    ArgumentCount {
        /// Function name.
        function: String,
        /// Declared parameter count.
        expected: usize,
        /// Provided token count.
        got: usize,
    },

    /// Return data could not be decoded against the declared types.
    #[error("failed to decode return data: {0}")]
    Decode(String),

    /// Unsupported parameter type string in an artifact.
    #[error("unsupported parameter type: {0}")]
    UnsupportedType(String),
}
