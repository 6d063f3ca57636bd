//! # Deployment Errors

use std::path::PathBuf;

use thiserror::Error;

use juice_harness::HarnessError;

/// Errors raised by the deployment pipeline.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Chain id does not map to a supported network.
    #[error("chain id {0} not supported")]
    UnsupportedChainId(u64),

    /// Network name does not map to a supported network.
    #[error("unknown network {0}")]
    UnknownNetwork(String),

    /// A required environment variable is missing or empty.
    #[error("environment variable {0} is required for this network")]
    MissingEnv(&'static str),

    /// An environment variable holds an unparseable value.
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },

    /// A prior deployment record is missing or unreadable.
    #[error("no deployment record for {contract} on {network} at {path}")]
    MissingRecord {
        /// Contract name.
        contract: String,
        /// Network name.
        network: String,
        /// Path that was probed.
        path: PathBuf,
    },

    /// A deployment record could not be parsed.
    #[error("malformed deployment record at {path}: {reason}")]
    MalformedRecord {
        /// Record path.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Record directory could not be written.
    #[error("failed to write deployment record at {path}: {source}")]
    RecordIo {
        /// Record path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Underlying harness failure.
    #[error(transparent)]
    Harness(#[from] HarnessError),
}
