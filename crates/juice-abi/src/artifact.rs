//! # Artifact Store
//!
//! Locates compiled contract artifacts under an artifacts directory. The
//! expected layout mirrors the compiler output: a `<Name>.sol` directory
//! containing `<Name>.json` with `abi` and `bytecode` keys.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::abi::Abi;
use crate::errors::AbiError;
use std::collections::HashMap;

/// Rooted artifact lookup with a parse cache.
pub struct ArtifactStore {
    root: PathBuf,
    cache: Mutex<HashMap<String, Arc<Abi>>>,
}

impl ArtifactStore {
    /// Create a store rooted at the artifacts directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The artifacts root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locate the single artifact file for a contract.
    ///
    /// # Errors
    ///
    /// Returns `ArtifactNotFound` when no file matches and
    /// `AmbiguousArtifact` when more than one does.
    pub fn find_artifact(&self, contract: &str) -> Result<PathBuf, AbiError> {
        let mut matches = Vec::new();
        collect_matches(&self.root, contract, &mut matches);
        debug!(
            target: "juice::abi",
            contract,
            count = matches.len(),
            "artifact lookup"
        );
        match matches.len() {
            0 => Err(AbiError::ArtifactNotFound {
                contract: contract.to_string(),
            }),
            1 => Ok(matches.remove(0)),
            count => Err(AbiError::AmbiguousArtifact {
                contract: contract.to_string(),
                count,
            }),
        }
    }

    /// Load and cache the parsed ABI for a contract.
    pub fn load_abi(&self, contract: &str) -> Result<Arc<Abi>, AbiError> {
        if let Some(abi) = self.cache.lock().get(contract) {
            return Ok(Arc::clone(abi));
        }
        let json = self.read_artifact(contract)?;
        let entries = json
            .get("abi")
            .and_then(Value::as_array)
            .ok_or_else(|| AbiError::MalformedArtifact {
                contract: contract.to_string(),
                reason: "missing abi array".to_string(),
            })?;
        let abi = Arc::new(Abi::parse(contract, entries)?);
        self.cache
            .lock()
            .insert(contract.to_string(), Arc::clone(&abi));
        Ok(abi)
    }

    /// Load the deployment bytecode for a contract.
    pub fn load_bytecode(&self, contract: &str) -> Result<Vec<u8>, AbiError> {
        let json = self.read_artifact(contract)?;
        let bytecode = json
            .get("bytecode")
            .and_then(Value::as_str)
            .ok_or_else(|| AbiError::MalformedArtifact {
                contract: contract.to_string(),
                reason: "missing bytecode".to_string(),
            })?;
        let stripped = bytecode.strip_prefix("0x").unwrap_or(bytecode);
        hex::decode(stripped).map_err(|e| AbiError::MalformedArtifact {
            contract: contract.to_string(),
            reason: format!("bad bytecode hex: {e}"),
        })
    }

    fn read_artifact(&self, contract: &str) -> Result<Value, AbiError> {
        let path = self.find_artifact(contract)?;
        let raw = fs::read_to_string(&path).map_err(|source| AbiError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|e| AbiError::MalformedArtifact {
            contract: contract.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Recursively collect `<dir>/**/<contract>.sol/<contract>.json` matches.
fn collect_matches(dir: &Path, contract: &str, matches: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let wanted_dir = format!("{contract}.sol");
    let wanted_file = format!("{contract}.json");
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if path.file_name().is_some_and(|n| n == wanted_dir.as_str()) {
                let candidate = path.join(&wanted_file);
                if candidate.is_file() {
                    matches.push(candidate);
                }
            }
            collect_matches(&path, contract, matches);
        }
    }
}
