//! # Local Signer
//!
//! ECDSA key material for non-local networks. The node performs the actual
//! transaction signing; this type derives the deployer address from the
//! configured private key and can sign raw digests where a flow needs one.

use k256::ecdsa::{signature::hazmat::PrehashSigner, Signature, SigningKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};

use juice_types::Address;

use crate::domain::errors::ChainError;

/// A secp256k1 keypair with its derived address.
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl LocalSigner {
    /// Build from a 0x-prefixed 32-byte hex private key.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Signer` on malformed key material.
    pub fn from_hex(private_key: &str) -> Result<Self, ChainError> {
        let stripped = private_key.strip_prefix("0x").unwrap_or(private_key);
        let bytes = hex::decode(stripped)
            .map_err(|e| ChainError::Signer(format!("bad private key hex: {e}")))?;
        let key = SigningKey::from_slice(&bytes)
            .map_err(|e| ChainError::Signer(format!("bad private key: {e}")))?;
        let address = derive_address(&key);
        Ok(Self { key, address })
    }

    /// The address controlled by this key.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a 32-byte digest, returning the 64-byte compact signature.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<[u8; 64], ChainError> {
        let signature: Signature = self
            .key
            .sign_prehash(digest)
            .map_err(|e| ChainError::Signer(e.to_string()))?;
        let mut out = [0u8; 64];
        out.copy_from_slice(&signature.to_bytes());
        Ok(out)
    }
}

/// Keccak of the uncompressed public key, last 20 bytes.
fn derive_address(key: &SigningKey) -> Address {
    let public = key.verifying_key().to_encoded_point(false);
    let mut hasher = Keccak256::new();
    // skip the 0x04 uncompressed-point tag
    hasher.update(&public.as_bytes()[1..]);
    let hash = hasher.finalize();
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address(address)
}
