//! # Contract ABI Handling
//!
//! Locates compiled contract artifacts by name, parses their ABI
//! descriptions, and encodes/decodes call data.
//!
//! ## Structure
//!
//! - `artifact` - Artifact directory scanning and loading
//! - `abi` - Typed ABI descriptors (`Abi`, `AbiFunction`, `AbiEvent`)
//! - `encode` - Token encoding, selectors, and return-data decoding
//!
//! Artifact lookup is strict: zero matches and multiple matches are both
//! errors, since an ambiguous ABI would silently bind calls to the wrong
//! contract.

pub mod abi;
pub mod artifact;
pub mod encode;
pub mod errors;
pub mod tokens;

pub use abi::{Abi, AbiEvent, AbiFunction, Param, ParamType};
pub use artifact::ArtifactStore;
pub use encode::{decode_event, decode_tokens, encode_tokens, event_topic, selector, Token};
pub use errors::AbiError;
pub use tokens::{
    metadata_token, metadata_v1_token, payout_mod_token, properties_token, ticket_mod_token,
};
