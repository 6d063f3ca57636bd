//! # Call-Data Encoding
//!
//! Keccak selectors plus the standard head/tail argument encoding.
//! Static values sit in the head; strings, bytes, and arrays live in the
//! tail behind an offset word.

use primitive_types::U256;
use sha3::{Digest, Keccak256};

use juice_types::{Address, Bytes32};

use crate::abi::{Abi, AbiEvent, ParamType};
use crate::errors::AbiError;

/// A call argument or decoded return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unsigned integer (any declared width up to 256 bits).
    Uint(U256),
    /// 20-byte address.
    Address(Address),
    /// Fixed 32-byte word.
    Bytes32(Bytes32),
    /// Boolean flag.
    Bool(bool),
    /// Dynamic UTF-8 string.
    Str(String),
    /// Dynamic byte string.
    Bytes(Vec<u8>),
    /// Array of homogeneous tokens.
    Array(Vec<Token>),
    /// Ordered tuple of tokens.
    Tuple(Vec<Token>),
}

impl Token {
    /// Short kind name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Uint(_) => "uint",
            Self::Address(_) => "address",
            Self::Bytes32(_) => "bytes32",
            Self::Bool(_) => "bool",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Tuple(_) => "tuple",
        }
    }

    /// Convenience accessor for uint tokens.
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Convenience accessor for address tokens.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// Convenience accessor for bool tokens.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Keccak-256 of arbitrary bytes.
fn keccak(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// 4-byte function selector for a canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// 32-byte topic hash for a canonical event signature.
pub fn event_topic(signature: &str) -> Bytes32 {
    Bytes32(keccak(signature.as_bytes()))
}

/// In-place word count of a static type, in bytes.
fn static_size(kind: &ParamType) -> usize {
    match kind {
        ParamType::Tuple(kinds) if !kind.is_dynamic() => kinds.iter().map(static_size).sum(),
        _ => 32,
    }
}

fn u256_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

fn check_token(kind: &ParamType, token: &Token, param: &str) -> Result<(), AbiError> {
    let mismatch = || AbiError::TypeMismatch {
        param: param.to_string(),
        expected: kind.canonical(),
        got: token.kind_name().to_string(),
    };
    match (kind, token) {
        (ParamType::Uint(bits), Token::Uint(value)) => {
            if *bits < 256 && *value > (U256::one() << *bits) - 1 {
                return Err(mismatch());
            }
            Ok(())
        }
        (ParamType::Address, Token::Address(_))
        | (ParamType::Bytes32, Token::Bytes32(_))
        | (ParamType::Bool, Token::Bool(_))
        | (ParamType::String, Token::Str(_))
        | (ParamType::Bytes, Token::Bytes(_)) => Ok(()),
        (ParamType::Array(elem), Token::Array(items)) => {
            for item in items {
                check_token(elem, item, param)?;
            }
            Ok(())
        }
        (ParamType::Tuple(kinds), Token::Tuple(fields)) => {
            if kinds.len() != fields.len() {
                return Err(mismatch());
            }
            for (k, f) in kinds.iter().zip(fields) {
                check_token(k, f, param)?;
            }
            Ok(())
        }
        _ => Err(mismatch()),
    }
}

/// Encode a block of tokens against their declared types.
pub fn encode_tokens(kinds: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    if kinds.len() != tokens.len() {
        return Err(AbiError::ArgumentCount {
            function: "<block>".to_string(),
            expected: kinds.len(),
            got: tokens.len(),
        });
    }
    for (i, (kind, token)) in kinds.iter().zip(tokens).enumerate() {
        check_token(kind, token, &i.to_string())?;
    }

    let head_len: usize = kinds.iter().map(head_size).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (kind, token) in kinds.iter().zip(tokens) {
        if kind.is_dynamic() {
            head.extend_from_slice(&u256_word(U256::from(head_len + tail.len())));
            tail.extend(encode_value(kind, token)?);
        } else {
            head.extend(encode_value(kind, token)?);
        }
    }
    head.extend(tail);
    Ok(head)
}

fn head_size(kind: &ParamType) -> usize {
    if kind.is_dynamic() {
        32
    } else {
        static_size(kind)
    }
}

fn encode_value(kind: &ParamType, token: &Token) -> Result<Vec<u8>, AbiError> {
    match (kind, token) {
        (ParamType::Uint(_), Token::Uint(value)) => Ok(u256_word(*value).to_vec()),
        (ParamType::Address, Token::Address(addr)) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(addr.as_bytes());
            Ok(word.to_vec())
        }
        (ParamType::Bytes32, Token::Bytes32(word)) => Ok(word.0.to_vec()),
        (ParamType::Bool, Token::Bool(flag)) => {
            Ok(u256_word(U256::from(u8::from(*flag))).to_vec())
        }
        (ParamType::String, Token::Str(s)) => Ok(encode_dynamic_bytes(s.as_bytes())),
        (ParamType::Bytes, Token::Bytes(b)) => Ok(encode_dynamic_bytes(b)),
        (ParamType::Array(elem), Token::Array(items)) => {
            let kinds: Vec<ParamType> = vec![(**elem).clone(); items.len()];
            let mut out = u256_word(U256::from(items.len())).to_vec();
            out.extend(encode_tokens(&kinds, items)?);
            Ok(out)
        }
        (ParamType::Tuple(kinds), Token::Tuple(fields)) => encode_tokens(kinds, fields),
        _ => unreachable!("token checked before encoding"),
    }
}

fn encode_dynamic_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = u256_word(U256::from(data.len())).to_vec();
    out.extend_from_slice(data);
    let pad = (32 - data.len() % 32) % 32;
    out.extend(std::iter::repeat(0u8).take(pad));
    out
}

/// Decode a block of return data against the declared types.
pub fn decode_tokens(kinds: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode_block(kinds, data, 0)
}

fn decode_block(kinds: &[ParamType], data: &[u8], base: usize) -> Result<Vec<Token>, AbiError> {
    let mut tokens = Vec::with_capacity(kinds.len());
    let mut cursor = base;
    for kind in kinds {
        if kind.is_dynamic() {
            let ptr = read_word(data, cursor)?.low_u64() as usize;
            tokens.push(decode_value(kind, data, base + ptr)?);
            cursor += 32;
        } else {
            tokens.push(decode_value(kind, data, cursor)?);
            cursor += static_size(kind);
        }
    }
    Ok(tokens)
}

fn decode_value(kind: &ParamType, data: &[u8], pos: usize) -> Result<Token, AbiError> {
    match kind {
        ParamType::Uint(_) => Ok(Token::Uint(read_word(data, pos)?)),
        ParamType::Address => {
            let word = read_raw(data, pos)?;
            Ok(Token::Address(
                Address::from_slice(&word[12..]).map_err(|e| AbiError::Decode(e.to_string()))?,
            ))
        }
        ParamType::Bytes32 => Ok(Token::Bytes32(Bytes32(read_raw(data, pos)?))),
        ParamType::Bool => Ok(Token::Bool(!read_word(data, pos)?.is_zero())),
        ParamType::String => {
            let bytes = read_dynamic_bytes(data, pos)?;
            String::from_utf8(bytes)
                .map(Token::Str)
                .map_err(|e| AbiError::Decode(e.to_string()))
        }
        ParamType::Bytes => Ok(Token::Bytes(read_dynamic_bytes(data, pos)?)),
        ParamType::Array(elem) => {
            let len = read_word(data, pos)?.low_u64() as usize;
            let kinds: Vec<ParamType> = vec![(**elem).clone(); len];
            Ok(Token::Array(decode_block(&kinds, data, pos + 32)?))
        }
        ParamType::Tuple(kinds) => Ok(Token::Tuple(decode_block(kinds, data, pos)?)),
    }
}

fn read_raw(data: &[u8], pos: usize) -> Result<[u8; 32], AbiError> {
    let end = pos
        .checked_add(32)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| AbiError::Decode(format!("truncated data at offset {pos}")))?;
    let mut word = [0u8; 32];
    word.copy_from_slice(&data[pos..end]);
    Ok(word)
}

fn read_word(data: &[u8], pos: usize) -> Result<U256, AbiError> {
    Ok(U256::from_big_endian(&read_raw(data, pos)?))
}

fn read_dynamic_bytes(data: &[u8], pos: usize) -> Result<Vec<u8>, AbiError> {
    let len = read_word(data, pos)?.low_u64() as usize;
    let start = pos + 32;
    let end = start
        .checked_add(len)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| AbiError::Decode(format!("truncated bytes at offset {pos}")))?;
    Ok(data[start..end].to_vec())
}

impl Abi {
    /// Encode a function call: selector plus arguments.
    ///
    /// # Errors
    ///
    /// Fails when the function is unknown, the argument count differs from
    /// the declaration, or a token mismatches its declared type.
    pub fn encode_call(&self, function: &str, args: &[Token]) -> Result<Vec<u8>, AbiError> {
        let f = self.function(function)?;
        if f.inputs.len() != args.len() {
            return Err(AbiError::ArgumentCount {
                function: function.to_string(),
                expected: f.inputs.len(),
                got: args.len(),
            });
        }
        let kinds: Vec<ParamType> = f.inputs.iter().map(|p| p.kind.clone()).collect();
        let mut data = selector(&f.signature()).to_vec();
        data.extend(encode_tokens(&kinds, args)?);
        Ok(data)
    }

    /// Encode constructor arguments for appending to deployment bytecode.
    pub fn encode_constructor(&self, args: &[Token]) -> Result<Vec<u8>, AbiError> {
        match &self.constructor {
            Some(ctor) => {
                let kinds: Vec<ParamType> = ctor.inputs.iter().map(|p| p.kind.clone()).collect();
                encode_tokens(&kinds, args)
            }
            None if args.is_empty() => Ok(Vec::new()),
            None => Err(AbiError::ArgumentCount {
                function: "constructor".to_string(),
                expected: 0,
                got: args.len(),
            }),
        }
    }

    /// Decode a function's return data.
    pub fn decode_outputs(&self, function: &str, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        let f = self.function(function)?;
        let kinds: Vec<ParamType> = f.outputs.iter().map(|p| p.kind.clone()).collect();
        decode_tokens(&kinds, data)
    }
}

/// Decode a raw log against an event declaration.
///
/// Indexed parameters are read from `topics[1..]`, the rest from `data`,
/// and the result is returned in declaration order.
pub fn decode_event(
    event: &AbiEvent,
    topics: &[Bytes32],
    data: &[u8],
) -> Result<Vec<Token>, AbiError> {
    let mut topic_cursor = 1usize;
    let unindexed: Vec<ParamType> = event
        .inputs
        .iter()
        .filter(|p| !p.indexed)
        .map(|p| p.kind.clone())
        .collect();
    let mut from_data = decode_tokens(&unindexed, data)?.into_iter();

    let mut tokens = Vec::with_capacity(event.inputs.len());
    for param in &event.inputs {
        if param.indexed {
            let topic = topics.get(topic_cursor).ok_or_else(|| {
                AbiError::Decode(format!("missing topic for indexed param {}", param.name))
            })?;
            topic_cursor += 1;
            tokens.push(decode_value(&param.kind, &topic.0, 0)?);
        } else {
            tokens.push(
                from_data
                    .next()
                    .ok_or_else(|| AbiError::Decode("missing data param".to_string()))?,
            );
        }
    }
    Ok(tokens)
}
