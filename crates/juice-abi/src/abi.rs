//! # Typed ABI Descriptors
//!
//! Parsed form of the `abi` array inside a compiled artifact.

use serde_json::Value;

use crate::errors::AbiError;

/// Canonical parameter type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Unsigned integer of the given bit width.
    Uint(usize),
    /// 20-byte address.
    Address,
    /// Fixed 32-byte word.
    Bytes32,
    /// Boolean flag.
    Bool,
    /// Dynamic UTF-8 string.
    String,
    /// Dynamic byte string.
    Bytes,
    /// Dynamic array of a single element type.
    Array(Box<ParamType>),
    /// Ordered tuple of component types.
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Parse a solidity type string, resolving `tuple` against the
    /// artifact's `components` listing.
    pub fn parse(type_str: &str, components: Option<&Value>) -> Result<Self, AbiError> {
        if let Some(elem) = type_str.strip_suffix("[]") {
            return Ok(Self::Array(Box::new(Self::parse(elem, components)?)));
        }
        match type_str {
            "address" => Ok(Self::Address),
            "bool" => Ok(Self::Bool),
            "string" => Ok(Self::String),
            "bytes" => Ok(Self::Bytes),
            "bytes32" => Ok(Self::Bytes32),
            "tuple" => {
                let fields = components
                    .and_then(Value::as_array)
                    .ok_or_else(|| AbiError::UnsupportedType("tuple without components".into()))?;
                let mut kinds = Vec::with_capacity(fields.len());
                for field in fields {
                    kinds.push(parse_param(field)?.kind);
                }
                Ok(Self::Tuple(kinds))
            }
            other if other.starts_with("uint") => {
                let bits: usize = other[4..].parse().unwrap_or(256);
                if bits == 0 || bits > 256 || bits % 8 != 0 {
                    return Err(AbiError::UnsupportedType(other.to_string()));
                }
                Ok(Self::Uint(bits))
            }
            other => Err(AbiError::UnsupportedType(other.to_string())),
        }
    }

    /// Canonical signature fragment for this type.
    pub fn canonical(&self) -> String {
        match self {
            Self::Uint(bits) => format!("uint{bits}"),
            Self::Address => "address".into(),
            Self::Bytes32 => "bytes32".into(),
            Self::Bool => "bool".into(),
            Self::String => "string".into(),
            Self::Bytes => "bytes".into(),
            Self::Array(elem) => format!("{}[]", elem.canonical()),
            Self::Tuple(kinds) => {
                let inner: Vec<String> = kinds.iter().map(ParamType::canonical).collect();
                format!("({})", inner.join(","))
            }
        }
    }

    /// Whether values of this type occupy the dynamic tail of an encoding.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::String | Self::Bytes | Self::Array(_) => true,
            Self::Tuple(kinds) => kinds.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }
}

/// A named function or event parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name (may be empty in artifacts).
    pub name: String,
    /// Canonical type.
    pub kind: ParamType,
    /// Whether the parameter is an indexed event topic.
    pub indexed: bool,
}

/// A callable function descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiFunction {
    /// Function name.
    pub name: String,
    /// Input parameters in declaration order.
    pub inputs: Vec<Param>,
    /// Output parameters in declaration order.
    pub outputs: Vec<Param>,
}

impl AbiFunction {
    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        let inputs: Vec<String> = self.inputs.iter().map(|p| p.kind.canonical()).collect();
        format!("{}({})", self.name, inputs.join(","))
    }
}

/// An event descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiEvent {
    /// Event name.
    pub name: String,
    /// Event parameters in declaration order.
    pub inputs: Vec<Param>,
}

impl AbiEvent {
    /// Canonical signature, e.g. `SetFee(uint256)`.
    pub fn signature(&self) -> String {
        let inputs: Vec<String> = self.inputs.iter().map(|p| p.kind.canonical()).collect();
        format!("{}({})", self.name, inputs.join(","))
    }
}

/// The parsed ABI of a single contract.
#[derive(Debug, Clone, Default)]
pub struct Abi {
    /// Contract name the ABI was loaded for.
    pub contract: String,
    /// Constructor inputs, when declared.
    pub constructor: Option<AbiFunction>,
    /// Declared functions.
    pub functions: Vec<AbiFunction>,
    /// Declared events.
    pub events: Vec<AbiEvent>,
}

impl Abi {
    /// Parse the `abi` array of an artifact.
    pub fn parse(contract: &str, entries: &[Value]) -> Result<Self, AbiError> {
        let mut abi = Self {
            contract: contract.to_string(),
            ..Default::default()
        };
        for entry in entries {
            match entry.get("type").and_then(Value::as_str) {
                Some("function") => abi.functions.push(parse_function(contract, entry)?),
                Some("constructor") => {
                    let mut ctor = parse_function(contract, entry)?;
                    ctor.name = "constructor".to_string();
                    abi.constructor = Some(ctor);
                }
                Some("event") => abi.events.push(AbiEvent {
                    name: entry
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    inputs: parse_params(entry.get("inputs"))?,
                }),
                // fallback, receive, errors: irrelevant to the harness
                _ => {}
            }
        }
        Ok(abi)
    }

    /// Look up a function by name.
    ///
    /// # Errors
    ///
    /// Returns `AbiError::UnknownFunction` when the ABI does not declare it.
    pub fn function(&self, name: &str) -> Result<&AbiFunction, AbiError> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| AbiError::UnknownFunction {
                contract: self.contract.clone(),
                function: name.to_string(),
            })
    }

    /// Look up an event by name.
    pub fn event(&self, name: &str) -> Option<&AbiEvent> {
        self.events.iter().find(|e| e.name == name)
    }
}

fn parse_function(contract: &str, entry: &Value) -> Result<AbiFunction, AbiError> {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let inputs = parse_params(entry.get("inputs")).map_err(|e| match e {
        AbiError::UnsupportedType(t) => AbiError::MalformedArtifact {
            contract: contract.to_string(),
            reason: format!("unsupported type {t} in {name}"),
        },
        other => other,
    })?;
    let outputs = parse_params(entry.get("outputs"))?;
    Ok(AbiFunction {
        name,
        inputs,
        outputs,
    })
}

fn parse_params(value: Option<&Value>) -> Result<Vec<Param>, AbiError> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    entries.iter().map(parse_param).collect()
}

fn parse_param(entry: &Value) -> Result<Param, AbiError> {
    let type_str = entry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| AbiError::UnsupportedType("missing type".into()))?;
    Ok(Param {
        name: entry
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        kind: ParamType::parse(type_str, entry.get("components"))?,
        indexed: entry
            .get("indexed")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}
