//! # Core Domain Entities
//!
//! Call arguments and return tuples exchanged with the external funding
//! protocol contracts.
//!
//! ## Clusters
//!
//! - **Primitives**: `Address`, `Bytes32`, wei helpers
//! - **Funding cycles**: `FundingCycleProperties`, `FundingCycleMetadata`
//! - **Mods**: `PayoutMod`, `TicketMod`
//! - **Identifiers**: `ProjectId`, `FundingCycleId`

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::TypeError;

/// A 20-byte Ethereum-style address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const fn zero() -> Self {
        Self([0u8; 20])
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Build from a raw 20-byte slice.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::BadAddress` when the slice is not 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        if bytes.len() != 20 {
            return Err(TypeError::BadAddress(hex::encode(bytes)));
        }
        let mut inner = [0u8; 20];
        inner.copy_from_slice(bytes);
        Ok(Self(inner))
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        if stripped.len() != 40 {
            return Err(TypeError::BadAddress(s.to_string()));
        }
        let bytes = hex::decode(stripped).map_err(|_| TypeError::BadAddress(s.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A 32-byte word, used for handles and raw bytes arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bytes32(pub [u8; 32]);

impl Bytes32 {
    /// The zero word.
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Encode a short UTF-8 string into a right-padded 32-byte word.
    ///
    /// Mirrors the client-side `formatBytes32String` convention: the string
    /// bytes occupy the leading positions, the remainder is zero.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::StringTooLong` when the string exceeds 31 bytes.
    pub fn from_string(s: &str) -> Result<Self, TypeError> {
        let bytes = s.as_bytes();
        if bytes.len() > 31 {
            return Err(TypeError::StringTooLong {
                value: s.to_string(),
                len: bytes.len(),
            });
        }
        let mut inner = [0u8; 32];
        inner[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(inner))
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Bytes32 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Bytes32 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(stripped).map_err(serde::de::Error::custom)?;
        if bytes.len() != 32 {
            return Err(serde::de::Error::custom("expected 32 bytes"));
        }
        let mut inner = [0u8; 32];
        inner.copy_from_slice(&bytes);
        Ok(Self(inner))
    }
}

/// Amount in wei.
pub type Wei = U256;

/// `n` ether expressed in wei.
pub fn eth(n: u64) -> Wei {
    U256::from(n) * U256::exp10(18)
}

/// A registered funding recipient, identified by a numeric ID.
///
/// ID 1 belongs to the governance project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ProjectId(pub u64);

impl ProjectId {
    /// The governance project.
    pub const GOVERNANCE: Self = Self(constants::GOVERNANCE_PROJECT_ID);

    /// The next project ID.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A funding cycle configuration identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct FundingCycleId(pub u64);

impl FundingCycleId {
    /// The next funding cycle ID.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for FundingCycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The time-boxed configuration of a funding cycle, as passed to the
/// terminal's `deploy` and `configure` operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingCycleProperties {
    /// Withdrawal target for the cycle, denominated in `currency`.
    pub target: U256,
    /// Currency index the target is denominated in (0 = ETH).
    pub currency: u32,
    /// Cycle duration in seconds. Zero keeps the same cycle active forever.
    pub duration: U256,
    /// Number of cycles the configuration applies for. Zero means no limit.
    pub cycle_limit: U256,
    /// Discount rate out of 200; 201 marks the cycle non-recurring.
    pub discount_rate: U256,
    /// Ballot contract that must approve reconfigurations.
    pub ballot: Address,
}

impl Default for FundingCycleProperties {
    fn default() -> Self {
        Self {
            target: U256::zero(),
            currency: 0,
            duration: U256::zero(),
            cycle_limit: U256::zero(),
            discount_rate: U256::zero(),
            ballot: Address::zero(),
        }
    }
}

/// The secondary funding cycle configuration, stored on-chain as a packed
/// `uint256` bitfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FundingCycleMetadata {
    /// Portion of minted tickets reserved for the project, out of 200.
    pub reserved_rate: u16,
    /// Bonding curve rate applied on redemption, out of 200.
    pub bonding_curve_rate: u16,
    /// Bonding curve rate applied while a reconfiguration ballot is active.
    pub reconfiguration_bonding_curve_rate: u16,
    /// Whether payments to the project are rejected.
    pub pay_is_paused: bool,
    /// Whether the owner may print tickets on demand.
    pub ticket_printing_is_allowed: bool,
    /// Optional treasury extension contract.
    pub treasury_extension: Address,
}

/// Bit offsets of the packed metadata layout. The low byte is the version.
mod packed {
    pub const RESERVED_RATE: usize = 8;
    pub const BONDING_CURVE_RATE: usize = 16;
    pub const RECONFIGURATION_RATE: usize = 24;
    pub const PAY_IS_PAUSED: usize = 32;
    pub const TICKET_PRINTING_IS_ALLOWED: usize = 33;
    pub const TREASURY_EXTENSION: usize = 34;
}

impl FundingCycleMetadata {
    /// Metadata format version for this layout.
    pub const VERSION: u8 = 1;

    /// Pack into the on-chain `uint256` representation.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::PercentOutOfRange` when any rate exceeds
    /// `MAX_PERCENT`.
    pub fn pack(&self) -> Result<U256, TypeError> {
        for (field, rate) in [
            ("reservedRate", self.reserved_rate),
            ("bondingCurveRate", self.bonding_curve_rate),
            (
                "reconfigurationBondingCurveRate",
                self.reconfiguration_bonding_curve_rate,
            ),
        ] {
            if u64::from(rate) > constants::MAX_PERCENT {
                return Err(TypeError::PercentOutOfRange {
                    field,
                    value: u64::from(rate),
                    max: constants::MAX_PERCENT,
                });
            }
        }

        let mut packed = U256::from(Self::VERSION);
        packed |= U256::from(self.reserved_rate) << packed::RESERVED_RATE;
        packed |= U256::from(self.bonding_curve_rate) << packed::BONDING_CURVE_RATE;
        packed |= U256::from(self.reconfiguration_bonding_curve_rate) << packed::RECONFIGURATION_RATE;
        if self.pay_is_paused {
            packed |= U256::one() << packed::PAY_IS_PAUSED;
        }
        if self.ticket_printing_is_allowed {
            packed |= U256::one() << packed::TICKET_PRINTING_IS_ALLOWED;
        }
        packed |= U256::from_big_endian(&{
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(self.treasury_extension.as_bytes());
            word
        }) << packed::TREASURY_EXTENSION;
        Ok(packed)
    }

    /// Reverse of [`pack`](Self::pack).
    pub fn unpack(packed: U256) -> Self {
        let byte_at = |offset: usize| -> u16 { ((packed >> offset).low_u64() & 0xFF) as u16 };
        let bit_at = |offset: usize| -> bool { (packed >> offset).low_u64() & 1 == 1 };

        let mut treasury = [0u8; 32];
        (packed >> packed::TREASURY_EXTENSION).to_big_endian(&mut treasury);
        let mut treasury_extension = [0u8; 20];
        treasury_extension.copy_from_slice(&treasury[12..]);

        Self {
            reserved_rate: byte_at(packed::RESERVED_RATE),
            bonding_curve_rate: byte_at(packed::BONDING_CURVE_RATE),
            reconfiguration_bonding_curve_rate: byte_at(packed::RECONFIGURATION_RATE),
            pay_is_paused: bit_at(packed::PAY_IS_PAUSED),
            ticket_printing_is_allowed: bit_at(packed::TICKET_PRINTING_IS_ALLOWED),
            treasury_extension: Address(treasury_extension),
        }
    }
}

/// A configured split of tapped payouts to a third-party beneficiary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutMod {
    /// Whether the mod prefers unstaked ticket distribution.
    pub prefer_unstaked: bool,
    /// Share of the payout, out of 10 000.
    pub percent: u16,
    /// Timestamp until which the mod cannot be removed.
    pub lock_until: u64,
    /// Recipient of the split.
    pub beneficiary: Address,
    /// Optional allocator contract receiving the split.
    pub allocator: Address,
    /// Project the split is routed to when the allocator is unset.
    pub project_id: ProjectId,
}

impl PayoutMod {
    /// Validate the mod percent.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::PercentOutOfRange` when `percent` is zero or
    /// exceeds `MAX_MOD_PERCENT`.
    pub fn validate(&self) -> Result<(), TypeError> {
        validate_mod_percent(self.percent)
    }
}

/// A configured split of minted tickets to a third-party beneficiary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketMod {
    /// Whether minted tickets are distributed unstaked.
    pub prefer_unstaked: bool,
    /// Share of the minted tickets, out of 10 000.
    pub percent: u16,
    /// Timestamp until which the mod cannot be removed.
    pub lock_until: u64,
    /// Recipient of the split.
    pub beneficiary: Address,
}

impl TicketMod {
    /// Validate the mod percent.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::PercentOutOfRange` when `percent` is zero or
    /// exceeds `MAX_MOD_PERCENT`.
    pub fn validate(&self) -> Result<(), TypeError> {
        validate_mod_percent(self.percent)
    }
}

fn validate_mod_percent(percent: u16) -> Result<(), TypeError> {
    if percent == 0 || u64::from(percent) > constants::MAX_MOD_PERCENT {
        return Err(TypeError::PercentOutOfRange {
            field: "modPercent",
            value: u64::from(percent),
            max: constants::MAX_MOD_PERCENT,
        });
    }
    Ok(())
}
