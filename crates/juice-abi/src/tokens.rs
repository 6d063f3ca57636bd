//! # Domain Token Conversions
//!
//! Builds call-argument tokens from the shared domain types. Field order
//! follows the contract-side struct declarations.

use primitive_types::U256;

use juice_types::{
    Address, Bytes32, FundingCycleMetadata, FundingCycleProperties, PayoutMod, TicketMod,
};

use crate::encode::Token;

impl From<U256> for Token {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

impl From<u64> for Token {
    fn from(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }
}

impl From<Address> for Token {
    fn from(value: Address) -> Self {
        Self::Address(value)
    }
}

impl From<Bytes32> for Token {
    fn from(value: Bytes32) -> Self {
        Self::Bytes32(value)
    }
}

impl From<bool> for Token {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// The `_properties` tuple of `deploy`/`configure`.
pub fn properties_token(properties: &FundingCycleProperties) -> Token {
    Token::Tuple(vec![
        Token::Uint(properties.target),
        Token::Uint(U256::from(properties.currency)),
        Token::Uint(properties.duration),
        Token::Uint(properties.cycle_limit),
        Token::Uint(properties.discount_rate),
        Token::Address(properties.ballot),
    ])
}

/// The first-generation `_metadata` tuple, carrying only the three rates.
pub fn metadata_v1_token(metadata: &FundingCycleMetadata) -> Token {
    Token::Tuple(vec![
        Token::Uint(U256::from(metadata.reserved_rate)),
        Token::Uint(U256::from(metadata.bonding_curve_rate)),
        Token::Uint(U256::from(metadata.reconfiguration_bonding_curve_rate)),
    ])
}

/// The `_metadata` tuple of `deploy`/`configure`.
pub fn metadata_token(metadata: &FundingCycleMetadata) -> Token {
    Token::Tuple(vec![
        Token::Uint(U256::from(metadata.reserved_rate)),
        Token::Uint(U256::from(metadata.bonding_curve_rate)),
        Token::Uint(U256::from(metadata.reconfiguration_bonding_curve_rate)),
        Token::Bool(metadata.pay_is_paused),
        Token::Bool(metadata.ticket_printing_is_allowed),
        Token::Address(metadata.treasury_extension),
    ])
}

/// One element of the `_payoutMods` array.
pub fn payout_mod_token(payout_mod: &PayoutMod) -> Token {
    Token::Tuple(vec![
        Token::Bool(payout_mod.prefer_unstaked),
        Token::Uint(U256::from(payout_mod.percent)),
        Token::Uint(U256::from(payout_mod.lock_until)),
        Token::Address(payout_mod.beneficiary),
        Token::Address(payout_mod.allocator),
        Token::Uint(U256::from(payout_mod.project_id.0)),
    ])
}

/// One element of the `_ticketMods` array.
pub fn ticket_mod_token(ticket_mod: &TicketMod) -> Token {
    Token::Tuple(vec![
        Token::Bool(ticket_mod.prefer_unstaked),
        Token::Uint(U256::from(ticket_mod.percent)),
        Token::Uint(U256::from(ticket_mod.lock_until)),
        Token::Address(ticket_mod.beneficiary),
    ])
}
