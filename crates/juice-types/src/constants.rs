//! Protocol constants mirrored from the external contracts.
//!
//! All percents are out of 200, except mod percents which are out of
//! 10 000. A discount rate of 201 marks a funding cycle non-recurring.

use primitive_types::U256;

/// The governance project always has ID 1.
pub const GOVERNANCE_PROJECT_ID: u64 = 1;

/// Denominator for reserved/bonding/discount rates.
pub const MAX_PERCENT: u64 = 200;

/// Denominator for payout and ticket mod percents.
pub const MAX_MOD_PERCENT: u64 = 10_000;

/// Discount rates run 0..=200; 201 creates a non-recurring cycle.
pub const MAX_DISCOUNT_RATE: u64 = 201;

/// Denominator applied when a discount rate compounds across cycles.
pub const DISCOUNT_RATE_DENOMINATOR: u64 = 1000;

/// Most cycles a single configuration may apply for.
pub const MAX_CYCLE_LIMIT: u64 = 32;

/// Tickets minted per wei during a project's first funding cycle.
pub const INITIAL_WEIGHT_MULTIPLIER: u64 = 1_000_000;

/// Largest representable unsigned 256-bit value.
pub fn max_uint256() -> U256 {
    U256::MAX
}

/// Largest signed 256-bit value, used as the ticket printing cap.
pub fn max_int256() -> U256 {
    (U256::one() << 255) - 1
}

/// 2^24 - 1.
pub fn max_uint24() -> U256 {
    (U256::one() << 24) - 1
}

/// 2^16 - 1.
pub fn max_uint16() -> U256 {
    (U256::one() << 16) - 1
}

/// 2^8 - 1.
pub fn max_uint8() -> U256 {
    (U256::one() << 8) - 1
}
