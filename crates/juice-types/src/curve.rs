//! Expected-value math for redemption assertions.
//!
//! Scenario suites compute the amount a redemption should claim locally
//! and compare it against what the contracts return.

use primitive_types::U256;

use crate::constants::MAX_PERCENT;

/// Amount of `overflow` claimable by redeeming `count` of `total` tickets
/// under bonding curve `rate` (out of 200).
///
/// - Redeeming the full supply claims the full overflow.
/// - `rate == 200` reduces to the proportional claim.
/// - `rate == 0` squares the proportion.
/// - Anything in between blends the two.
pub fn bonding_curve_amount(rate: U256, count: U256, total: U256, overflow: U256) -> U256 {
    if total.is_zero() {
        return U256::zero();
    }
    if count == total {
        return overflow;
    }
    let max_percent = U256::from(MAX_PERCENT);
    let base = overflow * count / total;
    if rate == max_percent {
        return base;
    }
    if rate.is_zero() {
        return base * count / total;
    }
    base * (rate + count * (max_percent - rate) / total) / max_percent
}
