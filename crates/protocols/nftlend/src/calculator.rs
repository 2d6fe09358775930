//! Risk Calculator
//!
//! Pure math for health levels and borrowing capacity. No I/O - just
//! calculations.

use alloy::primitives::U256;

use crate::constants::{health, BPS_DIVISOR};
use crate::state::HealthStatus;

/// Health level of a position, as a 0-100 percentage.
///
/// 100 = no debt, 0 = liquidatable. Degrades linearly as debt approaches
/// the collateral value:
/// `health = clamp(100 - debt * 100 / collateral_value, 0, 100)`
///
/// Zero collateral is maximal risk regardless of debt.
pub fn health_level(debt: U256, collateral_value: U256) -> u8 {
    if collateral_value.is_zero() {
        return 0;
    }
    if debt >= collateral_value {
        return 0;
    }

    let hundred = U256::from(100u64);
    let used = match debt.checked_mul(hundred) {
        Some(scaled) => scaled / collateral_value,
        // debt * 100 only overflows when collateral_value / 100 is nonzero
        None => debt / (collateral_value / hundred),
    };

    // debt < collateral_value, so used <= 100
    100u8.saturating_sub(u8::try_from(used).unwrap_or(100))
}

/// LTV-scaled collateral value backing a loan:
/// `(max_ltv + boost) * price / 10000`
pub fn collateral_value(max_ltv_bps: U256, boost_bps: U256, price: U256) -> U256 {
    let ltv = max_ltv_bps.saturating_add(boost_bps);
    ltv.saturating_mul(price) / U256::from(BPS_DIVISOR)
}

/// How much one supported asset adds to the wallet's borrowing capacity:
/// `max_ltv * price / 10000`
pub fn max_borrowable(max_ltv_bps: U256, price: U256) -> U256 {
    max_ltv_bps.saturating_mul(price) / U256::from(BPS_DIVISOR)
}

/// Determine health status from a health level
pub fn health_status(health_level: u8) -> HealthStatus {
    if health_level >= health::HEALTHY_THRESHOLD {
        HealthStatus::Healthy
    } else if health_level >= health::WARNING_THRESHOLD {
        HealthStatus::Warning
    } else {
        HealthStatus::Danger
    }
}
