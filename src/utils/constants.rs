//! Protocol constants and magic numbers.
//!
//! All protocol-wide constants are defined here for easy auditing and
//! modification.

// ═══════════════════════════════════════════════════════════════════════════════
// FIXED-POINT CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Fixed-point scale used by the contracts (18 decimals)
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Token decimals implied by [`PRECISION`]
pub const TOKEN_DECIMALS: u8 = 18;

// ═══════════════════════════════════════════════════════════════════════════════
// TIME CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Seconds in a day
pub const DAY_IN_SEC: u64 = 86_400;

/// Seconds in a week
pub const WEEK_IN_SEC: u64 = 7 * DAY_IN_SEC;

/// Seconds in a month (30 days)
pub const MONTH_IN_SEC: u64 = 30 * DAY_IN_SEC;

/// Seconds in a year (365 days)
pub const YEAR_IN_SEC: u64 = 365 * DAY_IN_SEC;

// ═══════════════════════════════════════════════════════════════════════════════
// FARMING CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Length of a reward window in days; the window start is derived by
/// subtracting this from the on-chain finish timestamp
pub const REWARD_PERIOD_DAYS: u64 = 14;

/// Block interval assumed when converting the liquidity-mining program's
/// per-block emission into a per-second rate
pub const LM_SECONDS_PER_BLOCK: u64 = 5;

// ═══════════════════════════════════════════════════════════════════════════════
// FEE CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Protocol fee taken from interest before it is surfaced - 10%
pub const INTEREST_FEE_BPS: u64 = 1_000;

/// Basis points divisor (10000 = 100%)
pub const BPS_DIVISOR: u64 = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_constants_consistent() {
        assert_eq!(WEEK_IN_SEC, DAY_IN_SEC * 7);
        assert_eq!(MONTH_IN_SEC, DAY_IN_SEC * 30);
        assert_eq!(YEAR_IN_SEC, DAY_IN_SEC * 365);
    }

    #[test]
    fn test_precision_matches_decimals() {
        assert_eq!(PRECISION, 10u128.pow(TOKEN_DECIMALS as u32));
    }
}
