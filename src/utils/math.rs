//! Pure metric functions for the dashboard aggregators.
//!
//! Every derived figure the dashboard shows is computed here, free of any
//! I/O, so the aggregators stay thin orchestration. The one invariant that
//! holds throughout: a ratio whose denominator is zero is defined as zero,
//! never NaN, infinity or an error.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::utils::constants::{
    BPS_DIVISOR, DAY_IN_SEC, MONTH_IN_SEC, PRECISION, WEEK_IN_SEC, YEAR_IN_SEC,
};

// ═══════════════════════════════════════════════════════════════════════════════
// UNIT CONVERSION
// ═══════════════════════════════════════════════════════════════════════════════

/// Convert a raw fixed-point contract value into decimal token units.
///
/// Contracts return integers scaled by 10^18; everything downstream works in
/// decimal units.
pub fn normalize(raw: u128) -> Result<Decimal> {
    let value = Decimal::from_u128(raw).ok_or_else(|| Error::Overflow {
        operation: format!("normalize({})", raw),
    })?;
    let scale = Decimal::from_u128(PRECISION).ok_or_else(|| Error::Overflow {
        operation: "normalize scale".into(),
    })?;
    Ok(value / scale)
}

// ═══════════════════════════════════════════════════════════════════════════════
// RATIOS (ZERO-GUARDED)
// ═══════════════════════════════════════════════════════════════════════════════

/// `part / whole * 100`, or zero when `whole` is zero.
///
/// Used for pool share and staked percentage.
pub fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part / whole * Decimal::from(100u32)
}

/// Reward emitted per staked unit per second, or zero when nothing is staked.
pub fn per_unit_rate(total_rate: Decimal, total_staked: Decimal) -> Decimal {
    if total_staked.is_zero() {
        return Decimal::ZERO;
    }
    total_rate / total_staked
}

/// Projected reward over one day for a given balance and per-unit rate.
pub fn daily_reward(balance: Decimal, per_unit_rate: Decimal) -> Decimal {
    balance * per_unit_rate * Decimal::from(DAY_IN_SEC)
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROI
// ═══════════════════════════════════════════════════════════════════════════════

/// Percentage return per second on the value staked.
///
/// `(reward_rate * token_price) / (total_staked * lp_price) * 100`, defined
/// as zero whenever the denominator is zero.
pub fn roi_per_second(
    reward_rate: Decimal,
    token_price_usd: Decimal,
    total_staked: Decimal,
    lp_price_usd: Decimal,
) -> Decimal {
    let denominator = total_staked * lp_price_usd;
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    reward_rate * token_price_usd / denominator * Decimal::from(100u32)
}

/// Projected ROI at the four display horizons, scaled from a per-second rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct RoiHorizons {
    /// ROI over one day, percent
    pub daily: Decimal,
    /// ROI over one week, percent
    pub weekly: Decimal,
    /// ROI over one month (30 days), percent
    pub monthly: Decimal,
    /// ROI over one year (365 days), percent
    pub yearly: Decimal,
}

impl RoiHorizons {
    /// All horizons zero
    pub const ZERO: Self = Self {
        daily: Decimal::ZERO,
        weekly: Decimal::ZERO,
        monthly: Decimal::ZERO,
        yearly: Decimal::ZERO,
    };

    /// Scale a per-second ROI to every horizon
    pub fn from_per_second(roi_per_second: Decimal) -> Self {
        Self {
            daily: roi_per_second * Decimal::from(DAY_IN_SEC),
            weekly: roi_per_second * Decimal::from(WEEK_IN_SEC),
            monthly: roi_per_second * Decimal::from(MONTH_IN_SEC),
            yearly: roi_per_second * Decimal::from(YEAR_IN_SEC),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SUPPLY
// ═══════════════════════════════════════════════════════════════════════════════

/// Total supply minus every tracked non-circulating balance that is present.
///
/// A holder with no indexed record contributes zero; it is not an error and
/// not treated as a zero-balance record either.
pub fn circulating_supply<I>(total_supply: Decimal, held: I) -> Decimal
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    held.into_iter()
        .flatten()
        .fold(total_supply, |acc, balance| acc - balance)
}

/// Amount net of a basis-point fee.
pub fn after_fee_bps(amount: Decimal, fee_bps: u64) -> Decimal {
    amount * Decimal::from(BPS_DIVISOR - fee_bps.min(BPS_DIVISOR)) / Decimal::from(BPS_DIVISOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(v: u64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(PRECISION).unwrap(), Decimal::ONE);
        assert_eq!(normalize(0).unwrap(), Decimal::ZERO);
        assert_eq!(
            normalize(1_500_000_000_000_000_000).unwrap(),
            Decimal::new(15, 1)
        );
    }

    #[test]
    fn test_percentage_of_zero_denominator() {
        assert_eq!(percentage_of(dec(1000), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percentage_of(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(percentage_of(dec(25), dec(100)), dec(25));
        assert_eq!(percentage_of(dec(1), dec(3)) * dec(3), dec(100));
    }

    #[test]
    fn test_per_unit_rate_zero_staked() {
        // regardless of the reward rate
        assert_eq!(per_unit_rate(dec(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(per_unit_rate(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_roi_example() {
        // rate 10/s, token $2, staked 100, LP $5 => (10*2)/(100*5)*100 = 4%/s
        let roi = roi_per_second(dec(10), dec(2), dec(100), dec(5));
        assert_eq!(roi, dec(4));

        let horizons = RoiHorizons::from_per_second(roi);
        assert_eq!(horizons.yearly, dec(4) * dec(YEAR_IN_SEC));
    }

    #[test]
    fn test_roi_zero_guard() {
        assert_eq!(
            roi_per_second(dec(10), dec(2), Decimal::ZERO, dec(5)),
            Decimal::ZERO
        );
        assert_eq!(
            roi_per_second(dec(10), dec(2), dec(100), Decimal::ZERO),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_circulating_supply_skips_absent() {
        // 1,000,000 total; LP holds 200,000; treasury 100,000; rest absent
        let total = dec(1_000_000);
        let held = vec![Some(dec(200_000)), Some(dec(100_000)), None, None, None, None];
        assert_eq!(circulating_supply(total, held), dec(700_000));
    }

    #[test]
    fn test_circulating_supply_all_absent() {
        let total = dec(42);
        assert_eq!(circulating_supply(total, vec![None, None]), total);
    }

    #[test]
    fn test_after_fee_bps() {
        // 10% fee
        assert_eq!(after_fee_bps(dec(100), 1_000), dec(90));
        assert_eq!(after_fee_bps(dec(100), 0), dec(100));
        // fee clamped at 100%
        assert_eq!(after_fee_bps(dec(100), 20_000), Decimal::ZERO);
    }

    #[test]
    fn test_daily_reward() {
        let rate = per_unit_rate(dec(10), dec(100));
        assert_eq!(daily_reward(dec(50), rate), dec(5) * dec(DAY_IN_SEC) / dec(10));
    }

    proptest! {
        #[test]
        fn prop_roi_horizons_pairwise_consistent(sec_roi in 0u64..1_000_000) {
            let roi = Decimal::from(sec_roi) / Decimal::from(1_000u64);
            let h = RoiHorizons::from_per_second(roi);
            prop_assert_eq!(h.weekly, h.daily * Decimal::from(7u32));
            prop_assert_eq!(h.monthly, h.daily * Decimal::from(30u32));
            prop_assert_eq!(h.yearly, h.daily * Decimal::from(365u32));
        }

        #[test]
        fn prop_zero_denominator_is_zero(part in 0u64..u64::MAX, rate in 0u64..u64::MAX) {
            prop_assert_eq!(percentage_of(Decimal::from(part), Decimal::ZERO), Decimal::ZERO);
            prop_assert_eq!(per_unit_rate(Decimal::from(rate), Decimal::ZERO), Decimal::ZERO);
        }

        #[test]
        fn prop_percentage_bounded_by_whole(part in 0u64..10_000, whole in 1u64..10_000) {
            let pct = percentage_of(Decimal::from(part), Decimal::from(whole));
            if part <= whole {
                prop_assert!(pct <= Decimal::from(100u32));
            } else {
                prop_assert!(pct > Decimal::from(100u32));
            }
        }

        #[test]
        fn prop_circulating_never_exceeds_total(
            total in 0u64..1_000_000_000,
            held in proptest::collection::vec(proptest::option::of(0u64..1_000_000), 0..6)
        ) {
            let circulating = circulating_supply(
                Decimal::from(total),
                held.into_iter().map(|h| h.map(Decimal::from)),
            );
            prop_assert!(circulating <= Decimal::from(total));
        }
    }
}
