//! Farming snapshot types.
//!
//! Two independent snapshots back the farming screen: the user-scoped
//! [`Position`] and the global-scoped [`PoolState`]. Each is built in full by
//! a load cycle and committed atomically; resets replace one without touching
//! the other, so a wallet-connect transition can clear per-user figures while
//! the global ones stay on screen.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::math::RoiHorizons;

// ═══════════════════════════════════════════════════════════════════════════════
// USER-SCOPED
// ═══════════════════════════════════════════════════════════════════════════════

/// One venue's user-scoped figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSide {
    /// Staked balance, decimal units
    pub staked: Decimal,
    /// Share of the venue's total staked balance, percent
    pub pool_share_pct: Decimal,
    /// Claimable reward, decimal units
    pub claimable: Decimal,
    /// Projected reward over one day, decimal units
    pub reward_per_day: Decimal,
}

/// Per-user staking position across both venues.
///
/// Zeroed on initial load and on wallet disconnect; populated only by a
/// complete successful load cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Position in the protocol's farming contract
    pub farming: PositionSide,
    /// Position in the external liquidity-mining program
    pub liquidity_mining: PositionSide,
}

impl Position {
    /// The reset state: every field zero
    pub fn zeroed() -> Self {
        Self::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GLOBAL-SCOPED
// ═══════════════════════════════════════════════════════════════════════════════

/// One venue's global figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueState {
    /// Total staked balance, decimal units
    pub total_staked: Decimal,
    /// Total reward emitted per second, decimal units
    pub reward_per_second: Decimal,
    /// Reward per staked unit per second; zero when nothing is staked
    pub reward_per_unit_per_second: Decimal,
    /// USD price of the reward token
    pub reward_token_price_usd: Decimal,
    /// USD price of the staked (LP) token
    pub lp_token_price_usd: Decimal,
    /// Projected ROI at the four display horizons
    pub roi: RoiHorizons,
}

/// The current reward window of the farming contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardWindow {
    /// Window start (finish minus the fixed period length)
    pub start: DateTime<Utc>,
    /// Window end, as read from the contract
    pub end: DateTime<Utc>,
}

/// Global pool state across both venues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    /// The protocol's farming contract
    pub farming: VenueState,
    /// The external liquidity-mining program
    pub liquidity_mining: VenueState,
    /// Current reward window, when the contract reports one
    pub reward_window: Option<RewardWindow>,
}

impl PoolState {
    /// The reset state: every field zero, no reward window
    pub fn zeroed() -> Self {
        Self::default()
    }
}
