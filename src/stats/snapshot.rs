//! Protocol statistics snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Global protocol statistics.
///
/// Built in full by one load cycle; USD figures price each pool's
/// denominating asset at the spot price observed during that cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolStats {
    /// Total token supply, decimal units
    pub total_supply: Decimal,
    /// Supply outside the tracked protocol-controlled holders
    pub circulating_supply: Decimal,
    /// Total staked balance, decimal units
    pub total_staked: Decimal,
    /// Staked share of total supply, percent
    pub staked_pct: Decimal,
    /// All reward ever distributed, decimal units
    pub total_historical_reward: Decimal,
    /// Active deposits across all pools, USD
    pub total_deposits_usd: Decimal,
    /// Interest paid across all pools net of the protocol fee, USD
    pub total_interest_usd: Decimal,
    /// Spot USD price of the protocol token
    pub reward_token_price_usd: Decimal,
}

impl ProtocolStats {
    /// The reset state: every field zero
    pub fn zeroed() -> Self {
        Self::default()
    }
}
