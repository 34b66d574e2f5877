//! Farming dashboard aggregation: per-user positions and global pool state
//! for the protocol's own farming contract and the external liquidity-mining
//! program.

pub mod aggregator;
pub mod snapshot;
