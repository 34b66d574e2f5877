//! # stakedash
//!
//! Aggregation service for a staking dashboard: per-user positions, reward
//! accrual, ROI projections and protocol-wide statistics, assembled from
//! read-only contract calls, a price/valuation helper and a GraphQL indexer.
//!
//! ## Architecture
//!
//! The crate is split along the data-aggregation pipeline:
//!
//! - **Chain**: read-only JSON-RPC connection and typed contract readers
//! - **Prices**: USD valuation for tokens and liquidity-pool tokens
//! - **Indexer**: fixed parameterized query against the indexing service
//! - **Farming / Stats**: the two aggregators, producing immutable snapshots
//! - **Wallet**: session state, lifecycle events and transaction submission
//!
//! All derived metrics are pure functions in [`utils::math`]; the aggregators
//! only orchestrate reads and commit snapshots. Every load cycle carries a
//! monotonically increasing epoch token, and a load whose token has been
//! superseded discards its result instead of overwriting newer data.
//!
//! ## Example
//!
//! ```rust,ignore
//! use stakedash::prelude::*;
//!
//! let token = aggregator.begin_load();
//! aggregator.reset_global().await;
//! aggregator.load_global(token).await?;
//! let pool = aggregator.pool_state().await;
//! println!("daily ROI: {}%", pool.farming.roi.daily);
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications
)]

pub mod chain;
pub mod cli;
pub mod config;
pub mod error;
pub mod farming;
pub mod indexer;
pub mod prices;
pub mod stats;
pub mod utils;
pub mod wallet;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::chain::{
        contracts::{Erc20Reader, FarmingReader, LiquidityMiningReader},
        Address,
    };
    pub use crate::config::DashboardConfig;
    pub use crate::error::{Error, Result};
    pub use crate::farming::{
        aggregator::FarmingAggregator,
        snapshot::{PoolState, Position},
    };
    pub use crate::indexer::client::IndexerClient;
    pub use crate::prices::helper::PriceHelper;
    pub use crate::stats::{aggregator::StatsAggregator, snapshot::ProtocolStats};
    pub use crate::utils::math::RoiHorizons;
    pub use crate::wallet::session::{WalletEvent, WalletService};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name
pub const SERVICE_NAME: &str = "stakedash";
