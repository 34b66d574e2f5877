//! Protocol statistics aggregator.
//!
//! One load cycle runs the indexer query and the protocol-token price fetch
//! concurrently, then walks the pool records sequentially, pricing each
//! pool's denominating asset at most once through a per-cycle cache. An
//! unavailable price degrades that asset's contribution to zero rather than
//! failing the cycle; only indexer failures abort the load.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::chain::Address;
use crate::error::Result;
use crate::indexer::client::{IndexerClient, StatsQueryData, TrackedHolders};
use crate::prices::helper::PriceHelper;
use crate::stats::snapshot::ProtocolStats;
use crate::utils::math::{circulating_supply, percentage_of};
use crate::utils::SnapshotMeta;

/// Deployment parameters for the stats screen
#[derive(Debug, Clone)]
pub struct StatsParams {
    /// The protocol token whose price and supply figures are shown
    pub reward_token: Address,
    /// Protocol-controlled holders excluded from circulating supply
    pub holders: TrackedHolders,
}

/// Protocol statistics aggregator.
pub struct StatsAggregator<I, P> {
    indexer: I,
    prices: P,
    params: StatsParams,
    epoch: AtomicU64,
    stats: RwLock<ProtocolStats>,
    meta: RwLock<SnapshotMeta>,
}

impl<I, P> StatsAggregator<I, P>
where
    I: IndexerClient,
    P: PriceHelper,
{
    /// Create an aggregator with a zeroed snapshot
    pub fn new(indexer: I, prices: P, params: StatsParams) -> Self {
        Self {
            indexer,
            prices,
            params,
            epoch: AtomicU64::new(0),
            stats: RwLock::new(ProtocolStats::zeroed()),
            meta: RwLock::new(SnapshotMeta::default()),
        }
    }

    /// The latest committed snapshot
    pub async fn stats(&self) -> ProtocolStats {
        *self.stats.read().await
    }

    /// Freshness of the snapshot
    pub async fn meta(&self) -> SnapshotMeta {
        *self.meta.read().await
    }

    /// Start a new load cycle, superseding any still in flight
    pub fn begin_load(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == token
    }

    /// Zero the snapshot
    pub async fn reset(&self) {
        *self.stats.write().await = ProtocolStats::zeroed();
        *self.meta.write().await = SnapshotMeta::default();
    }

    /// One full refresh: reset, then load
    pub async fn refresh(&self) -> Result<()> {
        let token = self.begin_load();
        self.reset().await;
        self.load(token).await?;
        Ok(())
    }

    /// Load the statistics snapshot.
    ///
    /// Returns `Ok(true)` if the snapshot committed, `Ok(false)` if the load
    /// was superseded before it finished. On error the previous snapshot
    /// stays in place and is marked stale.
    pub async fn load(&self, token: u64) -> Result<bool> {
        match self.build().await {
            Ok(stats) => {
                // the token check must happen under the write lock, or a
                // superseded load could pass it and then commit after a
                // newer load already has
                let mut slot = self.stats.write().await;
                if !self.is_current(token) {
                    tracing::debug!(token, "discarding superseded stats load");
                    return Ok(false);
                }
                *slot = stats;
                self.meta.write().await.committed();
                Ok(true)
            }
            Err(e) => {
                self.meta.write().await.failed();
                tracing::warn!(error = %e, "stats load failed");
                Err(e)
            }
        }
    }

    async fn build(&self) -> Result<ProtocolStats> {
        let (data, token_price) = tokio::join!(
            self.indexer.fetch_stats(&self.params.holders),
            self.prices.token_price_usd(&self.params.reward_token),
        );
        let data = data?;
        // an unpriced token degrades to zero; the rest of the cycle proceeds
        let reward_token_price_usd = token_price.unwrap_or_else(|e| {
            tracing::warn!(error = %e, token = %self.params.reward_token, "token price unavailable");
            Decimal::ZERO
        });

        let mut stats = ProtocolStats {
            reward_token_price_usd,
            ..ProtocolStats::zeroed()
        };

        if let Some(protocol) = &data.protocol {
            stats.total_supply = protocol.total_supply;
            stats.total_staked = protocol.total_staked;
            stats.staked_pct = percentage_of(protocol.total_staked, protocol.total_supply);
            stats.total_historical_reward = protocol.total_historical_reward;
            stats.circulating_supply =
                circulating_supply(protocol.total_supply, data.holder_balances());
        }

        let (deposits_usd, interest_usd) = self.price_pools(&data).await;
        stats.total_deposits_usd = deposits_usd;
        stats.total_interest_usd = interest_usd;

        Ok(stats)
    }

    /// Sum USD deposit and interest totals across the pool records; the
    /// protocol fee is applied once, to the summed interest.
    ///
    /// Each distinct asset is priced at most once per cycle; an unavailable
    /// price is cached as zero so it is not retried within the cycle.
    async fn price_pools(&self, data: &StatsQueryData) -> (Decimal, Decimal) {
        let mut cache: HashMap<Address, Decimal> = HashMap::new();
        let mut deposits_usd = Decimal::ZERO;
        let mut interest_usd = Decimal::ZERO;

        for pool in data.pools.as_deref().unwrap_or_default() {
            let price = match cache.get(&pool.asset) {
                Some(price) => *price,
                None => {
                    let price = match self.prices.token_price_usd(&pool.asset).await {
                        Ok(price) => price,
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                asset = %pool.asset,
                                pool = %pool.id,
                                "asset price unavailable"
                            );
                            Decimal::ZERO
                        }
                    };
                    cache.insert(pool.asset.clone(), price);
                    price
                }
            };

            deposits_usd += pool.total_deposits * price;
            interest_usd += pool.total_interest_paid * price;
        }

        (deposits_usd, self.prices.apply_interest_fee(interest_usd))
    }
}
