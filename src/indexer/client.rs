//! Indexed-data query service.
//!
//! One fixed, parameterized query fetches everything the stats screen needs:
//! per-pool aggregate deposit/interest totals with each pool's denominating
//! asset, the global protocol counters, and the token balances of the fixed
//! set of tracked non-circulating holders. No pagination, no incremental
//! sync; the query runs once per load cycle.

use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chain::Address;
use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// TRACKED HOLDERS
// ═══════════════════════════════════════════════════════════════════════════════

/// The fixed set of protocol-controlled addresses whose balances are excluded
/// from circulating supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedHolders {
    /// Liquidity/reward pool contract
    pub lp_pool: Address,
    /// Governance treasury
    pub treasury: Address,
    /// Developer wallet
    pub dev_wallet: Address,
    /// Merkle distribution contract
    pub merkle_distributor: Address,
    /// Rewards contract
    pub rewards: Address,
    /// Vesting contract
    pub vesting: Address,
}

// ═══════════════════════════════════════════════════════════════════════════════
// QUERY TEMPLATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Build the stats query, parameterized with the tracked holder addresses.
///
/// Addresses are interpolated lowercase because indexer record IDs are
/// lowercase; [`Address`] already canonicalizes at parse time.
pub fn stats_query(holders: &TrackedHolders) -> String {
    format!(
        r#"{{
  pools {{
    id
    asset
    totalDeposits
    totalInterestPaid
  }}
  protocol(id: "0") {{
    id
    totalSupply
    totalStaked
    totalHistoricalReward
    rewardPerUnitPerSecond
  }}
  lpPool: holder(id: "{lp_pool}") {{
    id
    balance
  }}
  treasury: holder(id: "{treasury}") {{
    id
    balance
  }}
  devWallet: holder(id: "{dev_wallet}") {{
    id
    balance
  }}
  merkleDistributor: holder(id: "{merkle_distributor}") {{
    id
    balance
  }}
  rewards: holder(id: "{rewards}") {{
    id
    balance
  }}
  vesting: holder(id: "{vesting}") {{
    id
    balance
  }}
}}"#,
        lp_pool = holders.lp_pool,
        treasury = holders.treasury,
        dev_wallet = holders.dev_wallet,
        merkle_distributor = holders.merkle_distributor,
        rewards = holders.rewards,
        vesting = holders.vesting,
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESPONSE RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Aggregate totals for one deposit pool
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
    /// Pool identifier
    pub id: String,
    /// Address of the pool's denominating asset
    pub asset: Address,
    /// Total active deposits, decimal token units
    pub total_deposits: Decimal,
    /// Total interest paid out, decimal token units
    pub total_interest_paid: Decimal,
}

/// Global protocol counters
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolRecord {
    /// Record identifier (always `"0"`)
    pub id: String,
    /// Total token supply
    pub total_supply: Decimal,
    /// Total staked balance
    pub total_staked: Decimal,
    /// Historical reward total
    pub total_historical_reward: Decimal,
    /// Reward per staked unit per second
    pub reward_per_unit_per_second: Decimal,
}

/// Token balance of one tracked holder
#[derive(Debug, Clone, Deserialize)]
pub struct HolderRecord {
    /// Holder address (record ID)
    pub id: String,
    /// Token balance, decimal units
    pub balance: Decimal,
}

/// The full stats query result.
///
/// Every field is optional: the indexer returns `null` for a holder with no
/// record, and callers must skip those rather than treat them as zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQueryData {
    /// Per-pool aggregate totals
    pub pools: Option<Vec<PoolRecord>>,
    /// Global counters
    pub protocol: Option<ProtocolRecord>,
    /// Liquidity/reward pool balance
    pub lp_pool: Option<HolderRecord>,
    /// Treasury balance
    pub treasury: Option<HolderRecord>,
    /// Dev wallet balance
    pub dev_wallet: Option<HolderRecord>,
    /// Merkle distributor balance
    pub merkle_distributor: Option<HolderRecord>,
    /// Rewards contract balance
    pub rewards: Option<HolderRecord>,
    /// Vesting contract balance
    pub vesting: Option<HolderRecord>,
}

impl StatsQueryData {
    /// Balances of every tracked holder, in a fixed order, `None` where the
    /// indexer had no record.
    pub fn holder_balances(&self) -> [Option<Decimal>; 6] {
        [
            self.lp_pool.as_ref().map(|h| h.balance),
            self.treasury.as_ref().map(|h| h.balance),
            self.dev_wallet.as_ref().map(|h| h.balance),
            self.merkle_distributor.as_ref().map(|h| h.balance),
            self.rewards.as_ref().map(|h| h.balance),
            self.vesting.as_ref().map(|h| h.balance),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    data: Option<StatsQueryData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLIENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Indexed-data query collaborator consumed by the stats aggregator
pub trait IndexerClient {
    /// Execute the stats query
    fn fetch_stats(
        &self,
        holders: &TrackedHolders,
    ) -> impl std::future::Future<Output = Result<StatsQueryData>>;
}

/// HTTP GraphQL client for the indexing service
pub struct HttpIndexerClient {
    client: Client,
    url: String,
}

impl HttpIndexerClient {
    /// Create a client for the given GraphQL endpoint
    pub fn new(url: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(format!("{}/{}", crate::SERVICE_NAME, crate::VERSION))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, url })
    }
}

impl IndexerClient for HttpIndexerClient {
    async fn fetch_stats(&self, holders: &TrackedHolders) -> Result<StatsQueryData> {
        let body = serde_json::json!({ "query": stats_query(holders) });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport {
                endpoint: self.url.clone(),
                details: format!("indexer request failed: {}", e),
            })?;

        let envelope: GraphQlEnvelope = response.json().await.map_err(|e| Error::Transport {
            endpoint: self.url.clone(),
            details: format!("failed to parse indexer response: {}", e),
        })?;

        if let Some(errors) = envelope.errors {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::Indexer(messages.join("; ")));
        }

        envelope
            .data
            .ok_or_else(|| Error::Indexer("empty response data".into()))
    }
}
