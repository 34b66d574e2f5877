//! Farming dashboard aggregator.
//!
//! Orchestrates the concurrent reads behind the farming screen and derives
//! every displayed metric through [`crate::utils::math`]. The user-scoped and
//! global-scoped load paths are gated independently so a wallet
//! connect/disconnect transition can refresh only what it invalidates, and
//! each path owns its own reset.
//!
//! Every load cycle carries an epoch token from [`FarmingAggregator::begin_load`];
//! a load that finishes after a newer cycle began discards its snapshot
//! instead of committing, which closes the last-write-wins race between
//! overlapping loads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::DateTime;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::chain::abi::{self, selectors};
use crate::chain::contracts::{Erc20Reader, FarmingReader, LiquidityMiningReader};
use crate::chain::Address;
use crate::error::{Error, Result};
use crate::farming::snapshot::{PoolState, Position, PositionSide, RewardWindow, VenueState};
use crate::prices::helper::PriceHelper;
use crate::utils::constants::{LM_SECONDS_PER_BLOCK, REWARD_PERIOD_DAYS};
use crate::utils::math::{
    self, daily_reward, per_unit_rate, percentage_of, roi_per_second, RoiHorizons,
};
use crate::utils::SnapshotMeta;
use crate::wallet::session::{TxCall, TxCallbacks, WalletService};

// ═══════════════════════════════════════════════════════════════════════════════
// PARAMETERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Deployment parameters for the farming screen
#[derive(Debug, Clone)]
pub struct FarmingParams {
    /// The farming reward contract (target of exit/claim transactions)
    pub farming_address: Address,
    /// Reward token of the farming contract
    pub reward_token: Address,
    /// LP token staked in the farming contract
    pub farming_lp_token: Address,
    /// The external liquidity-mining program
    pub liquidity_mining_address: Address,
    /// Reward token of the liquidity-mining program
    pub lm_reward_token: Address,
    /// LP token staked in the liquidity-mining pool
    pub lm_lp_token: Address,
    /// Pool identifier within the liquidity-mining program
    pub lm_pool_id: u64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// AGGREGATOR
// ═══════════════════════════════════════════════════════════════════════════════

/// Farming dashboard aggregator.
///
/// Generic over its collaborators so tests can substitute in-memory fakes for
/// the chain readers, price helper and wallet session.
pub struct FarmingAggregator<F, M, T, P, W> {
    farming: F,
    liquidity_mining: M,
    lm_lp_token: T,
    prices: P,
    wallet: Arc<W>,
    params: FarmingParams,
    epoch: AtomicU64,
    user: RwLock<Position>,
    user_meta: RwLock<SnapshotMeta>,
    global: RwLock<PoolState>,
    global_meta: RwLock<SnapshotMeta>,
}

impl<F, M, T, P, W> FarmingAggregator<F, M, T, P, W>
where
    F: FarmingReader,
    M: LiquidityMiningReader,
    T: Erc20Reader,
    P: PriceHelper,
    W: WalletService + Send + Sync + 'static,
{
    /// Create an aggregator with zeroed snapshots
    pub fn new(
        farming: F,
        liquidity_mining: M,
        lm_lp_token: T,
        prices: P,
        wallet: Arc<W>,
        params: FarmingParams,
    ) -> Self {
        Self {
            farming,
            liquidity_mining,
            lm_lp_token,
            prices,
            wallet,
            params,
            epoch: AtomicU64::new(0),
            user: RwLock::new(Position::zeroed()),
            user_meta: RwLock::new(SnapshotMeta::default()),
            global: RwLock::new(PoolState::zeroed()),
            global_meta: RwLock::new(SnapshotMeta::default()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SNAPSHOT ACCESS
    // ═══════════════════════════════════════════════════════════════════════

    /// The latest committed user-scoped snapshot
    pub async fn position(&self) -> Position {
        *self.user.read().await
    }

    /// The latest committed global-scoped snapshot
    pub async fn pool_state(&self) -> PoolState {
        *self.global.read().await
    }

    /// Freshness of the user-scoped snapshot
    pub async fn user_meta(&self) -> SnapshotMeta {
        *self.user_meta.read().await
    }

    /// Freshness of the global-scoped snapshot
    pub async fn global_meta(&self) -> SnapshotMeta {
        *self.global_meta.read().await
    }

    // ═══════════════════════════════════════════════════════════════════════
    // EPOCHS AND RESETS
    // ═══════════════════════════════════════════════════════════════════════

    /// Start a new load cycle, superseding any still in flight
    pub fn begin_load(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == token
    }

    /// Zero the user-scoped snapshot; global fields are untouched
    pub async fn reset_user(&self) {
        *self.user.write().await = Position::zeroed();
        *self.user_meta.write().await = SnapshotMeta::default();
    }

    /// Zero the global-scoped snapshot; user fields are untouched
    pub async fn reset_global(&self) {
        *self.global.write().await = PoolState::zeroed();
        *self.global_meta.write().await = SnapshotMeta::default();
    }

    // ═══════════════════════════════════════════════════════════════════════
    // LOAD PATHS
    // ═══════════════════════════════════════════════════════════════════════

    /// Load the global-scoped snapshot.
    ///
    /// Returns `Ok(true)` if the snapshot committed, `Ok(false)` if the load
    /// was superseded before it finished. On error the previous snapshot
    /// stays in place and is marked stale.
    pub async fn load_global(&self, token: u64) -> Result<bool> {
        match self.build_global().await {
            Ok(state) => {
                // the token check must happen under the write lock, or a
                // superseded load could pass it and then commit after a
                // newer load already has
                let mut slot = self.global.write().await;
                if !self.is_current(token) {
                    tracing::debug!(token, "discarding superseded global load");
                    return Ok(false);
                }
                *slot = state;
                self.global_meta.write().await.committed();
                Ok(true)
            }
            Err(e) => {
                self.global_meta.write().await.failed();
                tracing::warn!(error = %e, "global farming load failed");
                Err(e)
            }
        }
    }

    /// Load the user-scoped snapshot for `account`.
    ///
    /// Derivations use the latest committed global snapshot, so callers
    /// refreshing both scopes should load global first.
    pub async fn load_user(&self, account: &Address, token: u64) -> Result<bool> {
        match self.build_user(account).await {
            Ok(position) => {
                let mut slot = self.user.write().await;
                if !self.is_current(token) {
                    tracing::debug!(token, "discarding superseded user load");
                    return Ok(false);
                }
                *slot = position;
                self.user_meta.write().await.committed();
                Ok(true)
            }
            Err(e) => {
                self.user_meta.write().await.failed();
                tracing::warn!(error = %e, account = %account, "user farming load failed");
                Err(e)
            }
        }
    }

    async fn build_global(&self) -> Result<PoolState> {
        // farming contract reads
        let (total_staked, reward_rate, period_finish) = tokio::join!(
            self.farming.total_staked(),
            self.farming.reward_rate(),
            self.farming.period_finish(),
        );
        let total_staked = math::normalize(total_staked?)?;
        let reward_rate = math::normalize(reward_rate?)?;
        let period_finish = period_finish?;

        let (token_price, lp_price) = tokio::join!(
            self.prices.token_price_usd(&self.params.reward_token),
            self.prices.lp_token_price_usd(&self.params.farming_lp_token),
        );
        let token_price = token_price?;
        let lp_price = lp_price?;

        let farming = VenueState {
            total_staked,
            reward_per_second: reward_rate,
            reward_per_unit_per_second: per_unit_rate(reward_rate, total_staked),
            reward_token_price_usd: token_price,
            lp_token_price_usd: lp_price,
            roi: RoiHorizons::from_per_second(roi_per_second(
                reward_rate,
                token_price,
                total_staked,
                lp_price,
            )),
        };

        // liquidity-mining program reads
        let (allocation, per_block, total_alloc, lm_staked) = tokio::join!(
            self.liquidity_mining.pool_allocation(self.params.lm_pool_id),
            self.liquidity_mining.reward_per_block(),
            self.liquidity_mining.total_alloc_point(),
            self.lm_lp_token.balance_of(&self.params.liquidity_mining_address),
        );
        let allocation = allocation?;
        let per_block = math::normalize(per_block?)?;
        let total_alloc = total_alloc?;
        let lm_staked = math::normalize(lm_staked?)?;

        // pool's slice of the program-wide per-second emission
        let lm_reward_rate = if total_alloc == 0 {
            Decimal::ZERO
        } else {
            let alloc = Decimal::from_u128(allocation.alloc_point).ok_or(Error::Overflow {
                operation: "allocPoint".into(),
            })?;
            let total = Decimal::from_u128(total_alloc).ok_or(Error::Overflow {
                operation: "totalAllocPoint".into(),
            })?;
            per_block / Decimal::from(LM_SECONDS_PER_BLOCK) * alloc / total
        };

        let (lm_token_price, lm_lp_price) = tokio::join!(
            self.prices.token_price_usd(&self.params.lm_reward_token),
            self.prices.lp_token_price_usd(&self.params.lm_lp_token),
        );
        let lm_token_price = lm_token_price?;
        let lm_lp_price = lm_lp_price?;

        let liquidity_mining = VenueState {
            total_staked: lm_staked,
            reward_per_second: lm_reward_rate,
            reward_per_unit_per_second: per_unit_rate(lm_reward_rate, lm_staked),
            reward_token_price_usd: lm_token_price,
            lp_token_price_usd: lm_lp_price,
            roi: RoiHorizons::from_per_second(roi_per_second(
                lm_reward_rate,
                lm_token_price,
                lm_staked,
                lm_lp_price,
            )),
        };

        let reward_window = reward_window_from_finish(period_finish);

        Ok(PoolState {
            farming,
            liquidity_mining,
            reward_window,
        })
    }

    async fn build_user(&self, account: &Address) -> Result<Position> {
        let pool = *self.global.read().await;

        let (staked, claimable) = tokio::join!(
            self.farming.balance_of(account),
            self.farming.earned(account),
        );
        let staked = math::normalize(staked?)?;
        let claimable = math::normalize(claimable?)?;

        let farming = PositionSide {
            staked,
            pool_share_pct: percentage_of(staked, pool.farming.total_staked),
            claimable,
            reward_per_day: daily_reward(staked, pool.farming.reward_per_unit_per_second),
        };

        let (lm_stake, lm_pending) = tokio::join!(
            self.liquidity_mining
                .user_stake(self.params.lm_pool_id, account),
            self.liquidity_mining
                .pending_reward(self.params.lm_pool_id, account),
        );
        let lm_staked = math::normalize(lm_stake?.amount)?;
        let lm_claimable = math::normalize(lm_pending?)?;

        let liquidity_mining = PositionSide {
            staked: lm_staked,
            pool_share_pct: percentage_of(lm_staked, pool.liquidity_mining.total_staked),
            claimable: lm_claimable,
            reward_per_day: daily_reward(
                lm_staked,
                pool.liquidity_mining.reward_per_unit_per_second,
            ),
        };

        Ok(Position {
            farming,
            liquidity_mining,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ORCHESTRATION
    // ═══════════════════════════════════════════════════════════════════════

    /// One full refresh with independently gated paths.
    ///
    /// Resets run before the loads so stale cross-account data is never
    /// shown while reads are in flight.
    pub async fn refresh(&self, load_user: bool, load_global: bool) -> Result<()> {
        let token = self.begin_load();
        if load_user {
            self.reset_user().await;
        }
        if load_global {
            self.reset_global().await;
        }

        if load_global {
            self.load_global(token).await?;
        }
        if load_user {
            let account = self.wallet.user_address().ok_or(Error::WalletDisconnected)?;
            self.load_user(&account, token).await?;
        }
        Ok(())
    }

    /// Initial load: global always, user only if a wallet is connected
    pub async fn initial_load(&self) -> Result<()> {
        self.refresh(self.wallet.connected(), true).await
    }

    /// Wallet connected: reset and reload both scopes
    pub async fn on_connected(&self) -> Result<()> {
        self.refresh(true, true).await
    }

    /// Wallet disconnected: clear the user scope, keep global figures
    pub async fn on_disconnected(&self) {
        self.begin_load();
        self.reset_user().await;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // TRANSACTIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Submit an exit transaction (unstake everything and claim).
    ///
    /// Failure is surfaced through the wallet's generic error display; there
    /// is no retry.
    pub async fn exit(&self) {
        let call = TxCall {
            to: self.params.farming_address.clone(),
            data: abi::encode_call(selectors::EXIT, &[]),
            description: "exit: unstake and claim".into(),
        };
        self.submit(call).await;
    }

    /// Submit a claim-only transaction.
    pub async fn claim(&self) {
        let call = TxCall {
            to: self.params.farming_address.clone(),
            data: abi::encode_call(selectors::GET_REWARD, &[]),
            description: "claim rewards".into(),
        };
        self.submit(call).await;
    }

    async fn submit(&self, call: TxCall) {
        let wallet = Arc::clone(&self.wallet);
        let callbacks =
            TxCallbacks::noop().on_failure(move |e| wallet.display_generic_error(&e));
        self.wallet.send_tx(call, callbacks).await;
    }
}

/// Derive the reward window from the on-chain finish timestamp.
///
/// A zero or unrepresentable finish yields no window.
fn reward_window_from_finish(period_finish: u64) -> Option<RewardWindow> {
    if period_finish == 0 {
        return None;
    }
    let end = DateTime::from_timestamp(period_finish as i64, 0)?;
    let start = end - chrono::Duration::days(REWARD_PERIOD_DAYS as i64);
    Some(RewardWindow { start, end })
}
