//! Integration tests for the farming and stats aggregators.
//!
//! Every collaborator is replaced by an in-memory fake so the full load
//! cycle runs without a node, price API or indexer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use tokio::sync::{broadcast, Notify};

use stakedash::chain::contracts::{
    Erc20Reader, FarmingReader, LiquidityMiningReader, PoolAllocation, UserStake,
};
use stakedash::chain::Address;
use stakedash::error::{Error, Result};
use stakedash::farming::aggregator::{FarmingAggregator, FarmingParams};
use stakedash::indexer::client::{
    IndexerClient, PoolRecord, ProtocolRecord, StatsQueryData, TrackedHolders,
};
use stakedash::prices::helper::PriceHelper;
use stakedash::stats::aggregator::{StatsAggregator, StatsParams};
use stakedash::utils::math::after_fee_bps;
use stakedash::wallet::session::{TxCall, TxCallbacks, WalletEvent, WalletService};

/// 10^18, the fixed-point scale of raw contract values
const PREC: u128 = 1_000_000_000_000_000_000;

fn addr(last: &str) -> Address {
    Address::parse(&format!("0x{:0>40}", last)).unwrap()
}

fn dec(v: u64) -> Decimal {
    Decimal::from(v)
}

// ═══════════════════════════════════════════════════════════════════════════════
// MOCK COLLABORATORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
struct MockFarming {
    total_staked: u128,
    reward_rate: u128,
    period_finish: u64,
    balance: u128,
    earned: u128,
    fail: Arc<AtomicBool>,
}

impl MockFarming {
    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Transport {
                endpoint: "mock".into(),
                details: "connection refused".into(),
            });
        }
        Ok(())
    }
}

impl FarmingReader for MockFarming {
    async fn total_staked(&self) -> Result<u128> {
        self.check()?;
        Ok(self.total_staked)
    }

    async fn reward_rate(&self) -> Result<u128> {
        self.check()?;
        Ok(self.reward_rate)
    }

    async fn period_finish(&self) -> Result<u64> {
        self.check()?;
        Ok(self.period_finish)
    }

    async fn balance_of(&self, _account: &Address) -> Result<u128> {
        self.check()?;
        Ok(self.balance)
    }

    async fn earned(&self, _account: &Address) -> Result<u128> {
        self.check()?;
        Ok(self.earned)
    }
}

/// Farming reader whose `periodFinish` read can be held at an await point,
/// keeping a load in flight while the test drives other loads to completion.
/// The staked total is read live so loads started at different times observe
/// different figures.
struct GatedFarming {
    staked: Arc<AtomicU64>,
    gate: Arc<Notify>,
    gated: Arc<AtomicBool>,
}

impl FarmingReader for GatedFarming {
    async fn total_staked(&self) -> Result<u128> {
        Ok(self.staked.load(Ordering::SeqCst) as u128 * PREC)
    }

    async fn reward_rate(&self) -> Result<u128> {
        Ok(10 * PREC)
    }

    async fn period_finish(&self) -> Result<u64> {
        if self.gated.swap(false, Ordering::SeqCst) {
            self.gate.notified().await;
        }
        Ok(1_700_000_000)
    }

    async fn balance_of(&self, _account: &Address) -> Result<u128> {
        Ok(0)
    }

    async fn earned(&self, _account: &Address) -> Result<u128> {
        Ok(0)
    }
}

#[derive(Clone)]
struct MockLiquidityMining {
    alloc_point: u128,
    total_alloc_point: u128,
    reward_per_block: u128,
    stake: u128,
    pending: u128,
}

impl LiquidityMiningReader for MockLiquidityMining {
    async fn pool_allocation(&self, _pool_id: u64) -> Result<PoolAllocation> {
        Ok(PoolAllocation {
            alloc_point: self.alloc_point,
        })
    }

    async fn reward_per_block(&self) -> Result<u128> {
        Ok(self.reward_per_block)
    }

    async fn total_alloc_point(&self) -> Result<u128> {
        Ok(self.total_alloc_point)
    }

    async fn user_stake(&self, _pool_id: u64, _account: &Address) -> Result<UserStake> {
        Ok(UserStake { amount: self.stake })
    }

    async fn pending_reward(&self, _pool_id: u64, _account: &Address) -> Result<u128> {
        Ok(self.pending)
    }
}

#[derive(Clone)]
struct MockErc20 {
    balance: u128,
}

impl Erc20Reader for MockErc20 {
    async fn balance_of(&self, _holder: &Address) -> Result<u128> {
        Ok(self.balance)
    }

    async fn total_supply(&self) -> Result<u128> {
        Ok(0)
    }
}

/// Price helper with fixed quotes and a per-token call counter
#[derive(Clone, Default)]
struct MockPrices {
    prices: HashMap<Address, Decimal>,
    lp_prices: HashMap<Address, Decimal>,
    calls: Arc<Mutex<HashMap<Address, usize>>>,
}

impl MockPrices {
    fn calls_for(&self, token: &Address) -> usize {
        self.calls.lock().unwrap().get(token).copied().unwrap_or(0)
    }
}

impl PriceHelper for MockPrices {
    async fn token_price_usd(&self, token: &Address) -> Result<Decimal> {
        *self.calls.lock().unwrap().entry(token.clone()).or_insert(0) += 1;
        self.prices
            .get(token)
            .copied()
            .ok_or_else(|| Error::PriceUnavailable(token.to_string()))
    }

    async fn lp_token_price_usd(&self, lp_token: &Address) -> Result<Decimal> {
        self.lp_prices
            .get(lp_token)
            .copied()
            .ok_or_else(|| Error::PriceUnavailable(lp_token.to_string()))
    }

    fn apply_interest_fee(&self, interest: Decimal) -> Decimal {
        after_fee_bps(interest, 1_000)
    }
}

/// Wallet whose submissions always fail, recording every displayed error
struct MockWallet {
    address: Option<Address>,
    events: broadcast::Sender<WalletEvent>,
    displayed: Mutex<Vec<u32>>,
}

impl MockWallet {
    fn connected_as(address: Address) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            address: Some(address),
            events,
            displayed: Mutex::new(Vec::new()),
        }
    }

    fn disconnected() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            address: None,
            events,
            displayed: Mutex::new(Vec::new()),
        }
    }

    fn displayed_codes(&self) -> Vec<u32> {
        self.displayed.lock().unwrap().clone()
    }
}

impl WalletService for MockWallet {
    fn connected(&self) -> bool {
        self.address.is_some()
    }

    fn user_address(&self) -> Option<Address> {
        self.address.clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    async fn send_tx(&self, _call: TxCall, callbacks: TxCallbacks) {
        (callbacks.on_failure)(Error::TxSubmission("mock rejection".into()));
    }

    fn display_generic_error(&self, error: &Error) {
        self.displayed.lock().unwrap().push(error.code());
    }
}

#[derive(Clone)]
struct MockIndexer {
    data: StatsQueryData,
    fail: Arc<AtomicBool>,
}

impl IndexerClient for MockIndexer {
    async fn fetch_stats(&self, _holders: &TrackedHolders) -> Result<StatsQueryData> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Indexer("query timed out".into()));
        }
        Ok(self.data.clone())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FARMING FIXTURE
// ═══════════════════════════════════════════════════════════════════════════════

fn farming_params() -> FarmingParams {
    FarmingParams {
        farming_address: addr("f1"),
        reward_token: addr("10"),
        farming_lp_token: addr("11"),
        liquidity_mining_address: addr("f2"),
        lm_reward_token: addr("20"),
        lm_lp_token: addr("21"),
        lm_pool_id: 3,
    }
}

/// Farming fixture:
/// - farming: 100 staked, 10/s rewards, reward token $2, LP token $5
/// - user: 25 staked, 7 claimable
/// - liquidity mining: 20/block emission over 5s blocks, pool gets 100 of
///   400 alloc points, 50 LP staked, reward token $4, LP token $2
fn farming_fixture(
    wallet: Arc<MockWallet>,
    fail: Arc<AtomicBool>,
) -> FarmingAggregator<MockFarming, MockLiquidityMining, MockErc20, MockPrices, MockWallet> {
    let farming = MockFarming {
        total_staked: 100 * PREC,
        reward_rate: 10 * PREC,
        period_finish: 1_700_000_000,
        balance: 25 * PREC,
        earned: 7 * PREC,
        fail,
    };
    let lm = MockLiquidityMining {
        alloc_point: 100,
        total_alloc_point: 400,
        reward_per_block: 20 * PREC,
        stake: 10 * PREC,
        pending: 3 * PREC,
    };
    let lm_lp = MockErc20 { balance: 50 * PREC };

    let prices = MockPrices {
        prices: HashMap::from([(addr("10"), dec(2)), (addr("20"), dec(4))]),
        lp_prices: HashMap::from([(addr("11"), dec(5)), (addr("21"), dec(2))]),
        calls: Arc::default(),
    };

    FarmingAggregator::new(farming, lm, lm_lp, prices, wallet, farming_params())
}

// ═══════════════════════════════════════════════════════════════════════════════
// FARMING TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_farming_global_metrics() {
    let wallet = Arc::new(MockWallet::disconnected());
    let aggregator = farming_fixture(wallet, Arc::default());

    aggregator.initial_load().await.unwrap();
    let pool = aggregator.pool_state().await;

    // (10 * $2) / (100 * $5) * 100 = 4%/s
    assert_eq!(pool.farming.total_staked, dec(100));
    assert_eq!(pool.farming.reward_per_unit_per_second, Decimal::new(1, 1));
    assert_eq!(pool.farming.roi.daily, dec(4) * dec(86_400));
    assert_eq!(pool.farming.roi.weekly, pool.farming.roi.daily * dec(7));
    assert_eq!(pool.farming.roi.yearly, dec(4) * dec(365 * 86_400));

    // 20/block over 5s blocks, 100 of 400 alloc points => 1/s
    assert_eq!(pool.liquidity_mining.reward_per_second, dec(1));
    // (1 * $4) / (50 * $2) * 100 = 4%/s
    assert_eq!(pool.liquidity_mining.roi.daily, dec(4) * dec(86_400));

    let window = pool.reward_window.unwrap();
    assert_eq!(window.end.timestamp(), 1_700_000_000);
    assert_eq!(window.end.timestamp() - window.start.timestamp(), 14 * 86_400);
}

#[tokio::test]
async fn test_farming_user_position() {
    let wallet = Arc::new(MockWallet::connected_as(addr("aa")));
    let aggregator = farming_fixture(Arc::clone(&wallet), Arc::default());

    aggregator.initial_load().await.unwrap();
    let position = aggregator.position().await;

    assert_eq!(position.farming.staked, dec(25));
    assert_eq!(position.farming.pool_share_pct, dec(25));
    assert_eq!(position.farming.claimable, dec(7));
    // 25 * (10/100)/s over a day
    assert_eq!(position.farming.reward_per_day, dec(25) * Decimal::new(1, 1) * dec(86_400));

    // 10 of 50 LP staked
    assert_eq!(position.liquidity_mining.pool_share_pct, dec(20));
    assert_eq!(position.liquidity_mining.claimable, dec(3));
}

#[tokio::test]
async fn test_farming_zero_staked_is_all_zero() {
    let wallet = Arc::new(MockWallet::connected_as(addr("aa")));
    let farming = MockFarming {
        total_staked: 0,
        reward_rate: 10 * PREC,
        period_finish: 0,
        balance: 0,
        earned: 0,
        fail: Arc::default(),
    };
    let lm = MockLiquidityMining {
        alloc_point: 100,
        total_alloc_point: 0,
        reward_per_block: 20 * PREC,
        stake: 0,
        pending: 0,
    };
    let prices = MockPrices {
        prices: HashMap::from([(addr("10"), dec(2)), (addr("20"), dec(4))]),
        lp_prices: HashMap::from([(addr("11"), dec(5)), (addr("21"), dec(2))]),
        calls: Arc::default(),
    };
    let aggregator = FarmingAggregator::new(
        farming,
        lm,
        MockErc20 { balance: 0 },
        prices,
        Arc::clone(&wallet),
        farming_params(),
    );

    aggregator.initial_load().await.unwrap();
    let pool = aggregator.pool_state().await;
    let position = aggregator.position().await;

    assert_eq!(pool.farming.reward_per_unit_per_second, Decimal::ZERO);
    assert_eq!(pool.farming.roi.yearly, Decimal::ZERO);
    // zero total alloc points suppresses the emission entirely
    assert_eq!(pool.liquidity_mining.reward_per_second, Decimal::ZERO);
    assert!(pool.reward_window.is_none());
    assert_eq!(position.farming.pool_share_pct, Decimal::ZERO);
}

#[tokio::test]
async fn test_disconnect_resets_user_scope_only() {
    let wallet = Arc::new(MockWallet::connected_as(addr("aa")));
    let aggregator = farming_fixture(Arc::clone(&wallet), Arc::default());

    aggregator.initial_load().await.unwrap();
    assert_eq!(aggregator.position().await.farming.staked, dec(25));

    aggregator.on_disconnected().await;

    let position = aggregator.position().await;
    let pool = aggregator.pool_state().await;
    assert_eq!(position.farming.staked, Decimal::ZERO);
    assert_eq!(position.liquidity_mining.claimable, Decimal::ZERO);
    // global figures survive the disconnect
    assert_eq!(pool.farming.total_staked, dec(100));
}

#[tokio::test]
async fn test_superseded_load_is_discarded() {
    let wallet = Arc::new(MockWallet::disconnected());
    let aggregator = farming_fixture(wallet, Arc::default());

    let stale_token = aggregator.begin_load();
    let fresh_token = aggregator.begin_load();

    // the older cycle finishes after the newer one began
    assert!(!aggregator.load_global(stale_token).await.unwrap());
    assert_eq!(aggregator.pool_state().await.farming.total_staked, Decimal::ZERO);

    assert!(aggregator.load_global(fresh_token).await.unwrap());
    assert_eq!(aggregator.pool_state().await.farming.total_staked, dec(100));
}

#[tokio::test]
async fn test_stale_commit_cannot_overwrite_newer_snapshot() {
    let staked = Arc::new(AtomicU64::new(100));
    let gate = Arc::new(Notify::new());
    let farming = GatedFarming {
        staked: Arc::clone(&staked),
        gate: Arc::clone(&gate),
        gated: Arc::new(AtomicBool::new(true)),
    };
    let lm = MockLiquidityMining {
        alloc_point: 100,
        total_alloc_point: 400,
        reward_per_block: 20 * PREC,
        stake: 0,
        pending: 0,
    };
    let prices = MockPrices {
        prices: HashMap::from([(addr("10"), dec(2)), (addr("20"), dec(4))]),
        lp_prices: HashMap::from([(addr("11"), dec(5)), (addr("21"), dec(2))]),
        calls: Arc::default(),
    };
    let wallet = Arc::new(MockWallet::disconnected());
    let aggregator = FarmingAggregator::new(
        farming,
        lm,
        MockErc20 { balance: 50 * PREC },
        prices,
        wallet,
        farming_params(),
    );

    // the stale load observes 100 staked, then parks at the gate while a
    // newer cycle begins, observes 42 and commits; the stale load is only
    // released afterwards and must not overwrite the fresher snapshot
    let stale_token = aggregator.begin_load();
    let (stale_result, ()) = tokio::join!(aggregator.load_global(stale_token), async {
        staked.store(42, Ordering::SeqCst);
        let fresh_token = aggregator.begin_load();
        assert!(aggregator.load_global(fresh_token).await.unwrap());
        gate.notify_one();
    });

    assert!(!stale_result.unwrap());
    assert_eq!(aggregator.pool_state().await.farming.total_staked, dec(42));
}

#[tokio::test]
async fn test_failed_load_keeps_snapshot_and_marks_stale() {
    let wallet = Arc::new(MockWallet::disconnected());
    let fail = Arc::new(AtomicBool::new(false));
    let aggregator = farming_fixture(wallet, Arc::clone(&fail));

    let token = aggregator.begin_load();
    aggregator.load_global(token).await.unwrap();
    assert!(!aggregator.global_meta().await.stale);

    fail.store(true, Ordering::SeqCst);
    let token = aggregator.begin_load();
    assert!(aggregator.load_global(token).await.is_err());

    // previous snapshot survives, flagged stale
    let meta = aggregator.global_meta().await;
    assert!(meta.stale);
    assert!(meta.last_success.is_some());
    assert_eq!(aggregator.pool_state().await.farming.total_staked, dec(100));
}

#[tokio::test]
async fn test_refresh_without_wallet_is_an_error() {
    let wallet = Arc::new(MockWallet::disconnected());
    let aggregator = farming_fixture(wallet, Arc::default());

    let result = aggregator.refresh(true, false).await;
    assert_eq!(result.unwrap_err(), Error::WalletDisconnected);
}

#[tokio::test]
async fn test_exit_failure_routed_to_error_display() {
    let wallet = Arc::new(MockWallet::connected_as(addr("aa")));
    let aggregator = farming_fixture(Arc::clone(&wallet), Arc::default());

    aggregator.exit().await;
    aggregator.claim().await;

    let codes = wallet.displayed_codes();
    assert_eq!(codes, vec![4001, 4001]);
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATS FIXTURE
// ═══════════════════════════════════════════════════════════════════════════════

fn holders() -> TrackedHolders {
    TrackedHolders {
        lp_pool: addr("31"),
        treasury: addr("32"),
        dev_wallet: addr("33"),
        merkle_distributor: addr("34"),
        rewards: addr("35"),
        vesting: addr("36"),
    }
}

fn holder_record(address: &Address, balance: u64) -> stakedash::indexer::client::HolderRecord {
    stakedash::indexer::client::HolderRecord {
        id: address.to_string(),
        balance: dec(balance),
    }
}

/// Stats fixture:
/// - 1,000,000 supply, 250,000 staked
/// - LP pool holds 200,000 and treasury 100,000; other holders unindexed
/// - two pools denominated in DAI, one in USDC, both priced at $1
fn stats_fixture<P: PriceHelper>(
    fail: Arc<AtomicBool>,
    prices: P,
) -> StatsAggregator<MockIndexer, P> {
    let tracked = holders();
    let data = StatsQueryData {
        pools: Some(vec![
            PoolRecord {
                id: "dai-6m".into(),
                asset: addr("d1"),
                total_deposits: dec(1_000),
                total_interest_paid: dec(100),
            },
            PoolRecord {
                id: "dai-12m".into(),
                asset: addr("d1"),
                total_deposits: dec(500),
                total_interest_paid: dec(50),
            },
            PoolRecord {
                id: "usdc-6m".into(),
                asset: addr("c1"),
                total_deposits: dec(2_000),
                total_interest_paid: dec(0),
            },
        ]),
        protocol: Some(ProtocolRecord {
            id: "0".into(),
            total_supply: dec(1_000_000),
            total_staked: dec(250_000),
            total_historical_reward: dec(5_000),
            reward_per_unit_per_second: Decimal::new(1, 4),
        }),
        lp_pool: Some(holder_record(&tracked.lp_pool, 200_000)),
        treasury: Some(holder_record(&tracked.treasury, 100_000)),
        dev_wallet: None,
        merkle_distributor: None,
        rewards: None,
        vesting: None,
    };

    let indexer = MockIndexer { data, fail };
    StatsAggregator::new(
        indexer,
        prices,
        StatsParams {
            reward_token: addr("10"),
            holders: tracked,
        },
    )
}

/// Price helper charging a flat fee on interest instead of a proportional
/// one; distinguishes fee-on-total from fee-per-pool
#[derive(Clone)]
struct FlatFeePrices(MockPrices);

impl PriceHelper for FlatFeePrices {
    async fn token_price_usd(&self, token: &Address) -> Result<Decimal> {
        self.0.token_price_usd(token).await
    }

    async fn lp_token_price_usd(&self, lp_token: &Address) -> Result<Decimal> {
        self.0.lp_token_price_usd(lp_token).await
    }

    fn apply_interest_fee(&self, interest: Decimal) -> Decimal {
        (interest - dec(10)).max(Decimal::ZERO)
    }
}

fn stats_prices() -> MockPrices {
    MockPrices {
        prices: HashMap::from([
            (addr("10"), Decimal::new(2452, 2)),
            (addr("d1"), dec(1)),
            (addr("c1"), dec(1)),
        ]),
        lp_prices: HashMap::new(),
        calls: Arc::default(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATS TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_stats_totals() {
    let aggregator = stats_fixture(Arc::default(), stats_prices());

    aggregator.refresh().await.unwrap();
    let stats = aggregator.stats().await;

    assert_eq!(stats.total_supply, dec(1_000_000));
    // absent holder records are skipped, not treated as zero-balance
    assert_eq!(stats.circulating_supply, dec(700_000));
    assert_eq!(stats.staked_pct, dec(25));
    assert_eq!(stats.total_historical_reward, dec(5_000));
    assert_eq!(stats.reward_token_price_usd, Decimal::new(2452, 2));

    // 1000 + 500 + 2000, all at $1
    assert_eq!(stats.total_deposits_usd, dec(3_500));
    // (100 + 50) net of the 10% fee
    assert_eq!(stats.total_interest_usd, dec(135));
}

#[tokio::test]
async fn test_stats_interest_fee_applied_to_summed_total() {
    let aggregator = stats_fixture(Arc::default(), FlatFeePrices(stats_prices()));

    aggregator.refresh().await.unwrap();
    let stats = aggregator.stats().await;

    // the flat $10 fee hits the summed 150 USD once, not each pool's share:
    // 150 - 10 = 140, not (100 - 10) + (50 - 10) + (0 - 10 floored) = 130
    assert_eq!(stats.total_interest_usd, dec(140));
}

#[tokio::test]
async fn test_stats_prices_each_asset_once() {
    let prices = stats_prices();
    let aggregator = stats_fixture(Arc::default(), prices.clone());

    aggregator.refresh().await.unwrap();

    // two DAI pools share one lookup
    assert_eq!(prices.calls_for(&addr("d1")), 1);
    assert_eq!(prices.calls_for(&addr("c1")), 1);
    assert_eq!(prices.calls_for(&addr("10")), 1);
}

#[tokio::test]
async fn test_stats_missing_price_degrades_to_zero() {
    // no quote for USDC or the reward token
    let prices = MockPrices {
        prices: HashMap::from([(addr("d1"), dec(1))]),
        lp_prices: HashMap::new(),
        calls: Arc::default(),
    };
    let aggregator = stats_fixture(Arc::default(), prices);

    aggregator.refresh().await.unwrap();
    let stats = aggregator.stats().await;

    // the unpriced pool contributes nothing; the cycle still commits
    assert_eq!(stats.total_deposits_usd, dec(1_500));
    assert_eq!(stats.reward_token_price_usd, Decimal::ZERO);
    assert!(!aggregator.meta().await.stale);
}

#[tokio::test]
async fn test_stats_indexer_failure_keeps_snapshot() {
    let fail = Arc::new(AtomicBool::new(false));
    let aggregator = stats_fixture(Arc::clone(&fail), stats_prices());

    aggregator.refresh().await.unwrap();
    assert_eq!(aggregator.stats().await.total_supply, dec(1_000_000));

    fail.store(true, Ordering::SeqCst);
    let token = aggregator.begin_load();
    let err = aggregator.load(token).await.unwrap_err();
    assert!(err.is_recoverable());

    // previous snapshot survives, flagged stale
    assert!(aggregator.meta().await.stale);
    assert_eq!(aggregator.stats().await.total_supply, dec(1_000_000));
}

#[tokio::test]
async fn test_stats_superseded_load_is_discarded() {
    let aggregator = stats_fixture(Arc::default(), stats_prices());

    let stale_token = aggregator.begin_load();
    let fresh_token = aggregator.begin_load();

    assert!(!aggregator.load(stale_token).await.unwrap());
    assert_eq!(aggregator.stats().await.total_supply, Decimal::ZERO);

    assert!(aggregator.load(fresh_token).await.unwrap());
    assert_eq!(aggregator.stats().await.total_supply, dec(1_000_000));
}
