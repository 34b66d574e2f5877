//! Typed contract access.
//!
//! The aggregators only see the reader traits; the JSON-RPC implementations
//! here encode the call, run it through the read-only provider and decode the
//! returned words. A [`ContractRegistry`] resolves deployed contracts by
//! logical name or address plus an ABI label, bound to one provider.

use std::collections::HashMap;
use std::sync::Arc;

use crate::chain::abi::{self, selectors, AbiArg};
use crate::chain::provider::ReadonlyProvider;
use crate::chain::Address;
use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// READER TRAITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Read access to the named farming reward contract
pub trait FarmingReader {
    /// Total staked balance, raw fixed-point
    fn total_staked(&self) -> impl std::future::Future<Output = Result<u128>>;
    /// Reward emission per second, raw fixed-point
    fn reward_rate(&self) -> impl std::future::Future<Output = Result<u128>>;
    /// Unix timestamp at which the current reward window ends
    fn period_finish(&self) -> impl std::future::Future<Output = Result<u64>>;
    /// Staked balance of one account, raw fixed-point
    fn balance_of(&self, account: &Address) -> impl std::future::Future<Output = Result<u128>>;
    /// Reward claimable by one account, raw fixed-point
    fn earned(&self, account: &Address) -> impl std::future::Future<Output = Result<u128>>;
}

/// Pool allocation data from the external liquidity-mining program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolAllocation {
    /// Allocation points assigned to this pool
    pub alloc_point: u128,
}

/// One user's stake in the external liquidity-mining program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStake {
    /// Staked LP amount, raw fixed-point
    pub amount: u128,
}

/// Read access to the external liquidity-mining program
pub trait LiquidityMiningReader {
    /// Allocation data for one pool
    fn pool_allocation(
        &self,
        pool_id: u64,
    ) -> impl std::future::Future<Output = Result<PoolAllocation>>;
    /// Reward emitted per block across all pools, raw fixed-point
    fn reward_per_block(&self) -> impl std::future::Future<Output = Result<u128>>;
    /// Sum of allocation points across all pools
    fn total_alloc_point(&self) -> impl std::future::Future<Output = Result<u128>>;
    /// One user's stake in one pool
    fn user_stake(
        &self,
        pool_id: u64,
        account: &Address,
    ) -> impl std::future::Future<Output = Result<UserStake>>;
    /// Reward pending for one user in one pool, raw fixed-point
    fn pending_reward(
        &self,
        pool_id: u64,
        account: &Address,
    ) -> impl std::future::Future<Output = Result<u128>>;
}

/// Read access to an ERC-20 token
pub trait Erc20Reader {
    /// Balance of one holder, raw fixed-point
    fn balance_of(&self, holder: &Address) -> impl std::future::Future<Output = Result<u128>>;
    /// Total token supply, raw fixed-point
    fn total_supply(&self) -> impl std::future::Future<Output = Result<u128>>;
}

/// Read access to a liquidity-pair contract
pub trait PairReader: Erc20Reader {
    /// The pair's two token addresses
    fn tokens(&self) -> impl std::future::Future<Output = Result<(Address, Address)>>;
    /// The pair's reserves, raw fixed-point, in token order
    fn reserves(&self) -> impl std::future::Future<Output = Result<(u128, u128)>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTRACT REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// ABI label describing which interface a deployed contract speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiLabel {
    /// Farming reward contract
    Farming,
    /// External liquidity-mining program
    LiquidityMining,
    /// Plain ERC-20 token
    Erc20,
    /// Liquidity-pair contract
    Pair,
}

/// A registered deployment
#[derive(Debug, Clone)]
pub struct ContractEntry {
    /// Deployed address
    pub address: Address,
    /// Interface the contract speaks
    pub abi: AbiLabel,
}

/// Resolves deployed contracts by logical name, bound to one read-only
/// provider.
pub struct ContractRegistry {
    provider: Arc<ReadonlyProvider>,
    entries: HashMap<String, ContractEntry>,
}

impl ContractRegistry {
    /// Create an empty registry bound to a provider
    pub fn new(provider: Arc<ReadonlyProvider>) -> Self {
        Self {
            provider,
            entries: HashMap::new(),
        }
    }

    /// Register a deployment under a logical name
    pub fn register(&mut self, name: &str, address: Address, abi: AbiLabel) {
        self.entries.insert(
            name.to_string(),
            ContractEntry { address, abi },
        );
    }

    /// Look up a registered deployment
    pub fn get_named(&self, name: &str) -> Result<&ContractEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| Error::ContractNotFound(name.to_string()))
    }

    /// Address of a registered deployment
    pub fn address_of(&self, name: &str) -> Result<Address> {
        Ok(self.get_named(name)?.address.clone())
    }

    /// Farming reader for a registered deployment
    pub fn farming(&self, name: &str) -> Result<RpcFarming> {
        let entry = self.expect_abi(name, AbiLabel::Farming)?;
        Ok(RpcFarming::new(Arc::clone(&self.provider), entry.address.clone()))
    }

    /// Liquidity-mining reader for a registered deployment
    pub fn liquidity_mining(&self, name: &str) -> Result<RpcLiquidityMining> {
        let entry = self.expect_abi(name, AbiLabel::LiquidityMining)?;
        Ok(RpcLiquidityMining::new(
            Arc::clone(&self.provider),
            entry.address.clone(),
        ))
    }

    /// ERC-20 reader bound to an arbitrary address
    pub fn erc20_at(&self, address: Address) -> RpcErc20 {
        RpcErc20::new(Arc::clone(&self.provider), address)
    }

    /// Pair reader bound to an arbitrary address
    pub fn pair_at(&self, address: Address) -> RpcPair {
        RpcPair::new(Arc::clone(&self.provider), address)
    }

    fn expect_abi(&self, name: &str, abi: AbiLabel) -> Result<&ContractEntry> {
        let entry = self.get_named(name)?;
        if entry.abi != abi {
            return Err(Error::InvalidParameter {
                name: name.to_string(),
                reason: format!("registered with ABI {:?}, requested {:?}", entry.abi, abi),
            });
        }
        Ok(entry)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON-RPC IMPLEMENTATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Farming reward contract over JSON-RPC
pub struct RpcFarming {
    provider: Arc<ReadonlyProvider>,
    address: Address,
}

impl RpcFarming {
    /// Bind to a deployed farming contract
    pub fn new(provider: Arc<ReadonlyProvider>, address: Address) -> Self {
        Self { provider, address }
    }

    /// The deployed address
    pub fn address(&self) -> &Address {
        &self.address
    }

    async fn call_uint(&self, data: String, what: &str) -> Result<u128> {
        let ret = self.provider.call(&self.address, &data).await?;
        abi::decode_uint(&ret, what)
    }
}

impl FarmingReader for RpcFarming {
    async fn total_staked(&self) -> Result<u128> {
        self.call_uint(abi::encode_call(selectors::TOTAL_SUPPLY, &[]), "totalSupply")
            .await
    }

    async fn reward_rate(&self) -> Result<u128> {
        self.call_uint(abi::encode_call(selectors::REWARD_RATE, &[]), "rewardRate")
            .await
    }

    async fn period_finish(&self) -> Result<u64> {
        let raw = self
            .call_uint(abi::encode_call(selectors::PERIOD_FINISH, &[]), "periodFinish")
            .await?;
        u64::try_from(raw).map_err(|_| Error::Overflow {
            operation: "periodFinish".into(),
        })
    }

    async fn balance_of(&self, account: &Address) -> Result<u128> {
        self.call_uint(
            abi::encode_call(selectors::BALANCE_OF, &[AbiArg::Addr(account.clone())]),
            "balanceOf",
        )
        .await
    }

    async fn earned(&self, account: &Address) -> Result<u128> {
        self.call_uint(
            abi::encode_call(selectors::EARNED, &[AbiArg::Addr(account.clone())]),
            "earned",
        )
        .await
    }
}

/// External liquidity-mining program over JSON-RPC
pub struct RpcLiquidityMining {
    provider: Arc<ReadonlyProvider>,
    address: Address,
}

impl RpcLiquidityMining {
    /// Bind to a deployed liquidity-mining program
    pub fn new(provider: Arc<ReadonlyProvider>, address: Address) -> Self {
        Self { provider, address }
    }

    /// The deployed address
    pub fn address(&self) -> &Address {
        &self.address
    }
}

impl LiquidityMiningReader for RpcLiquidityMining {
    async fn pool_allocation(&self, pool_id: u64) -> Result<PoolAllocation> {
        let data = abi::encode_call(selectors::POOL_INFO, &[AbiArg::Uint(pool_id as u128)]);
        let ret = self.provider.call(&self.address, &data).await?;
        // poolInfo returns (lpToken, allocPoint, lastRewardBlock, accRewardPerShare)
        let alloc_point = abi::decode_uint_at(&ret, "poolInfo.allocPoint", 1)?;
        Ok(PoolAllocation { alloc_point })
    }

    async fn reward_per_block(&self) -> Result<u128> {
        let data = abi::encode_call(selectors::REWARD_PER_BLOCK, &[]);
        let ret = self.provider.call(&self.address, &data).await?;
        abi::decode_uint(&ret, "rewardPerBlock")
    }

    async fn total_alloc_point(&self) -> Result<u128> {
        let data = abi::encode_call(selectors::TOTAL_ALLOC_POINT, &[]);
        let ret = self.provider.call(&self.address, &data).await?;
        abi::decode_uint(&ret, "totalAllocPoint")
    }

    async fn user_stake(&self, pool_id: u64, account: &Address) -> Result<UserStake> {
        let data = abi::encode_call(
            selectors::USER_INFO,
            &[AbiArg::Uint(pool_id as u128), AbiArg::Addr(account.clone())],
        );
        let ret = self.provider.call(&self.address, &data).await?;
        // userInfo returns (amount, rewardDebt)
        let amount = abi::decode_uint_at(&ret, "userInfo.amount", 0)?;
        Ok(UserStake { amount })
    }

    async fn pending_reward(&self, pool_id: u64, account: &Address) -> Result<u128> {
        let data = abi::encode_call(
            selectors::PENDING_REWARD,
            &[AbiArg::Uint(pool_id as u128), AbiArg::Addr(account.clone())],
        );
        let ret = self.provider.call(&self.address, &data).await?;
        abi::decode_uint(&ret, "pendingReward")
    }
}

/// ERC-20 token over JSON-RPC
pub struct RpcErc20 {
    provider: Arc<ReadonlyProvider>,
    address: Address,
}

impl RpcErc20 {
    /// Bind to a deployed token
    pub fn new(provider: Arc<ReadonlyProvider>, address: Address) -> Self {
        Self { provider, address }
    }
}

impl Erc20Reader for RpcErc20 {
    async fn balance_of(&self, holder: &Address) -> Result<u128> {
        let data = abi::encode_call(selectors::BALANCE_OF, &[AbiArg::Addr(holder.clone())]);
        let ret = self.provider.call(&self.address, &data).await?;
        abi::decode_uint(&ret, "balanceOf")
    }

    async fn total_supply(&self) -> Result<u128> {
        let data = abi::encode_call(selectors::TOTAL_SUPPLY, &[]);
        let ret = self.provider.call(&self.address, &data).await?;
        abi::decode_uint(&ret, "totalSupply")
    }
}

/// Liquidity-pair contract over JSON-RPC
pub struct RpcPair {
    erc20: RpcErc20,
    provider: Arc<ReadonlyProvider>,
    address: Address,
}

impl RpcPair {
    /// Bind to a deployed pair
    pub fn new(provider: Arc<ReadonlyProvider>, address: Address) -> Self {
        Self {
            erc20: RpcErc20::new(Arc::clone(&provider), address.clone()),
            provider,
            address,
        }
    }
}

impl Erc20Reader for RpcPair {
    async fn balance_of(&self, holder: &Address) -> Result<u128> {
        self.erc20.balance_of(holder).await
    }

    async fn total_supply(&self) -> Result<u128> {
        self.erc20.total_supply().await
    }
}

impl PairReader for RpcPair {
    async fn tokens(&self) -> Result<(Address, Address)> {
        let ret0 = self
            .provider
            .call(&self.address, &abi::encode_call(selectors::TOKEN0, &[]))
            .await?;
        let ret1 = self
            .provider
            .call(&self.address, &abi::encode_call(selectors::TOKEN1, &[]))
            .await?;
        Ok((
            abi::decode_address_at(&ret0, "token0", 0)?,
            abi::decode_address_at(&ret1, "token1", 0)?,
        ))
    }

    async fn reserves(&self) -> Result<(u128, u128)> {
        let ret = self
            .provider
            .call(&self.address, &abi::encode_call(selectors::GET_RESERVES, &[]))
            .await?;
        // getReserves returns (reserve0, reserve1, blockTimestampLast)
        let reserve0 = abi::decode_uint_at(&ret, "reserves.0", 0)?;
        let reserve1 = abi::decode_uint_at(&ret, "reserves.1", 1)?;
        Ok((reserve0, reserve1))
    }
}
