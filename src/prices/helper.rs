//! Price/valuation helper.
//!
//! Three concerns, all consumed by the aggregators: USD price for a token,
//! USD price for a liquidity-pool token (derived from the pair's reserves),
//! and interest figures net of the protocol fee.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chain::contracts::{Erc20Reader, PairReader, RpcPair};
use crate::chain::provider::ReadonlyProvider;
use crate::chain::Address;
use crate::error::{Error, Result};
use crate::utils::math::{self, after_fee_bps};

// ═══════════════════════════════════════════════════════════════════════════════
// PRICE HELPER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Price/valuation collaborator consumed by the aggregators
pub trait PriceHelper {
    /// USD price of a token
    fn token_price_usd(
        &self,
        token: &Address,
    ) -> impl std::future::Future<Output = Result<Decimal>>;

    /// USD price of one liquidity-pool token
    fn lp_token_price_usd(
        &self,
        lp_token: &Address,
    ) -> impl std::future::Future<Output = Result<Decimal>>;

    /// An interest amount net of the protocol fee
    fn apply_interest_fee(&self, interest: Decimal) -> Decimal;
}

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP IMPLEMENTATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration for the HTTP price helper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceApiConfig {
    /// Base URL of the price API
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Protocol fee taken from interest, basis points
    pub interest_fee_bps: u64,
}

impl Default for PriceApiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.coingecko.com/api/v3".into(),
            timeout_secs: 30,
            interest_fee_bps: crate::utils::constants::INTEREST_FEE_BPS,
        }
    }
}

/// Token price response: `{ "<address>": { "usd": 1.23 } }`
type TokenPriceResponse = HashMap<String, HashMap<String, f64>>;

/// HTTP price helper backed by a public price API and, for LP tokens, the
/// pair contract's own reserves.
pub struct HttpPriceHelper {
    client: Client,
    config: PriceApiConfig,
    provider: std::sync::Arc<ReadonlyProvider>,
}

impl HttpPriceHelper {
    /// Create a new helper
    pub fn new(config: PriceApiConfig, provider: std::sync::Arc<ReadonlyProvider>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("{}/{}", crate::SERVICE_NAME, crate::VERSION))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            provider,
        })
    }
}

impl PriceHelper for HttpPriceHelper {
    async fn token_price_usd(&self, token: &Address) -> Result<Decimal> {
        let url = format!(
            "{}/simple/token_price/ethereum?contract_addresses={}&vs_currencies=usd",
            self.config.api_url, token
        );

        let response = self.client.get(&url).send().await.map_err(|e| Error::Transport {
            endpoint: self.config.api_url.clone(),
            details: format!("price request failed: {}", e),
        })?;

        let data: TokenPriceResponse = response.json().await.map_err(|e| Error::Transport {
            endpoint: self.config.api_url.clone(),
            details: format!("failed to parse price response: {}", e),
        })?;

        let usd = data
            .get(token.as_str())
            .and_then(|quotes| quotes.get("usd"))
            .copied()
            .ok_or_else(|| Error::PriceUnavailable(token.to_string()))?;

        Decimal::from_f64(usd).ok_or_else(|| Error::PriceUnavailable(token.to_string()))
    }

    /// LP token price = (reserve0 × price0 + reserve1 × price1) / pool supply.
    ///
    /// Both reserves are assumed to carry the standard 18-decimal fixed-point
    /// scale. An empty pool prices at zero.
    async fn lp_token_price_usd(&self, lp_token: &Address) -> Result<Decimal> {
        let pair = RpcPair::new(std::sync::Arc::clone(&self.provider), lp_token.clone());

        let (token0, token1) = pair.tokens().await?;
        let (reserve0, reserve1) = pair.reserves().await?;
        let supply = math::normalize(pair.total_supply().await?)?;
        if supply.is_zero() {
            return Ok(Decimal::ZERO);
        }

        let price0 = self.token_price_usd(&token0).await?;
        let price1 = self.token_price_usd(&token1).await?;

        let pool_value = math::normalize(reserve0)? * price0 + math::normalize(reserve1)? * price1;
        Ok(pool_value / supply)
    }

    fn apply_interest_fee(&self, interest: Decimal) -> Decimal {
        after_fee_bps(interest, self.config.interest_fee_bps)
    }
}
