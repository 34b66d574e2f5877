//! Read-only JSON-RPC connection.
//!
//! A thin `eth_call` client over HTTP. No signing key is involved anywhere;
//! every read the dashboard performs goes through this connection, and
//! transaction submission lives with the wallet session instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::chain::Address;
use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// WIRE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROVIDER
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration for the read-only connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// JSON-RPC endpoint URL
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8545".into(),
            timeout_secs: 30,
        }
    }
}

/// Read-only JSON-RPC connection usable for contract calls without a signing
/// key
pub struct ReadonlyProvider {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl ReadonlyProvider {
    /// Create a new provider
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("{}/{}", crate::SERVICE_NAME, crate::VERSION))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url,
            next_id: AtomicU64::new(1),
        })
    }

    /// The endpoint this provider talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue an `eth_call` against `to` with pre-encoded call data and return
    /// the raw hex return data.
    pub async fn call(&self, to: &Address, data: &str) -> Result<String> {
        let params = serde_json::json!([{ "to": to.as_str(), "data": data }, "latest"]);
        let value = self.request("eth_call", params).await?;
        value.as_str().map(str::to_owned).ok_or_else(|| Error::AbiDecode {
            what: "eth_call result".into(),
            details: format!("expected hex string, got {}", value),
        })
    }

    async fn request(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Transport {
                endpoint: self.url.clone(),
                details: format!("{} request failed: {}", method, e),
            })?;

        let body: JsonRpcResponse = response.json().await.map_err(|e| Error::Transport {
            endpoint: self.url.clone(),
            details: format!("failed to parse {} response: {}", method, e),
        })?;

        if let Some(err) = body.error {
            return Err(Error::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        body.result.ok_or_else(|| Error::Rpc {
            code: 0,
            message: format!("{}: empty result", method),
        })
    }
}
