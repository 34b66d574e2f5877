//! Wallet/session service.
//!
//! Exposes the current connection state and user address, broadcasts
//! connect/disconnect lifecycle events, and submits transactions with
//! success/pending/failure callbacks. Aggregators route submission failures
//! through [`WalletService::display_generic_error`]; there is no retry and no
//! partial-success handling.

use std::sync::RwLock;

use tokio::sync::broadcast;

use crate::chain::Address;
use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Wallet lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletEvent {
    /// A wallet connected
    Connected,
    /// The wallet disconnected
    Disconnected,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSACTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// A prepared contract call ready for submission
#[derive(Debug, Clone)]
pub struct TxCall {
    /// Target contract
    pub to: Address,
    /// Encoded call data, `0x` prefixed
    pub data: String,
    /// Human-readable description for logs and error display
    pub description: String,
}

/// Callbacks invoked as a submitted transaction progresses.
///
/// Exactly one of `on_success` / `on_failure` fires; `on_pending` may fire
/// first with the transaction hash.
pub struct TxCallbacks {
    /// Invoked when the transaction is confirmed
    pub on_success: Box<dyn FnOnce() + Send>,
    /// Invoked when the transaction enters the mempool, with its hash
    pub on_pending: Box<dyn FnOnce(String) + Send>,
    /// Invoked when submission or confirmation fails
    pub on_failure: Box<dyn FnOnce(Error) + Send>,
}

impl TxCallbacks {
    /// Callbacks that ignore every notification
    pub fn noop() -> Self {
        Self {
            on_success: Box::new(|| {}),
            on_pending: Box::new(|_| {}),
            on_failure: Box::new(|_| {}),
        }
    }

    /// Replace the failure callback
    pub fn on_failure(mut self, f: impl FnOnce(Error) + Send + 'static) -> Self {
        self.on_failure = Box::new(f);
        self
    }

    /// Replace the success callback
    pub fn on_success(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_success = Box::new(f);
        self
    }
}

impl std::fmt::Debug for TxCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxCallbacks").finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WALLET SERVICE
// ═══════════════════════════════════════════════════════════════════════════════

/// Wallet/session collaborator consumed by the aggregators
pub trait WalletService {
    /// Whether a wallet is currently connected
    fn connected(&self) -> bool;

    /// The connected user's address, if any
    fn user_address(&self) -> Option<Address>;

    /// Subscribe to connect/disconnect lifecycle events
    fn subscribe(&self) -> broadcast::Receiver<WalletEvent>;

    /// Submit a transaction; progress is reported through `callbacks`
    fn send_tx(
        &self,
        call: TxCall,
        callbacks: TxCallbacks,
    ) -> impl std::future::Future<Output = ()>;

    /// Surface an error to the user through the generic error display
    fn display_generic_error(&self, error: &Error);
}

// ═══════════════════════════════════════════════════════════════════════════════
// READ-ONLY SESSION
// ═══════════════════════════════════════════════════════════════════════════════

/// A session without a signing key.
///
/// Connection state is driven programmatically (CLI flag, test setup) and
/// every transaction submission fails with [`Error::TxUnsupported`], routed
/// through the failure callback like any other submission error.
pub struct ReadonlySession {
    // poisoning is treated as "disconnected"; there is nothing to recover
    address: RwLock<Option<Address>>,
    events: broadcast::Sender<WalletEvent>,
}

impl ReadonlySession {
    /// Create a disconnected session
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            address: RwLock::new(None),
            events,
        }
    }

    /// Create a session already connected as `address`
    pub fn connected_as(address: Address) -> Self {
        let session = Self::new();
        session.connect(address);
        session
    }

    /// Mark the session connected and broadcast the event
    pub fn connect(&self, address: Address) {
        if let Ok(mut slot) = self.address.write() {
            *slot = Some(address);
        }
        let _ = self.events.send(WalletEvent::Connected);
    }

    /// Mark the session disconnected and broadcast the event
    pub fn disconnect(&self) {
        if let Ok(mut slot) = self.address.write() {
            *slot = None;
        }
        let _ = self.events.send(WalletEvent::Disconnected);
    }

    /// The connected address, or [`Error::WalletDisconnected`]
    pub fn require_address(&self) -> Result<Address> {
        self.user_address().ok_or(Error::WalletDisconnected)
    }
}

impl Default for ReadonlySession {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletService for ReadonlySession {
    fn connected(&self) -> bool {
        self.user_address().is_some()
    }

    fn user_address(&self) -> Option<Address> {
        self.address.read().ok().and_then(|slot| slot.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    async fn send_tx(&self, call: TxCall, callbacks: TxCallbacks) {
        tracing::warn!(
            to = %call.to,
            description = %call.description,
            "transaction submission attempted on a read-only session"
        );
        (callbacks.on_failure)(Error::TxUnsupported);
    }

    fn display_generic_error(&self, error: &Error) {
        tracing::error!(code = error.code(), "{}", error);
    }
}
