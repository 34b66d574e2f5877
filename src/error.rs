//! Error types for the aggregation service.
//!
//! One taxonomy for every collaborator the aggregators touch: chain reads,
//! price lookups, indexer queries and transaction submission. Ratio
//! computations never produce an error for a zero denominator; those are
//! defined as zero in [`crate::utils::math`].

use thiserror::Error;

/// Result type alias for stakedash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the aggregation service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════════
    // Chain Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Transport-level failure talking to an endpoint
    #[error("Transport error for {endpoint}: {details}")]
    Transport {
        /// Endpoint that failed
        endpoint: String,
        /// Error details
        details: String,
    },

    /// JSON-RPC node returned an error object
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// RPC error code
        code: i64,
        /// RPC error message
        message: String,
    },

    /// Return data could not be decoded
    #[error("ABI decode error for {what}: {details}")]
    AbiDecode {
        /// What was being decoded
        what: String,
        /// Error details
        details: String,
    },

    /// No contract registered under the given logical name
    #[error("Contract not found: {0}")]
    ContractNotFound(String),

    // ═══════════════════════════════════════════════════════════════════
    // Price Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Price helper has no USD quote for a token
    #[error("No USD price available for token {0}")]
    PriceUnavailable(String),

    // ═══════════════════════════════════════════════════════════════════
    // Indexer Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Indexer query failed or returned an error payload
    #[error("Indexer query failed: {0}")]
    Indexer(String),

    // ═══════════════════════════════════════════════════════════════════
    // Transaction Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Transaction submission failed
    #[error("Transaction submission failed: {0}")]
    TxSubmission(String),

    /// The session cannot submit transactions (read-only connection)
    #[error("Transaction submission not supported by this session")]
    TxUnsupported,

    /// No wallet is connected
    #[error("Wallet is not connected")]
    WalletDisconnected,

    // ═══════════════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Malformed address string
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid input parameter
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Overflow converting a raw fixed-point value
    #[error("Arithmetic overflow in {operation}")]
    Overflow {
        /// Operation that overflowed
        operation: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Internal Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if this error is likely transient and a later load may
    /// succeed without any state change on our side
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. }
                | Error::Rpc { .. }
                | Error::PriceUnavailable(_)
                | Error::Indexer(_)
                | Error::TxSubmission(_)
        )
    }

    /// Returns the error code for external systems
    pub fn code(&self) -> u32 {
        match self {
            // Chain errors: 1xxx
            Error::Transport { .. } => 1001,
            Error::Rpc { .. } => 1002,
            Error::AbiDecode { .. } => 1003,
            Error::ContractNotFound(_) => 1004,

            // Price errors: 2xxx
            Error::PriceUnavailable(_) => 2001,

            // Indexer errors: 3xxx
            Error::Indexer(_) => 3001,

            // Transaction errors: 4xxx
            Error::TxSubmission(_) => 4001,
            Error::TxUnsupported => 4002,
            Error::WalletDisconnected => 4003,

            // Validation errors: 5xxx
            Error::InvalidAddress(_) => 5001,
            Error::InvalidParameter { .. } => 5002,
            Error::Overflow { .. } => 5003,

            // Internal errors: 9xxx
            Error::Internal(_) => 9001,
        }
    }
}
