//! Wallet session state, lifecycle events and transaction submission.

pub mod session;
