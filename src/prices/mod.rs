//! USD valuation for tokens, liquidity-pool tokens and interest figures.

pub mod helper;
