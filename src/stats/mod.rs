//! Protocol statistics aggregation: global USD totals, staking figures and
//! circulating supply, built from one indexer query plus spot prices.

pub mod aggregator;
pub mod snapshot;
