//! Indexed-data query service: the fixed stats query template and its typed
//! response records.

pub mod client;
