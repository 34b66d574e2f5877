//! CLI support: output formatting for the dashboard binary.

pub mod output;
