//! LBank exchange price source module
//!
//! Provides REST-based perpetual swap prices from LBank.

pub mod adapter;
pub mod config;
pub mod types;

pub use adapter::LbankSource;
pub use config::LbankConfig;
