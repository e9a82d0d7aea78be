//! MEXC exchange price source module
//!
//! Provides REST-based perpetual contract prices from MEXC.

pub mod adapter;
pub mod config;
pub mod types;

pub use adapter::MexcSource;
pub use config::MexcConfig;
