//! Helpers shared by every price source

pub mod retry;

pub use retry::{retry_with_backoff, RetryPolicy};
