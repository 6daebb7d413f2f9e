//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Fetch cycle (one generation):
//!     → retries.rs (attempt, on failure sleep and try again)
//!     → backoff.rs (delay before each retry: fixed or exponential + jitter)
//!     → final Ok / Err handed back to the loader
//! ```
//!
//! # Design Decisions
//! - Fixed 1s delay and 2 retries by default
//! - Every attempt of one cycle shares the cycle's generation id
//! - A superseded cycle stops at its next retry delay; the attempt in flight is not aborted
//! - Durations are clamped to at least 1ms

pub mod backoff;
pub mod retries;

pub use backoff::RetryPolicy;
pub use retries::{retry_until, retry_with_policy, Attempted};
