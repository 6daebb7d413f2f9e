//! Resilient resource loading.
//!
//! # Data Flow
//! ```text
//! load(params) / reload() / refresh signal
//!     → mailbox (FIFO, single consumer)
//!     → actor.rs: generation += 1, state = Loading
//!     → spawned fetch cycle (retry_until, fixed delay between attempts, stops once superseded)
//!     → Settled { generation, result } back through the mailbox
//!     → actor.rs: stale generation? discard : publish Success / Failed
//!     → watch channel → LoaderHandle::state()
//! ```
//!
//! # Design Decisions
//! - A newer trigger supersedes an in-flight cycle; the old request is left
//!   to finish without further retries and its outcome is dropped on arrival
//! - Retries within one cycle share that cycle's generation
//! - Failure keeps the previously loaded data and raises at most one
//!   notification per cycle

pub mod actor;
pub mod fetch;
pub mod handle;
pub mod state;

pub use actor::{LoaderOptions, ResourceLoader};
pub use fetch::Fetcher;
pub use handle::{LoaderError, LoaderHandle};
pub use state::{Generation, LoadPhase, LoadState};
