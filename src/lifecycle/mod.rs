//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → broadcast → every subscribed watch loop exits
//!
//! Signals (signals.rs):
//!     Ctrl-C → Shutdown::trigger()
//! ```
//!
//! # Design Decisions
//! - One coordinator per process, cloned into each long-running loop
//! - Loops stop at their next await point; in-flight fetches are left to finish

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::spawn_ctrl_c_listener;
