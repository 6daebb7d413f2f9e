//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events to stderr)
//!     → metrics.rs (counters through the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Log level from config, overridable with RUST_LOG
//! - stdout is reserved for command output

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
