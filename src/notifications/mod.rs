//! Notification subsystem.
//!
//! # Data Flow
//! ```text
//! Producers:
//!     loader (retries exhausted)     → show_error
//!     submission (success / failure) → show_success / show_error
//!     main (unexpected error)        → report_unexpected
//!
//! center.rs
//!     → watch<Option<Notification>> (current, for display)
//!     → broadcast<Notification>     (every notification, in order)
//!     → timer.rs                    (auto-dismiss for success)
//! ```

pub mod center;
pub mod timer;
pub mod types;

pub use center::{NotificationCenter, AUTO_DISMISS};
pub use timer::{after, TimerHandle};
pub use types::{Notification, NotificationKind};
