//! FX payments client library.
//!
//! ```text
//!  ┌───────────────────────────────────────────────────────────────┐
//!  │                        PAYMENTS CLIENT                        │
//!  │                                                               │
//!  │  ┌────────────┐   Fetcher    ┌──────────────┐   PaymentApi    │
//!  │  │  payments  │─────────────▶│    loader    │────────────┐    │
//!  │  │ currencies │◀─LoadState───│ mailbox +    │            ▼    │
//!  │  │  history   │              │ generations  │      ┌─────────┐│
//!  │  │ submission │──────────────┼──────────────┼─────▶│   api   ││──▶ service
//!  │  └─────┬──────┘              └──────┬───────┘      │ reqwest ││
//!  │        │                            │ exhausted    └─────────┘│
//!  │        ▼                            ▼                         │
//!  │  ┌──────────────────────────────────────────┐                 │
//!  │  │ notifications (auto-dismiss, supersede)  │                 │
//!  │  └──────────────────────────────────────────┘                 │
//!  │                                                               │
//!  │  validation (IBAN, payment form)   resilience (retry policy)  │
//!  │  config · observability · lifecycle                           │
//!  └───────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod lifecycle;
pub mod loader;
pub mod notifications;
pub mod observability;
pub mod payments;
pub mod resilience;
pub mod validation;

pub use api::{ApiClient, PaymentApi, TransportError};
pub use config::ClientConfig;
pub use lifecycle::Shutdown;
pub use loader::{Fetcher, LoadState, LoaderHandle, ResourceLoader};
pub use notifications::{Notification, NotificationCenter};
pub use validation::validate_iban;
