//! Payment flows built on the loader and the API client.
//!
//! # Data Flow
//! ```text
//! Currencies      ── ResourceLoader<CurrencyFetcher>    ── GET /currencies
//! PaymentHistory  ── ResourceLoader<PaymentPageFetcher> ── GET /payments?page=&size=
//!        ▲
//!        │ payment-created (broadcast)
//!        │
//! PaymentSubmitter ── PaymentForm::validate ── POST /payments (Idempotency-Key)
//!        └── NotificationCenter (success / mapped error)
//! ```

pub mod currencies;
pub mod format;
pub mod history;
pub mod submission;

pub use currencies::{Currencies, CurrencyFetcher, CURRENCIES_FAILURE};
pub use format::{format_amount, format_amount_str, DEFAULT_DECIMALS};
pub use history::{Pagination, PaymentHistory, PaymentPageFetcher, HISTORY_FAILURE};
pub use submission::{PaymentSubmitter, SubmitError, SUBMIT_SUCCESS};
