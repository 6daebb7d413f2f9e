//! Payment service API.
//!
//! # Data Flow
//! ```text
//! loader / submission
//!     → PaymentApi (trait)
//!     → client.rs (reqwest, JSON)
//!     → Result<payload, TransportError>
//!
//! TransportError
//!     → error.rs user_message() → NotificationCenter
//! ```
//!
//! Payload shapes live in types.rs and are passed through untouched.

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;
use uuid::Uuid;

pub use client::ApiClient;
pub use error::TransportError;
pub use types::{
    ApiErrorResponse, CurrencyResponse, PageMetadata, PageRequest, PagedResponse, PaymentPage, PaymentRequest,
    PaymentResponse,
};

/// Operations the payment service exposes.
#[async_trait]
pub trait PaymentApi: Send + Sync {
    async fn list_currencies(&self) -> Result<Vec<CurrencyResponse>, TransportError>;

    async fn list_payments(&self, page: PageRequest) -> Result<PaymentPage, TransportError>;

    /// Create a payment. Resubmitting with the same key must not create a duplicate.
    async fn create_payment(
        &self,
        payment: &PaymentRequest,
        idempotency_key: Uuid,
    ) -> Result<PaymentResponse, TransportError>;
}
