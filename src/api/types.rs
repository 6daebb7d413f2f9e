//! Payment service payloads.
//!
//! Shapes are owned by the upstream service; fields use its camelCase names.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A currency the service accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyResponse {
    /// ISO 4217 code, e.g. "EUR".
    pub code: String,
    pub name: String,
    /// Number of minor-unit digits (2 for EUR, 0 for JPY).
    pub decimals: u32,
}

/// Body of `POST /api/v1/payments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Sent as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub recipient: String,
    pub recipient_account: String,
}

/// A stored payment as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: Uuid,
    /// Decimal string, e.g. "100.50".
    pub amount: String,
    pub currency: String,
    pub recipient: String,
    pub processing_fee: String,
    pub created_at: String,
}

/// Pagination metadata of a [`PagedResponse`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    /// Zero-based page index.
    pub number: u32,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub content: Vec<T>,
    pub page: PageMetadata,
}

impl<T> Default for PagedResponse<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            page: PageMetadata::default(),
        }
    }
}

/// A page of payment history.
pub type PaymentPage = PagedResponse<PaymentResponse>;

/// Page selector for `GET /api/v1/payments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

/// Structured error body returned with 4xx/5xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub status: u16,
    pub errors: Vec<String>,
}
