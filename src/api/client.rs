//! reqwest-backed client for the payment service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use crate::api::error::TransportError;
use crate::api::types::{ApiErrorResponse, CurrencyResponse, PageRequest, PaymentPage, PaymentRequest, PaymentResponse};
use crate::api::PaymentApi;
use crate::config::ApiConfig;

pub const CURRENCIES_PATH: &str = "/api/v1/currencies";
pub const PAYMENTS_PATH: &str = "/api/v1/payments";
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// HTTP client for `/api/v1/*`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let base_url: Url = config
            .base_url
            .parse()
            .map_err(|e| TransportError::unreachable(&config.base_url, format!("invalid base URL: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TransportError::unreachable(&config.base_url, e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::unreachable(path, format!("invalid endpoint: {e}")))
    }

    async fn execute<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T, TransportError> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!(endpoint = path, error = %e, "Request failed before a response");
            TransportError::unreachable(path, e.to_string())
        })?;

        let response = check_status(path, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::Decode {
                endpoint: path.to_string(),
                reason: e.to_string(),
            })
    }
}

async fn check_status(path: &str, response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ApiErrorResponse>(&text).ok();
    tracing::debug!(endpoint = path, status = status.as_u16(), has_error_body = body.is_some(), "Service returned an error status");
    Err(TransportError::status(path, status.as_u16(), body))
}

#[async_trait]
impl PaymentApi for ApiClient {
    async fn list_currencies(&self) -> Result<Vec<CurrencyResponse>, TransportError> {
        let url = self.endpoint(CURRENCIES_PATH)?;
        self.execute(CURRENCIES_PATH, self.client.get(url)).await
    }

    async fn list_payments(&self, page: PageRequest) -> Result<PaymentPage, TransportError> {
        let url = self.endpoint(PAYMENTS_PATH)?;
        let request = self
            .client
            .get(url)
            .query(&[("page", page.page), ("size", page.size)]);
        self.execute(PAYMENTS_PATH, request).await
    }

    async fn create_payment(
        &self,
        payment: &PaymentRequest,
        idempotency_key: Uuid,
    ) -> Result<PaymentResponse, TransportError> {
        let url = self.endpoint(PAYMENTS_PATH)?;
        let request = self
            .client
            .post(url)
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key.to_string())
            .json(payment);
        self.execute(PAYMENTS_PATH, request).await
    }
}
