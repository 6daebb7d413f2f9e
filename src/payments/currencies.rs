//! Currency catalogue backed by a resource loader.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::api::{CurrencyResponse, PaymentApi, TransportError};
use crate::loader::{Fetcher, Generation, LoadState, LoaderError, LoaderHandle, LoaderOptions, ResourceLoader};
use crate::notifications::NotificationCenter;
use crate::payments::format::{format_amount, DEFAULT_DECIMALS};
use crate::resilience::RetryPolicy;

pub const CURRENCIES_FAILURE: &str = "Failed to load currencies. Please refresh the page.";

/// Fetches the full currency list; takes no parameters.
pub struct CurrencyFetcher {
    api: Arc<dyn PaymentApi>,
}

impl CurrencyFetcher {
    pub fn new(api: Arc<dyn PaymentApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Fetcher for CurrencyFetcher {
    type Params = ();
    type Output = Vec<CurrencyResponse>;

    fn resource(&self) -> &'static str {
        "currencies"
    }

    async fn fetch(&self, _params: &()) -> Result<Vec<CurrencyResponse>, TransportError> {
        self.api.list_currencies().await
    }
}

/// The currencies the service accepts, loaded once on creation.
#[derive(Clone)]
pub struct Currencies {
    loader: LoaderHandle<(), Vec<CurrencyResponse>>,
}

impl Currencies {
    /// Start loading the catalogue. Exhausted retries raise
    /// [`CURRENCIES_FAILURE`] on `notifications`.
    pub fn spawn(api: Arc<dyn PaymentApi>, retry: RetryPolicy, notifications: NotificationCenter) -> Self {
        let options = LoaderOptions::new(retry).notify_on_failure(CURRENCIES_FAILURE);
        let loader = ResourceLoader::spawn(CurrencyFetcher::new(api), (), options, notifications);
        Self { loader }
    }

    pub fn loader(&self) -> &LoaderHandle<(), Vec<CurrencyResponse>> {
        &self.loader
    }

    pub fn list(&self) -> Vec<CurrencyResponse> {
        self.loader.data()
    }

    pub fn get(&self, code: &str) -> Option<CurrencyResponse> {
        self.loader.state().data.into_iter().find(|c| c.code == code)
    }

    /// Minor-unit digits of `code`, if the currency is known.
    pub fn decimals(&self, code: &str) -> Option<u32> {
        self.loader.state().data.iter().find(|c| c.code == code).map(|c| c.decimals)
    }

    /// Format `amount` for `code`, falling back to two decimals.
    pub fn format_amount(&self, amount: Decimal, code: &str) -> String {
        format_amount(amount, self.decimals(code).unwrap_or(DEFAULT_DECIMALS))
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn is_error(&self) -> bool {
        self.loader.is_error()
    }

    pub async fn reload(&self) -> Result<Generation, LoaderError> {
        self.loader.reload().await
    }

    pub async fn settled(&self) -> Result<LoadState<Vec<CurrencyResponse>>, LoaderError> {
        self.loader.settled().await
    }
}
