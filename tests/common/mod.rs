//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use uuid::Uuid;

use fx_payments_client::api::{
    CurrencyResponse, PageMetadata, PageRequest, PagedResponse, PaymentApi, PaymentPage, PaymentRequest,
    PaymentResponse, TransportError,
};
use fx_payments_client::loader::Fetcher;

/// Let spawned tasks run until they block again. Does not move the clock.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

pub fn unreachable() -> TransportError {
    TransportError::unreachable("/api/v1/test", "connection refused")
}

/// One scripted response of a [`ScriptedFetcher`].
pub struct Step {
    pub delay: Duration,
    pub result: Result<String, TransportError>,
}

impl Step {
    pub fn ok(value: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(value.to_string()),
        }
    }

    pub fn fail() -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(unreachable()),
        }
    }

    /// Respond only after `ms` milliseconds.
    pub fn after(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Call {
    pub at: Instant,
    pub params: u32,
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// Fetcher that replays a script, one step per call, and records each call.
pub struct ScriptedFetcher {
    steps: Mutex<VecDeque<Step>>,
    calls: CallLog,
}

impl ScriptedFetcher {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> CallLog {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    type Params = u32;
    type Output = String;

    fn resource(&self) -> &'static str {
        "scripted"
    }

    async fn fetch(&self, params: &u32) -> Result<String, TransportError> {
        self.calls.lock().unwrap().push(Call {
            at: Instant::now(),
            params: *params,
        });
        let step = self.steps.lock().unwrap().pop_front();
        let Some(step) = step else {
            return Err(TransportError::unreachable("/scripted", "script exhausted"));
        };
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        step.result
    }
}

pub fn currency(code: &str, decimals: u32) -> CurrencyResponse {
    CurrencyResponse {
        code: code.into(),
        name: format!("{code} currency"),
        decimals,
    }
}

pub fn payment(amount: &str, currency: &str) -> PaymentResponse {
    PaymentResponse {
        id: Uuid::new_v4(),
        amount: amount.into(),
        currency: currency.into(),
        recipient: "Jane Doe".into(),
        processing_fee: "1.00".into(),
        created_at: "2026-01-15T10:00:00Z".into(),
    }
}

/// A page of `total_elements` payments split into `size`-sized pages.
pub fn page_of(request: PageRequest, total_elements: u64) -> PaymentPage {
    let size = u64::from(request.size.max(1));
    let total_pages = total_elements.div_ceil(size) as u32;
    let start = u64::from(request.page) * size;
    let rows = total_elements.saturating_sub(start).min(size);
    PagedResponse {
        content: (0..rows).map(|_| payment("100.00", "EUR")).collect(),
        page: PageMetadata {
            total_elements,
            total_pages,
            size: request.size,
            number: request.page,
        },
    }
}

/// In-memory payment service.
///
/// Scripted responses are consumed first; when a queue is empty the stub
/// answers with a default success.
pub struct StubApi {
    pub currencies: Mutex<VecDeque<Result<Vec<CurrencyResponse>, TransportError>>>,
    pub pages: Mutex<VecDeque<Result<PaymentPage, TransportError>>>,
    pub created: Mutex<VecDeque<Result<PaymentResponse, TransportError>>>,
    pub total_elements: u64,
    /// Applied to every page request.
    pub page_latency: Mutex<Duration>,
    pub page_requests: Mutex<Vec<PageRequest>>,
    pub submissions: Mutex<Vec<(PaymentRequest, Uuid)>>,
}

impl StubApi {
    pub fn new(total_elements: u64) -> Self {
        Self {
            currencies: Mutex::default(),
            pages: Mutex::default(),
            created: Mutex::default(),
            total_elements,
            page_latency: Mutex::default(),
            page_requests: Mutex::default(),
            submissions: Mutex::default(),
        }
    }

    pub fn fail_pages(&self, times: usize) {
        let mut pages = self.pages.lock().unwrap();
        for _ in 0..times {
            pages.push_back(Err(unreachable()));
        }
    }

    pub fn set_page_latency(&self, ms: u64) {
        *self.page_latency.lock().unwrap() = Duration::from_millis(ms);
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.page_requests.lock().unwrap().iter().map(|r| r.page).collect()
    }

    pub fn keys(&self) -> Vec<Uuid> {
        self.submissions.lock().unwrap().iter().map(|(_, key)| *key).collect()
    }
}

#[async_trait]
impl PaymentApi for StubApi {
    async fn list_currencies(&self) -> Result<Vec<CurrencyResponse>, TransportError> {
        let scripted = self.currencies.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(vec![currency("EUR", 2), currency("JPY", 0), currency("KWD", 3)]))
    }

    async fn list_payments(&self, page: PageRequest) -> Result<PaymentPage, TransportError> {
        self.page_requests.lock().unwrap().push(page);
        let scripted = self.pages.lock().unwrap().pop_front();
        let latency = *self.page_latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        scripted.unwrap_or_else(|| Ok(page_of(page, self.total_elements)))
    }

    async fn create_payment(
        &self,
        payment: &PaymentRequest,
        idempotency_key: Uuid,
    ) -> Result<PaymentResponse, TransportError> {
        self.submissions.lock().unwrap().push((payment.clone(), idempotency_key));
        let scripted = self.created.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(PaymentResponse {
                amount: payment.amount.to_string(),
                currency: payment.currency.clone(),
                recipient: payment.recipient.clone(),
                ..self::payment("0", "EUR")
            })
        })
    }
}
