//! Paginated payment history.
//!
//! The loader's parameter is the zero-based page index. Navigation, manual
//! retry and payment-created events all feed the same loader, so the newest
//! trigger always wins.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::api::{PageRequest, PaymentApi, PaymentPage, PaymentResponse, TransportError};
use crate::config::PaginationConfig;
use crate::loader::{Fetcher, Generation, LoadState, LoaderError, LoaderHandle, LoaderOptions, ResourceLoader};
use crate::notifications::NotificationCenter;
use crate::resilience::RetryPolicy;

pub const HISTORY_FAILURE: &str = "Failed to load payment history.";

pub struct PaymentPageFetcher {
    api: Arc<dyn PaymentApi>,
    page_size: u32,
}

impl PaymentPageFetcher {
    pub fn new(api: Arc<dyn PaymentApi>, page_size: u32) -> Self {
        Self { api, page_size }
    }
}

#[async_trait]
impl Fetcher for PaymentPageFetcher {
    type Params = u32;
    type Output = PaymentPage;

    fn resource(&self) -> &'static str {
        "payments"
    }

    async fn fetch(&self, page: &u32) -> Result<PaymentPage, TransportError> {
        self.api
            .list_payments(PageRequest {
                page: *page,
                size: self.page_size,
            })
            .await
    }
}

/// Position within a paged listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Zero-based.
    pub current: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub page_size: u32,
}

impl Pagination {
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current.saturating_add(1) >= self.total_pages
    }

    /// One-based index of the first row on the current page, 0 when empty.
    pub fn showing_from(&self) -> u64 {
        if self.total_elements == 0 {
            return 0;
        }
        u64::from(self.current) * u64::from(self.page_size) + 1
    }

    /// One-based index of the last row on the current page.
    pub fn showing_to(&self) -> u64 {
        let end = (u64::from(self.current) + 1) * u64::from(self.page_size);
        end.min(self.total_elements)
    }

    /// Up to `max_visible` page indices, centred on the current page and
    /// shifted to stay within `0..total_pages`.
    pub fn visible_pages(&self, max_visible: u32) -> Vec<u32> {
        let start = self.current.saturating_sub(max_visible / 2);
        let end = self.total_pages.min(start.saturating_add(max_visible));
        let start = end.saturating_sub(max_visible);
        (start..end).collect()
    }

    /// Whether navigating to `page` would change anything.
    pub fn accepts(&self, page: u32) -> bool {
        page < self.total_pages && page != self.current
    }
}

/// Payment history pages with navigation.
#[derive(Clone)]
pub struct PaymentHistory {
    loader: LoaderHandle<u32, PaymentPage>,
    current_page: Arc<AtomicU32>,
    page_size: u32,
    max_visible_pages: u32,
}

impl PaymentHistory {
    /// Start loading `start_page`. Exhausted retries raise
    /// [`HISTORY_FAILURE`] on `notifications`.
    pub fn spawn(
        api: Arc<dyn PaymentApi>,
        pagination: &PaginationConfig,
        retry: RetryPolicy,
        notifications: NotificationCenter,
        start_page: u32,
    ) -> Self {
        let fetcher = PaymentPageFetcher::new(api, pagination.page_size);
        let options = LoaderOptions::new(retry).notify_on_failure(HISTORY_FAILURE);
        let loader = ResourceLoader::spawn(fetcher, start_page, options, notifications);

        Self {
            loader,
            current_page: Arc::new(AtomicU32::new(start_page)),
            page_size: pagination.page_size,
            max_visible_pages: pagination.max_visible_pages,
        }
    }

    pub fn loader(&self) -> &LoaderHandle<u32, PaymentPage> {
        &self.loader
    }

    pub fn current_page(&self) -> u32 {
        self.current_page.load(Ordering::SeqCst)
    }

    pub fn payments(&self) -> Vec<PaymentResponse> {
        self.loader.state().data.content
    }

    pub fn pagination(&self) -> Pagination {
        let meta = self.loader.state().data.page;
        Pagination {
            current: self.current_page(),
            total_pages: meta.total_pages,
            total_elements: meta.total_elements,
            page_size: self.page_size,
        }
    }

    pub fn visible_pages(&self) -> Vec<u32> {
        self.pagination().visible_pages(self.max_visible_pages)
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn is_error(&self) -> bool {
        self.loader.is_error()
    }

    /// Navigate to `page`. Out-of-range and same-page requests are ignored
    /// and return `Ok(None)`.
    pub async fn go_to_page(&self, page: u32) -> Result<Option<Generation>, LoaderError> {
        let pagination = self.pagination();
        if !pagination.accepts(page) {
            tracing::debug!(
                page,
                current = pagination.current,
                total_pages = pagination.total_pages,
                "Page change ignored"
            );
            return Ok(None);
        }
        self.current_page.store(page, Ordering::SeqCst);
        self.loader.load(page).await.map(Some)
    }

    pub async fn next_page(&self) -> Result<Option<Generation>, LoaderError> {
        match self.current_page().checked_add(1) {
            Some(page) => self.go_to_page(page).await,
            None => Ok(None),
        }
    }

    pub async fn previous_page(&self) -> Result<Option<Generation>, LoaderError> {
        match self.current_page().checked_sub(1) {
            Some(page) => self.go_to_page(page).await,
            None => Ok(None),
        }
    }

    /// Reload the current page.
    pub async fn retry_load(&self) -> Result<Generation, LoaderError> {
        self.loader.reload().await
    }

    pub async fn settled(&self) -> Result<LoadState<PaymentPage>, LoaderError> {
        self.loader.settled().await
    }

    /// Jump back to the first page whenever a payment is created.
    ///
    /// The task ends when the event source closes or the loader stops.
    pub fn follow_created(&self, mut created: broadcast::Receiver<PaymentResponse>) -> JoinHandle<()> {
        let history = self.clone();
        tokio::spawn(async move {
            loop {
                match created.recv().await {
                    Ok(payment) => tracing::debug!(payment_id = %payment.id, "Payment created, showing first page"),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Payment-created events lagged")
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
                history.current_page.store(0, Ordering::SeqCst);
                if history.loader.request_load(0).is_err() {
                    break;
                }
            }
        })
    }
}
