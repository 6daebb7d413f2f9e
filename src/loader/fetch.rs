//! The fetch capability a loader wraps.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::api::TransportError;

/// Fetches one resource for a set of parameters.
///
/// Implementations make a single attempt; retries belong to the loader.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    type Params: Clone + Debug + Send + Sync + 'static;
    type Output: Clone + Default + Send + Sync + 'static;

    /// Resource name for logs and metrics, e.g. "currencies".
    fn resource(&self) -> &'static str;

    async fn fetch(&self, params: &Self::Params) -> Result<Self::Output, TransportError>;
}
