//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section has defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the payments client.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Payment service endpoint.
    pub api: ApiConfig,

    /// Retry behaviour of resource loaders.
    pub retries: RetryConfig,

    /// Notification lifecycle.
    pub notifications: NotificationConfig,

    /// Payment history paging.
    pub pagination: PaginationConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Payment service connection settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Service origin (e.g., "http://localhost:8080").
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Delay strategy between retries.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// Same delay before every retry.
    #[default]
    Fixed,
    /// Doubling delay with jitter, capped at `max_delay_ms`.
    Exponential,
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the initial attempt.
    pub max_retries: u32,

    /// Delay before each retry in milliseconds.
    pub delay_ms: u64,

    pub strategy: BackoffStrategy,

    /// Cap for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay_ms: 1000,
            strategy: BackoffStrategy::Fixed,
            max_delay_ms: 8000,
        }
    }
}

/// Notification configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a success notification stays visible, in milliseconds.
    pub auto_dismiss_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { auto_dismiss_ms: 5000 }
    }
}

/// Payment history paging.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PaginationConfig {
    /// Payments per page.
    pub page_size: u32,

    /// Page links shown around the current page.
    pub max_visible_pages: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            max_visible_pages: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
