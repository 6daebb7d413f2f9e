//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (durations > 0, page size bounds)
//! - Check the service URL is an absolute http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

pub const MAX_PAGE_SIZE: u32 = 100;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("api.base_url '{0}' is not an absolute http(s) URL")]
    InvalidBaseUrl(String),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("pagination.page_size must be at most 100, got {0}")]
    PageSizeTooLarge(u32),

    #[error("retries.max_delay_ms ({max}) is below retries.delay_ms ({base})")]
    MaxDelayBelowBase { base: u64, max: u64 },

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Check every semantic rule and collect all failures.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::InvalidBaseUrl(config.api.base_url.clone())),
    }

    let positive: [(&'static str, u64); 5] = [
        ("api.request_timeout_secs", config.api.request_timeout_secs),
        ("retries.delay_ms", config.retries.delay_ms),
        ("notifications.auto_dismiss_ms", config.notifications.auto_dismiss_ms),
        ("pagination.page_size", u64::from(config.pagination.page_size)),
        ("pagination.max_visible_pages", u64::from(config.pagination.max_visible_pages)),
    ];
    errors.extend(
        positive
            .into_iter()
            .filter(|(_, value)| *value == 0)
            .map(|(name, _)| ValidationError::NotPositive(name)),
    );

    if config.pagination.page_size > MAX_PAGE_SIZE {
        errors.push(ValidationError::PageSizeTooLarge(config.pagination.page_size));
    }

    if config.retries.max_delay_ms < config.retries.delay_ms {
        errors.push(ValidationError::MaxDelayBelowBase {
            base: config.retries.delay_ms,
            max: config.retries.max_delay_ms,
        });
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
