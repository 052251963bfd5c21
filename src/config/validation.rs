//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (cache bounds > 0, addresses parse)
//! - Check route-shaped values start with `/`
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: NavConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::NavConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("site.base_url `{0}` is not an absolute URL")]
    InvalidBaseUrl(String),

    #[error("site.base_path `{0}` must start with '/'")]
    InvalidBasePath(String),

    #[error("site.not_found_route `{0}` must start with '/'")]
    InvalidNotFoundRoute(String),

    #[error("site.extension must be non-empty and must not start with '.'")]
    InvalidExtension,

    #[error("cache.max_size must be greater than zero")]
    ZeroCacheSize,

    #[error("cache.ttl_ms must be greater than zero")]
    ZeroCacheTtl,

    #[error("{field} `{value}` is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &NavConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let site = &config.site;

    if Url::parse(&site.base_url).map(|u| u.cannot_be_a_base()).unwrap_or(true) {
        errors.push(ValidationError::InvalidBaseUrl(site.base_url.clone()));
    }
    if let Some(base_path) = &site.base_path {
        if !base_path.starts_with('/') {
            errors.push(ValidationError::InvalidBasePath(base_path.clone()));
        }
    }
    if !site.not_found_route.starts_with('/') {
        errors.push(ValidationError::InvalidNotFoundRoute(site.not_found_route.clone()));
    }
    if site.extension.is_empty() || site.extension.starts_with('.') {
        errors.push(ValidationError::InvalidExtension);
    }

    if config.cache.max_size == 0 {
        errors.push(ValidationError::ZeroCacheSize);
    }
    if config.cache.ttl_ms == 0 {
        errors.push(ValidationError::ZeroCacheTtl);
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
