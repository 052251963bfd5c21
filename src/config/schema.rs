//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! navigation core and the development server. All types derive Serde traits
//! for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NavConfig {
    /// Where the site lives and how routes map to documents.
    pub site: SiteConfig,

    /// Fragment cache bounds.
    pub cache: CacheConfig,

    /// Prefetch behaviour.
    pub prefetch: PrefetchConfig,

    /// Development server settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Site layout: base URL, content documents and fallback content.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute URL the site is served from (e.g., "https://me.github.io/portfolio/").
    pub base_url: String,

    /// Deployment prefix stripped from browser paths.
    /// When unset, the path of `base_url` is used.
    pub base_path: Option<String>,

    /// Directory (relative to `base_url`) holding page fragments and the title map.
    pub content_dir: String,

    /// Document name served for the `/` route.
    pub home_document: String,

    /// Extension appended to fragment documents, without the dot.
    pub extension: String,

    /// Title map document inside `content_dir`.
    pub titles_document: String,

    /// Title used when a route has no entry in the title map.
    pub default_title: String,

    /// Route navigated to when a page fails to load.
    pub not_found_route: String,

    /// Inline content shown when the not-found route fails too.
    pub error_html: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            base_path: None,
            content_dir: "pages".to_string(),
            home_document: "home".to_string(),
            extension: "html".to_string(),
            titles_document: "titles.json".to_string(),
            default_title: "Portfolio".to_string(),
            not_found_route: "/404".to_string(),
            error_html: "<div class=\"page-error\"><p>This page could not be loaded.</p></div>"
                .to_string(),
        }
    }
}

/// Fragment cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached fragments.
    pub max_size: usize,

    /// Time-to-live of a cached fragment in milliseconds.
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 20,
            ttl_ms: 5 * 60 * 1000,
        }
    }
}

/// Prefetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PrefetchConfig {
    /// Master switch for all prefetching.
    pub enabled: bool,

    /// Prefetch internal links hovered with a mouse.
    pub on_hover: bool,

    /// Emit a speculation-rules hint after the first navigation.
    pub speculation_rules: bool,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            on_hover: true,
            speculation_rules: true,
        }
    }
}

/// Development server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8000").
    pub bind_address: String,

    /// Directory served as the site root.
    pub root: String,

    /// SPA shell returned for unknown paths.
    pub index_document: String,

    /// Path prefixes that never fall back to the SPA shell.
    pub asset_prefixes: Vec<String>,

    /// Exact paths that never fall back to the SPA shell.
    pub exempt_paths: Vec<String>,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            root: ".".to_string(),
            index_document: "index.html".to_string(),
            asset_prefixes: vec!["/assets/".to_string()],
            exempt_paths: vec!["/favicon.ico".to_string()],
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "portfolio_nav=debug,tower_http=debug".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: NavConfig = toml::from_str(
            r#"
            [site]
            base_url = "https://me.github.io/portfolio/"

            [cache]
            max_size = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.site.base_url, "https://me.github.io/portfolio/");
        assert_eq!(config.site.not_found_route, "/404");
        assert_eq!(config.cache.max_size, 5);
        assert_eq!(config.cache.ttl_ms, 300_000);
        assert!(config.prefetch.enabled);
        assert_eq!(config.server.bind_address, "127.0.0.1:8000");
    }
}
