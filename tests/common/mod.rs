//! Shared fixtures for navigator integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use portfolio_nav::fetch::MemoryFetcher;
use portfolio_nav::shell::MemoryShell;
use portfolio_nav::{NavConfig, Navigator, PageInitRegistry};

/// Site deployed under a `/portfolio` prefix.
pub const SITE: &str = "http://site.test/portfolio/";

pub const HOME: &str = "<main>home</main>";
pub const ABOUT: &str = "<main>about</main>";
pub const GALLERY: &str = "<main>gallery</main>";
pub const NOT_FOUND: &str = "<main>not found</main>";

pub fn config() -> NavConfig {
    let mut config = NavConfig::default();
    config.site.base_url = SITE.to_string();
    config.cache.ttl_ms = 60_000;
    config
}

/// URL of the fragment document for a page name.
pub fn page(name: &str) -> String {
    format!("{SITE}pages/{name}.html")
}

pub fn titles_url() -> String {
    format!("{SITE}pages/titles.json")
}

/// A fetcher serving the usual pages and title map.
pub fn site_fetcher() -> MemoryFetcher {
    MemoryFetcher::new()
        .with_body(titles_url(), r#"{"/": "Home", "/about": "About", "/404": "Not Found"}"#)
        .with_body(page("home"), HOME)
        .with_body(page("about"), ABOUT)
        .with_body(page("gallery"), GALLERY)
        .with_body(page("404"), NOT_FOUND)
}

/// Same as [`site_fetcher`] with simulated network time.
pub fn slow_site_fetcher(latency: Duration) -> MemoryFetcher {
    site_fetcher().with_latency(latency)
}

pub fn navigator(
    fetcher: &Arc<MemoryFetcher>,
    shell: &Arc<MemoryShell>,
    hooks: PageInitRegistry,
) -> Navigator {
    navigator_with(config(), fetcher, shell, hooks)
}

pub fn navigator_with(
    config: NavConfig,
    fetcher: &Arc<MemoryFetcher>,
    shell: &Arc<MemoryShell>,
    hooks: PageInitRegistry,
) -> Navigator {
    Navigator::new(&config, fetcher.clone(), shell.clone(), hooks).expect("valid test config")
}
