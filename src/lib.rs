//! Client-side navigation core for a single-page portfolio site.
//!
//! Intercepts in-app link clicks, fetches HTML fragments through a TTL/LRU
//! cache, swaps them into the page shell, sets the document title, runs
//! per-page init hooks and prefetches likely next pages. A small development
//! server for the site ships alongside.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod hooks;
pub mod navigation;
pub mod observability;
pub mod route;
pub mod server;
pub mod shell;
pub mod titles;

pub use config::NavConfig;
pub use error::{FetchError, InitError, LoadError, NavError, SetupError};
pub use hooks::PageInitRegistry;
pub use navigation::{NavOutcome, Navigator};
pub use route::RoutePath;
pub use server::DevServer;
