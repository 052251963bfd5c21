//! Development server for the site.
//!
//! # Data Flow
//! ```text
//! GET /some/path?query
//!     → spa.rs (strip query, resolve under root, reject `..`)
//!     → existing file        → served with a content type from its extension
//!     → asset / exempt path  → 404
//!     → anything else        → SPA shell (index.html), so reloads of
//!                              in-app routes land on the navigator
//! ```

pub mod spa;

pub use spa::DevServer;
