//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! navigator, cache, dev server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape (dev server only, optional)
//! ```
//!
//! # Design Decisions
//! - Every navigation carries a UUID in its span for correlation
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
