//! Fragment caching subsystem.
//!
//! # Data Flow
//! ```text
//! navigate / prefetch
//!     → normalized route path (cache key)
//!     → store.rs (TTL check, then LRU lookup)
//!     → hit: fragment text
//!     → miss: fetcher result written back with a fresh timestamp
//! ```
//!
//! # Design Decisions
//! - Expiry is lazy: stale entries are dropped when read, not by a sweeper
//! - Capacity is enforced on every write, evicting the least-recently-used entry
//! - Navigation and prefetch share one store; writes are last-write-wins

pub mod store;

pub use store::TtlLruCache;
