//! Navigation subsystem.
//!
//! # State Machine
//! ```text
//! Idle ──navigate(path)──▶ Navigating
//!                            │ cancel previous token, issue a new one
//!                            │ fetch (cache first) ∥ exit transition
//!                            │ swap content, title, page init, active link
//!                            ▼
//!         success ──────────▶ Idle
//!         failure ──────────▶ Navigating (fallback to the not-found route)
//!         fallback failure ─▶ Idle, inline error content
//!
//! navigate while Navigating → dropped (not queued)
//! leaving Navigating        → token cleared, slot released (Drop guard)
//! ```
//!
//! # Design Decisions
//! - The navigation slot is an atomic flag owned through a guard, so cleanup
//!   runs on every exit path including panics and aborted tasks
//! - Prefetches share the cache but not the navigation token; they are only
//!   cancelled when the navigator is destroyed
//! - Destroying the navigator cancels the in-flight token; the fetch, the exit
//!   transition and a pending page init all stop on it
//! - Cache keys are always normalized route paths

pub mod events;
pub mod hints;
pub mod navigator;
mod session;

pub use events::{ClickOutcome, LinkClick, LinkHover, PointerKind, ShellEvent};
pub use navigator::{NavOutcome, Navigator};
