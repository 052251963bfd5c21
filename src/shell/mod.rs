//! Host page shell.
//!
//! # Responsibilities
//! - Own the view container the fragments are swapped into
//! - Play exit/enter transitions around a swap
//! - Expose document title, history stack and active-link styling
//! - Optionally accept speculation-rules hints
//!
//! # Design Decisions
//! - The navigator never touches a DOM directly; everything goes through [`Shell`]
//! - Only the exit transition is awaited; the enter transition is fire-and-forget
//! - Speculation support is opt-in and defaults to "unsupported"

use async_trait::async_trait;

use crate::route::RoutePath;

pub mod memory;

pub use memory::MemoryShell;

/// The page the navigator drives.
#[async_trait]
pub trait Shell: Send + Sync {
    /// Replace the view container's content.
    fn set_content(&self, html: &str);

    /// Start the exit transition and resolve once it has finished.
    async fn exit_transition(&self);

    /// Start the enter transition.
    fn enter_transition(&self);

    fn set_title(&self, title: &str);

    /// Push a browser history entry for `path` (a public, prefixed path).
    fn push_history(&self, path: &str);

    /// Refresh active-link styling for the current route.
    fn mark_active(&self, route: &RoutePath);

    /// Hrefs of all links currently rendered.
    fn rendered_links(&self) -> Vec<String> {
        Vec::new()
    }

    fn supports_speculation_rules(&self) -> bool {
        false
    }

    /// Install a speculation-rules JSON document.
    fn emit_speculation_rules(&self, _rules: &str) {}
}
