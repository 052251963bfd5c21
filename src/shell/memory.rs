//! Recording shell for tests and headless runs.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::route::RoutePath;
use crate::shell::Shell;

#[derive(Debug, Default)]
struct MemoryShellState {
    content: String,
    swaps: Vec<String>,
    title: String,
    history: Vec<String>,
    active: Vec<RoutePath>,
    enter_transitions: usize,
    speculation_rules: Vec<String>,
}

/// A [`Shell`] that records everything the navigator does to it.
#[derive(Debug, Default)]
pub struct MemoryShell {
    state: Mutex<MemoryShellState>,
    links: Mutex<Vec<String>>,
    transition: Duration,
    speculation: bool,
}

impl MemoryShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the exit transition take `duration`.
    pub fn with_transition(mut self, duration: Duration) -> Self {
        self.transition = duration;
        self
    }

    /// Advertise speculation-rules support.
    pub fn with_speculation_rules(mut self) -> Self {
        self.speculation = true;
        self
    }

    /// Set the hrefs reported as rendered links.
    pub fn set_links<I, S>(&self, links: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.links.lock() = links.into_iter().map(Into::into).collect();
    }

    pub fn content(&self) -> String {
        self.state.lock().content.clone()
    }

    /// Every content swap, in order.
    pub fn swaps(&self) -> Vec<String> {
        self.state.lock().swaps.clone()
    }

    pub fn title(&self) -> String {
        self.state.lock().title.clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.state.lock().history.clone()
    }

    /// Every active-link refresh, in order.
    pub fn active(&self) -> Vec<RoutePath> {
        self.state.lock().active.clone()
    }

    pub fn enter_transitions(&self) -> usize {
        self.state.lock().enter_transitions
    }

    pub fn speculation_rules(&self) -> Vec<String> {
        self.state.lock().speculation_rules.clone()
    }
}

#[async_trait]
impl Shell for MemoryShell {
    fn set_content(&self, html: &str) {
        let mut state = self.state.lock();
        state.content = html.to_string();
        state.swaps.push(html.to_string());
    }

    async fn exit_transition(&self) {
        if !self.transition.is_zero() {
            tokio::time::sleep(self.transition).await;
        }
    }

    fn enter_transition(&self) {
        self.state.lock().enter_transitions += 1;
    }

    fn set_title(&self, title: &str) {
        self.state.lock().title = title.to_string();
    }

    fn push_history(&self, path: &str) {
        self.state.lock().history.push(path.to_string());
    }

    fn mark_active(&self, route: &RoutePath) {
        self.state.lock().active.push(route.clone());
    }

    fn rendered_links(&self) -> Vec<String> {
        self.links.lock().clone()
    }

    fn supports_speculation_rules(&self) -> bool {
        self.speculation
    }

    fn emit_speculation_rules(&self, rules: &str) {
        self.state.lock().speculation_rules.push(rules.to_string());
    }
}
