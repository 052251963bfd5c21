//! Events the host shell feeds into the navigator.

use tokio::task::JoinHandle;

use crate::navigation::NavOutcome;

/// Kind of pointer that produced a hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// A click on an anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClick {
    /// The anchor's href, absolute or relative to the site.
    pub href: String,
    /// The anchor's `target` attribute.
    pub target: Option<String>,
    /// A modifier key (ctrl, meta, shift) or non-primary button was involved.
    pub modified: bool,
}

impl LinkClick {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            target: None,
            modified: false,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_modifier(mut self) -> Self {
        self.modified = true;
        self
    }
}

/// A pointer entering an anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkHover {
    pub href: String,
    pub target: Option<String>,
    pub pointer: PointerKind,
}

impl LinkHover {
    pub fn new(href: impl Into<String>, pointer: PointerKind) -> Self {
        Self {
            href: href.into(),
            target: None,
            pointer,
        }
    }
}

/// Input delivered over a navigator subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Click(LinkClick),
    Hover(LinkHover),
    /// The browser moved through its history stack to this raw path.
    PopState(String),
}

/// How a click was handled.
#[derive(Debug)]
pub enum ClickOutcome {
    /// Not an in-app link; the browser should follow it.
    PassThrough,
    /// In-app link clicked while another navigation was running; ignored.
    Dropped,
    /// History was pushed and a navigation started.
    Started(JoinHandle<NavOutcome>),
}

impl ClickOutcome {
    /// Whether the browser's default navigation must be suppressed.
    pub fn prevents_default(&self) -> bool {
        !matches!(self, ClickOutcome::PassThrough)
    }
}
