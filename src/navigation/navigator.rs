//! The navigator: fetch-and-swap orchestration.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::cache::TtlLruCache;
use crate::config::{NavConfig, PrefetchConfig};
use crate::error::{FetchError, InitError, LoadError, NavError, SetupError};
use crate::fetch::Fetcher;
use crate::hooks::PageInitRegistry;
use crate::navigation::events::{ClickOutcome, LinkClick, LinkHover, PointerKind, ShellEvent};
use crate::navigation::hints::speculation_rules;
use crate::navigation::session::{NavGuard, Session};
use crate::observability::metrics;
use crate::route::{LinkTarget, RoutePath, SitePaths};
use crate::shell::Shell;
use crate::titles::TitleStore;

/// How a navigation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The requested page is showing.
    Completed,
    /// The requested page failed; the not-found page is showing.
    Recovered,
    /// The not-found page failed too; the inline error content is showing.
    Failed,
    /// Another navigation was running (or the navigator is destroyed); nothing happened.
    Dropped,
    /// The navigation was cancelled before it could swap content.
    Cancelled,
}

impl NavOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavOutcome::Completed => "completed",
            NavOutcome::Recovered => "recovered",
            NavOutcome::Failed => "failed",
            NavOutcome::Dropped => "dropped",
            NavOutcome::Cancelled => "cancelled",
        }
    }
}

struct Inner {
    paths: SitePaths,
    not_found: RoutePath,
    error_html: String,
    prefetch: PrefetchConfig,
    fetcher: Arc<dyn Fetcher>,
    shell: Arc<dyn Shell>,
    hooks: PageInitRegistry,
    titles: TitleStore,
    cache: Mutex<TtlLruCache<RoutePath, String>>,
    session: Arc<Session>,
    lifecycle: CancellationToken,
    subscriptions: Mutex<Vec<JoinHandle<()>>>,
}

/// Application-owned navigation handle.
///
/// Cloning is cheap; all clones drive the same session. Only one navigation
/// runs at a time: a request made while one is in flight is dropped, not queued.
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<Inner>,
}

impl Navigator {
    pub fn new(
        config: &NavConfig,
        fetcher: Arc<dyn Fetcher>,
        shell: Arc<dyn Shell>,
        hooks: PageInitRegistry,
    ) -> Result<Self, SetupError> {
        let paths = SitePaths::from_config(&config.site)?;
        let titles = TitleStore::new(paths.titles_url()?, config.site.default_title.clone());
        let max_size = NonZeroUsize::new(config.cache.max_size).ok_or(SetupError::ZeroCacheSize)?;
        let cache = TtlLruCache::new(max_size, Duration::from_millis(config.cache.ttl_ms));

        Ok(Self {
            inner: Arc::new(Inner {
                paths,
                not_found: RoutePath::new(&config.site.not_found_route),
                error_html: config.site.error_html.clone(),
                prefetch: config.prefetch.clone(),
                fetcher,
                shell,
                hooks,
                titles,
                cache: Mutex::new(cache),
                session: Arc::new(Session::default()),
                lifecycle: CancellationToken::new(),
                subscriptions: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn paths(&self) -> &SitePaths {
        &self.inner.paths
    }

    pub fn titles(&self) -> &TitleStore {
        &self.inner.titles
    }

    pub fn is_navigating(&self) -> bool {
        self.inner.session.is_navigating()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.lifecycle.is_cancelled()
    }

    /// Route of the page currently showing, once a navigation has completed.
    pub fn current_route(&self) -> Option<RoutePath> {
        self.inner.session.current()
    }

    /// Whether `href` points at the current page, ignoring a trailing slash.
    pub fn is_active(&self, href: &str) -> bool {
        let Some(current) = self.current_route() else {
            return false;
        };
        match self.classify(href, None) {
            LinkTarget::Route(link) => link.same_page(&current),
            LinkTarget::Anchor => true,
            LinkTarget::External => false,
        }
    }

    /// URL of the page links are currently rendered on.
    fn document_url(&self) -> Url {
        let paths = &self.inner.paths;
        self.current_route()
            .and_then(|route| paths.page_url(&route).ok())
            .unwrap_or_else(|| paths.base_url().clone())
    }

    fn classify(&self, href: &str, target: Option<&str>) -> LinkTarget {
        self.inner.paths.classify_link(href, target, &self.document_url())
    }

    /// Cached fragment for a raw path, if live.
    pub fn cached(&self, path: &str) -> Option<String> {
        let route = self.inner.paths.normalize(path);
        self.inner.cache.lock().get(&route)
    }

    /// Whether a prefetch was ever attempted for a raw path this session.
    pub fn was_prefetched(&self, path: &str) -> bool {
        self.inner.session.was_prefetched(&self.inner.paths.normalize(path))
    }

    /// Load the title map, then show the initial page.
    ///
    /// A title map that cannot be loaded is fatal. After the first navigation a
    /// speculation-rules hint is emitted when the shell supports it.
    pub async fn start(&self, initial_path: &str) -> Result<NavOutcome, LoadError> {
        self.inner.titles.load(self.inner.fetcher.as_ref()).await?;

        let outcome = self.navigate(initial_path).await;
        tracing::info!(path = %initial_path, outcome = outcome.as_str(), "Navigator started");

        if self.inner.prefetch.enabled && self.inner.prefetch.speculation_rules {
            self.emit_speculation_hints();
        }
        Ok(outcome)
    }

    /// Consume shell events until the channel closes or the navigator is destroyed.
    ///
    /// Clicks delivered here cannot suppress the browser default; hosts that
    /// need that call [`Navigator::handle_click`] from their event handler.
    pub fn attach(&self, mut events: mpsc::UnboundedReceiver<ShellEvent>) {
        let navigator = self.clone();
        let lifecycle = self.inner.lifecycle.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = lifecycle.cancelled() => break,
                    event = events.recv() => match event {
                        Some(event) => navigator.dispatch(event),
                        None => break,
                    },
                }
            }
            tracing::debug!("Shell event subscription closed");
        });
        self.inner.subscriptions.lock().push(handle);
    }

    /// Detach every subscription and cancel all in-flight work.
    pub fn destroy(&self) {
        if self.inner.lifecycle.is_cancelled() {
            return;
        }
        self.inner.lifecycle.cancel();
        let subscriptions = std::mem::take(&mut *self.inner.subscriptions.lock());
        for handle in &subscriptions {
            handle.abort();
        }
        tracing::info!(subscriptions = subscriptions.len(), "Navigator destroyed");
    }

    fn dispatch(&self, event: ShellEvent) {
        match event {
            ShellEvent::Click(click) => {
                self.handle_click(&click);
            }
            ShellEvent::Hover(hover) => {
                self.handle_hover(&hover);
            }
            ShellEvent::PopState(path) => {
                self.handle_pop_state(&path);
            }
        }
    }

    /// Intercept a link click.
    ///
    /// In-app links push a history entry and start a navigation; clicks that
    /// arrive while a navigation is running are swallowed without either.
    pub fn handle_click(&self, click: &LinkClick) -> ClickOutcome {
        if click.modified || self.is_destroyed() {
            return ClickOutcome::PassThrough;
        }
        // In-page anchors are left to the browser so it can scroll.
        let LinkTarget::Route(route) = self.classify(&click.href, click.target.as_deref()) else {
            return ClickOutcome::PassThrough;
        };
        let Some(guard) = self.inner.session.try_begin(&self.inner.lifecycle) else {
            tracing::debug!(route = %route, "Click dropped, navigation in progress");
            return ClickOutcome::Dropped;
        };

        self.inner.shell.push_history(&self.inner.paths.public_path(&route));
        let navigator = self.clone();
        ClickOutcome::Started(tokio::spawn(async move { navigator.run(guard, route).await }))
    }

    /// Prefetch an in-app link hovered with a mouse.
    pub fn handle_hover(&self, hover: &LinkHover) -> Option<JoinHandle<()>> {
        if !self.inner.prefetch.on_hover || hover.pointer != PointerKind::Mouse {
            return None;
        }
        let route = self.classify(&hover.href, hover.target.as_deref()).into_route()?;
        self.prefetch_route(route)
    }

    /// Show the page for a history entry the browser moved to. Nothing is pushed.
    pub fn handle_pop_state(&self, path: &str) -> Option<JoinHandle<NavOutcome>> {
        let route = self.inner.paths.normalize(path);
        let Some(guard) = self.inner.session.try_begin(&self.inner.lifecycle) else {
            tracing::debug!(route = %route, "History navigation dropped, navigation in progress");
            return None;
        };
        let navigator = self.clone();
        Some(tokio::spawn(async move { navigator.run(guard, route).await }))
    }

    /// Navigate to a raw path.
    ///
    /// Returns [`NavOutcome::Dropped`] immediately if a navigation is already running.
    pub async fn navigate(&self, path: &str) -> NavOutcome {
        let route = self.inner.paths.normalize(path);
        match self.inner.session.try_begin(&self.inner.lifecycle) {
            Some(guard) => self.run(guard, route).await,
            None => {
                tracing::debug!(route = %route, "Navigation dropped, navigation in progress");
                NavOutcome::Dropped
            }
        }
    }

    async fn run(&self, guard: NavGuard, route: RoutePath) -> NavOutcome {
        let span = tracing::info_span!("navigate", nav_id = %Uuid::new_v4(), route = %route);

        async move {
            let start = Instant::now();
            let outcome = match self.attempt(&guard, &route).await {
                Ok(()) => NavOutcome::Completed,
                Err(NavError::Cancelled) => NavOutcome::Cancelled,
                Err(err) => {
                    tracing::warn!(error = %err, fallback = %self.inner.not_found, "Navigation failed");
                    self.fall_back(&guard).await
                }
            };

            metrics::record_navigation(outcome.as_str(), start);
            tracing::debug!(outcome = outcome.as_str(), elapsed = ?start.elapsed(), "Navigation finished");
            drop(guard);
            outcome
        }
        .instrument(span)
        .await
    }

    async fn fall_back(&self, guard: &NavGuard) -> NavOutcome {
        match self.attempt(guard, &self.inner.not_found).await {
            Ok(()) => NavOutcome::Recovered,
            Err(NavError::Cancelled) => NavOutcome::Cancelled,
            Err(err) => {
                tracing::error!(error = %err, "Fallback navigation failed");
                self.inner.shell.set_content(&self.inner.error_html);
                NavOutcome::Failed
            }
        }
    }

    async fn attempt(&self, guard: &NavGuard, route: &RoutePath) -> Result<(), NavError> {
        let token = guard.renew_token();

        let (html, ()) = token
            .run_until_cancelled(async {
                tokio::join!(
                    self.fetch_route(route, &token),
                    self.inner.shell.exit_transition()
                )
            })
            .await
            .ok_or(NavError::Cancelled)?;
        let html = html?;
        if token.is_cancelled() {
            return Err(NavError::Cancelled);
        }

        // A pending page init is abandoned when the navigator is destroyed,
        // before the route is recorded as current.
        token
            .run_until_cancelled(self.replace_content(&html, route))
            .await
            .ok_or(NavError::Cancelled)??;
        self.inner.shell.enter_transition();
        Ok(())
    }

    /// Fetch the fragment for a raw path, cache first.
    pub async fn fetch_page(&self, path: &str, cancel: &CancellationToken) -> Result<String, FetchError> {
        let route = self.inner.paths.normalize(path);
        self.fetch_route(&route, cancel).await
    }

    async fn fetch_route(&self, route: &RoutePath, cancel: &CancellationToken) -> Result<String, FetchError> {
        let cached = self.inner.cache.lock().get(route);
        metrics::record_cache_lookup(cached.is_some());
        if let Some(html) = cached {
            tracing::trace!(route = %route, "Cache hit");
            return Ok(html);
        }

        let url = self
            .inner
            .paths
            .content_url(route)
            .map_err(|source| FetchError::Url {
                route: route.to_string(),
                source,
            })?;
        let html = self.inner.fetcher.fetch_text(&url, cancel).await?;

        if let Some(evicted) = self.inner.cache.lock().set(route.clone(), html.clone()) {
            tracing::trace!(route = %evicted, "Evicted from cache");
        }
        Ok(html)
    }

    /// Swap `html` in for `path`, set the title, run the page's init hook and
    /// refresh active-link styling.
    pub async fn replace_content(&self, html: &str, route: &RoutePath) -> Result<(), InitError> {
        let shell = &self.inner.shell;
        shell.set_content(html);
        shell.set_title(self.inner.titles.get(route.as_str()));

        if self.inner.hooks.run(route).await? {
            tracing::debug!(route = %route, "Page init finished");
        }

        self.inner.session.set_current(route);
        shell.mark_active(route);
        Ok(())
    }

    /// Warm the cache for a raw path in the background.
    ///
    /// Each route is attempted at most once per session, successful or not.
    /// Returns `None` when the prefetch was skipped.
    pub fn prefetch(&self, path: &str) -> Option<JoinHandle<()>> {
        self.prefetch_route(self.inner.paths.normalize(path))
    }

    fn prefetch_route(&self, route: RoutePath) -> Option<JoinHandle<()>> {
        if !self.inner.prefetch.enabled || self.is_destroyed() {
            return None;
        }
        if self.inner.cache.lock().contains(&route) {
            metrics::record_prefetch("cached");
            return None;
        }
        if !self.inner.session.mark_prefetched(&route) {
            metrics::record_prefetch("repeat");
            return None;
        }

        let navigator = self.clone();
        // Tied to the navigator's lifetime, not to any navigation.
        let token = self.inner.lifecycle.child_token();
        Some(tokio::spawn(async move {
            match navigator.fetch_route(&route, &token).await {
                Ok(_) => {
                    metrics::record_prefetch("ok");
                    tracing::debug!(route = %route, "Prefetched");
                }
                Err(err) => {
                    metrics::record_prefetch("error");
                    tracing::debug!(route = %route, error = %err, "Prefetch failed");
                }
            }
        }))
    }

    /// Emit a speculation-rules hint for every rendered in-app link.
    ///
    /// Returns whether a hint was emitted.
    pub fn emit_speculation_hints(&self) -> bool {
        let shell = &self.inner.shell;
        if !shell.supports_speculation_rules() {
            return false;
        }

        let document = self.document_url();
        let urls: Vec<String> = shell
            .rendered_links()
            .iter()
            .filter_map(|href| {
                self.inner
                    .paths
                    .classify_link(href, None, &document)
                    .into_route()
            })
            .map(|route| route.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if urls.is_empty() {
            return false;
        }

        match speculation_rules(&urls) {
            Ok(rules) => {
                shell.emit_speculation_rules(&rules);
                tracing::debug!(links = urls.len(), "Speculation rules emitted");
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "Speculation rules not emitted");
                false
            }
        }
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("base_path", &self.inner.paths.base_path())
            .field("navigating", &self.is_navigating())
            .field("current", &self.current_route())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
