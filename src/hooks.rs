//! Page-initialization hooks.
//!
//! # Contract
//! - A hook is registered per route and takes no arguments
//! - It runs after the fragment for its route is swapped in
//! - It may finish synchronously or hand back a pending future, which the
//!   navigator awaits before the navigation completes
//! - Any error, synchronous or from the future, fails the navigation
//!
//! Hooks should be idempotent: revisiting a route runs its hook again.
//! [`PageInitRegistry::register_once`] guards widgets that must not be set up twice.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::error::{BoxError, InitError};
use crate::route::RoutePath;

/// What a hook hands back when called.
pub enum InitOutcome {
    /// Setup finished synchronously.
    Ready,
    /// Setup continues in this future.
    Pending(BoxFuture<'static, Result<(), BoxError>>),
}

/// A registered page-init hook.
pub type PageInitFn = Arc<dyn Fn() -> Result<InitOutcome, BoxError> + Send + Sync>;

/// Route → page-init hook table supplied by the host application.
#[derive(Clone, Default)]
pub struct PageInitRegistry {
    hooks: HashMap<String, PageInitFn>,
}

impl PageInitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw hook.
    pub fn with_hook(mut self, route: &str, hook: PageInitFn) -> Self {
        self.hooks.insert(RoutePath::new(route).as_str().to_string(), hook);
        self
    }

    /// Register a synchronous hook.
    pub fn register<F>(self, route: &str, hook: F) -> Self
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.with_hook(route, Arc::new(move || hook().map(|()| InitOutcome::Ready)))
    }

    /// Register an asynchronous hook.
    pub fn register_async<F, Fut>(self, route: &str, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.with_hook(route, Arc::new(move || Ok(InitOutcome::Pending(hook().boxed()))))
    }

    /// Register an asynchronous hook that runs on the first visit only.
    pub fn register_once<F, Fut>(self, route: &str, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let started = AtomicBool::new(false);
        self.with_hook(
            route,
            Arc::new(move || {
                if started.swap(true, Ordering::SeqCst) {
                    return Ok(InitOutcome::Ready);
                }
                Ok(InitOutcome::Pending(hook().boxed()))
            }),
        )
    }

    pub fn contains(&self, route: &RoutePath) -> bool {
        self.hooks.contains_key(route.as_str())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run the hook for `route`, awaiting it if it is pending.
    ///
    /// Returns `Ok(false)` when no hook is registered.
    pub async fn run(&self, route: &RoutePath) -> Result<bool, InitError> {
        let Some(hook) = self.hooks.get(route.as_str()) else {
            return Ok(false);
        };
        let fail = |source| InitError {
            route: route.to_string(),
            source,
        };

        match hook().map_err(fail)? {
            InitOutcome::Ready => {}
            InitOutcome::Pending(pending) => {
                tracing::trace!(route = %route, "Awaiting page init");
                pending.await.map_err(fail)?;
            }
        }
        Ok(true)
    }
}

impl fmt::Debug for PageInitRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<_> = self.hooks.keys().collect();
        routes.sort();
        f.debug_struct("PageInitRegistry").field("routes", &routes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_sync_and_async_hooks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (sync_calls, async_calls) = (calls.clone(), calls.clone());

        let registry = PageInitRegistry::new()
            .register("/about", move || {
                sync_calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .register_async("/gallery", move || {
                let calls = async_calls.clone();
                async move {
                    tokio::task::yield_now().await;
                    calls.fetch_add(10, Ordering::SeqCst);
                    Ok(())
                }
            });

        assert!(registry.run(&RoutePath::new("/about")).await.unwrap());
        assert!(registry.run(&RoutePath::new("/gallery")).await.unwrap());
        assert!(!registry.run(&RoutePath::new("/contact")).await.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 11);
    }

    #[tokio::test]
    async fn test_errors_become_init_errors() {
        let registry = PageInitRegistry::new()
            .register("/sync", || Err("chart canvas missing".into()))
            .register_async("/async", || async { Err::<(), BoxError>("lightbox failed".into()) });

        let err = registry.run(&RoutePath::new("/sync")).await.unwrap_err();
        assert_eq!(err.route, "/sync");
        assert_eq!(err.source.to_string(), "chart canvas missing");

        let err = registry.run(&RoutePath::new("/async")).await.unwrap_err();
        assert_eq!(err.source.to_string(), "lightbox failed");
    }

    #[tokio::test]
    async fn test_register_once_guards_double_init() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let registry = PageInitRegistry::new().register_once("/skills", move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        let route = RoutePath::new("/skills");
        registry.run(&route).await.unwrap();
        registry.run(&route).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
