//! Mutable navigation state and the in-flight guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashSet;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::route::RoutePath;

/// State shared by every navigation and prefetch of one navigator.
#[derive(Debug, Default)]
pub(crate) struct Session {
    navigating: AtomicBool,
    in_flight: Mutex<Option<CancellationToken>>,
    prefetched: DashSet<RoutePath>,
    current: Mutex<Option<RoutePath>>,
}

impl Session {
    /// Enter the `Navigating` state, or `None` if a navigation is already running
    /// or the navigator has been destroyed.
    pub(crate) fn try_begin(self: &Arc<Self>, lifecycle: &CancellationToken) -> Option<NavGuard> {
        if lifecycle.is_cancelled() {
            return None;
        }
        self.navigating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(NavGuard {
            session: Arc::clone(self),
            lifecycle: lifecycle.clone(),
        })
    }

    pub(crate) fn is_navigating(&self) -> bool {
        self.navigating.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn has_in_flight(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    /// Record a prefetch attempt. Returns `false` if `route` was attempted before.
    pub(crate) fn mark_prefetched(&self, route: &RoutePath) -> bool {
        self.prefetched.insert(route.clone())
    }

    pub(crate) fn was_prefetched(&self, route: &RoutePath) -> bool {
        self.prefetched.contains(route)
    }

    pub(crate) fn set_current(&self, route: &RoutePath) {
        *self.current.lock() = Some(route.clone());
    }

    pub(crate) fn current(&self) -> Option<RoutePath> {
        self.current.lock().clone()
    }
}

/// Proof that the holder owns the single navigation slot.
///
/// Dropping the guard clears the in-flight token and returns the session to
/// `Idle`, whether the navigation finished, failed, panicked or was aborted.
#[derive(Debug)]
pub(crate) struct NavGuard {
    session: Arc<Session>,
    lifecycle: CancellationToken,
}

impl NavGuard {
    /// Cancel the previous fetch, if any, and install a fresh token for the next one.
    pub(crate) fn renew_token(&self) -> CancellationToken {
        let token = self.lifecycle.child_token();
        if let Some(previous) = self.session.in_flight.lock().replace(token.clone()) {
            previous.cancel();
        }
        token
    }
}

impl Drop for NavGuard {
    fn drop(&mut self) {
        self.session.in_flight.lock().take();
        self.session.navigating.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_navigation_slot() {
        let session = Arc::new(Session::default());
        let lifecycle = CancellationToken::new();

        let guard = session.try_begin(&lifecycle).unwrap();
        assert!(session.is_navigating());
        assert!(session.try_begin(&lifecycle).is_none());

        drop(guard);
        assert!(!session.is_navigating());
        assert!(session.try_begin(&lifecycle).is_some());
    }

    #[test]
    fn test_renew_cancels_previous_token() {
        let session = Arc::new(Session::default());
        let lifecycle = CancellationToken::new();
        let guard = session.try_begin(&lifecycle).unwrap();

        let first = guard.renew_token();
        let second = guard.renew_token();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(session.has_in_flight());

        drop(guard);
        assert!(!session.has_in_flight());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_guard_released_on_panic() {
        let session = Arc::new(Session::default());
        let lifecycle = CancellationToken::new();

        let inner = Arc::clone(&session);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let guard = inner.try_begin(&lifecycle).unwrap();
            guard.renew_token();
            panic!("page init blew up");
        }));

        assert!(result.is_err());
        assert!(!session.is_navigating());
        assert!(!session.has_in_flight());
    }

    #[test]
    fn test_destroyed_lifecycle_refuses_navigation() {
        let session = Arc::new(Session::default());
        let lifecycle = CancellationToken::new();
        lifecycle.cancel();
        assert!(session.try_begin(&lifecycle).is_none());
    }

    #[test]
    fn test_prefetch_attempts_are_remembered() {
        let session = Session::default();
        let route = RoutePath::new("/gallery");
        assert!(session.mark_prefetched(&route));
        assert!(!session.mark_prefetched(&route));
        assert!(session.was_prefetched(&route));
    }
}
