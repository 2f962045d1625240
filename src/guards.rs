//! Route guards.
//!
//! `AuthGuard` protects the signed-in area, `UnauthGuard` keeps signed-in
//! users away from the login and register screens.

#[cfg(test)]
#[path = "guards_test.rs"]
mod guards_test;

use tracing::debug;

use crate::pages::Route;
use crate::state::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

pub trait Guard {
    fn check(&self, store: &SessionStore) -> GuardDecision;
}

/// Lets navigation through only when logged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGuard;

/// Lets navigation through only when logged out.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnauthGuard;

impl Guard for AuthGuard {
    fn check(&self, store: &SessionStore) -> GuardDecision {
        if store.is_logged() {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(Route::Login)
        }
    }
}

impl Guard for UnauthGuard {
    fn check(&self, store: &SessionStore) -> GuardDecision {
        if store.is_logged() {
            GuardDecision::Redirect(Route::Sessions)
        } else {
            GuardDecision::Allow
        }
    }
}

/// Guard attached to `route`, if any.
#[must_use]
pub fn guard_for(route: Route) -> Option<&'static dyn Guard> {
    match route {
        Route::Login | Route::Register => Some(&UnauthGuard),
        Route::Sessions
        | Route::SessionDetail(_)
        | Route::SessionCreate
        | Route::SessionUpdate(_)
        | Route::Me => Some(&AuthGuard),
        Route::Home | Route::NotFound | Route::Back => None,
    }
}

/// Where a navigation to `route` actually lands.
#[must_use]
pub fn resolve(route: Route, store: &SessionStore) -> Route {
    match guard_for(route).map(|guard| guard.check(store)) {
        Some(GuardDecision::Redirect(target)) => {
            debug!(from = %route.path(), to = %target.path(), "guard redirect");
            target
        }
        Some(GuardDecision::Allow) | None => route,
    }
}
