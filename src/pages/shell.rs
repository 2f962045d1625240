//! App bar: navigation links that follow the logged state, and logout.

#[cfg(test)]
#[path = "shell_test.rs"]
mod shell_test;

use super::{Outcome, Route};
use crate::state::session::{LoggedState, SessionStore};

#[derive(Debug, Clone)]
pub struct AppShell {
    store: SessionStore,
}

impl AppShell {
    #[must_use]
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Logged-state stream driving which links are shown.
    #[must_use]
    pub fn logged_state(&self) -> LoggedState {
        self.store.observe_logged_state()
    }

    #[must_use]
    pub fn nav_links(logged: bool) -> &'static [Route] {
        if logged { &[Route::Sessions, Route::Me] } else { &[Route::Login, Route::Register] }
    }

    #[must_use]
    pub fn log_out(&self) -> Outcome {
        self.store.log_out();
        Outcome::to(Route::Home)
    }
}
