//! Class-session list, plus the action set shared with the detail screen.

#[cfg(test)]
#[path = "sessions_test.rs"]
mod sessions_test;

use tracing::warn;

use super::Route;
use crate::net::GENERIC_ERROR;
use crate::net::sessions::SessionApi;
use crate::net::types::{ClassSession, SessionId};
use crate::state::session::SessionStore;

pub const LIST_TITLE: &str = "Rentals available";

/// Buttons a screen may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Detail,
    Edit,
    Delete,
    Participate,
    DoNotParticipate,
}

impl Action {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Detail => "Detail",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
            Self::Participate => "Participate",
            Self::DoNotParticipate => "Do not participate",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionListPage {
    sessions: Vec<ClassSession>,
    is_admin: bool,
    on_error: bool,
}

impl SessionListPage {
    /// Fetch every session once. A failure leaves the list empty.
    pub async fn load(api: &dyn SessionApi, store: &SessionStore) -> Self {
        let is_admin = store.is_admin();
        match api.all().await {
            Ok(sessions) => Self { sessions, is_admin, on_error: false },
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "session list fetch failed");
                Self { sessions: Vec::new(), is_admin, on_error: true }
            }
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        LIST_TITLE
    }

    #[must_use]
    pub fn sessions(&self) -> &[ClassSession] {
        &self.sessions
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.on_error.then_some(GENERIC_ERROR)
    }

    /// Page-level buttons: `Create` for administrators only.
    #[must_use]
    pub fn page_actions(&self) -> Vec<Action> {
        if self.is_admin { vec![Action::Create] } else { Vec::new() }
    }

    /// Per-item buttons: `Detail` for everyone, `Edit` for administrators.
    #[must_use]
    pub fn item_actions(&self) -> Vec<Action> {
        if self.is_admin {
            vec![Action::Detail, Action::Edit]
        } else {
            vec![Action::Detail]
        }
    }

    /// Where a list button leads. `None` for actions the list does not
    /// offer.
    #[must_use]
    pub fn navigate(action: Action, id: Option<SessionId>) -> Option<Route> {
        match (action, id) {
            (Action::Create, _) => Some(Route::SessionCreate),
            (Action::Detail, Some(id)) => Some(Route::SessionDetail(id)),
            (Action::Edit, Some(id)) => Some(Route::SessionUpdate(id)),
            _ => None,
        }
    }
}
