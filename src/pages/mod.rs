//! View models for each screen.
//!
//! SYSTEM CONTEXT
//! ==============
//! A view model owns what one screen shows (form, fetched data, error
//! flag) and runs its actions against the gateway traits. Actions never
//! return gateway errors: they log, set the page's error flag, and tell the
//! caller where to go next through an [`Outcome`]. The only error an action
//! returns is a [`ValidationError`](crate::forms::ValidationError) for a
//! submit attempted on an invalid form, which never reaches the network.

pub mod detail;
pub mod form;
pub mod login;
pub mod me;
pub mod register;
pub mod sessions;
pub mod shell;



use std::time::Duration;

use crate::net::types::SessionId;

pub const SNACKBAR_ACTION: &str = "Close";
pub const SNACKBAR_DURATION: Duration = Duration::from_millis(3000);

// =============================================================================
// ROUTES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Sessions,
    SessionDetail(SessionId),
    SessionCreate,
    SessionUpdate(SessionId),
    Me,
    NotFound,
    /// Browser history back.
    Back,
}

impl Route {
    /// Path without a leading slash, as the router sees it.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Self::Home => String::new(),
            Self::Login => "login".to_owned(),
            Self::Register => "register".to_owned(),
            Self::Sessions => "sessions".to_owned(),
            Self::SessionDetail(id) => format!("sessions/detail/{id}"),
            Self::SessionCreate => "sessions/create".to_owned(),
            Self::SessionUpdate(id) => format!("sessions/update/{id}"),
            Self::Me => "me".to_owned(),
            Self::NotFound => "404".to_owned(),
            Self::Back => "..".to_owned(),
        }
    }

    /// Resolve a URL path. Unknown paths map to [`Route::NotFound`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["sessions"] => Self::Sessions,
            ["sessions", "create"] => Self::SessionCreate,
            ["sessions", "detail", id] => id.parse().map_or(Self::NotFound, Self::SessionDetail),
            ["sessions", "update", id] => id.parse().map_or(Self::NotFound, Self::SessionUpdate),
            ["me"] => Self::Me,
            _ => Self::NotFound,
        }
    }
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// Transient confirmation shown after a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snackbar {
    pub message: String,
    pub action: &'static str,
    pub duration: Duration,
}

impl Snackbar {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), action: SNACKBAR_ACTION, duration: SNACKBAR_DURATION }
    }
}

/// What the view should do after an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub snackbar: Option<Snackbar>,
    pub navigate: Option<Route>,
}

impl Outcome {
    /// Remain on the current view.
    #[must_use]
    pub fn stay() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn to(route: Route) -> Self {
        Self { snackbar: None, navigate: Some(route) }
    }

    #[must_use]
    pub fn notify(message: impl Into<String>, route: Route) -> Self {
        Self { snackbar: Some(Snackbar::new(message)), navigate: Some(route) }
    }

    #[must_use]
    pub fn is_stay(&self) -> bool {
        self.navigate.is_none()
    }
}
