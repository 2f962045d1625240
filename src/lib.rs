//! Client core for the yoga studio booking app.
//!
//! SYSTEM CONTEXT
//! ==============
//! The studio backend exposes a small REST API (auth, class sessions,
//! teachers, users). This crate holds everything a front end needs on top
//! of it: the login-session store, form validation, one gateway per
//! resource, and view models that reproduce each screen's control flow
//! (what gets fetched, where the user is sent, which message is shown).
//!
//! Nothing here renders. A UI layer binds to the view models in [`pages`];
//! the `yoga-cli` binary drives the gateways directly.

pub mod config;
pub mod forms;
pub mod guards;
pub mod net;
pub mod pages;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::ClientConfig;
pub use net::ApiClient;
pub use state::session::SessionStore;
