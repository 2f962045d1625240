//! Login screen.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use tracing::warn;

use super::{Outcome, Route};
use crate::forms::{LoginField, LoginForm, ValidationError};
use crate::net::GENERIC_ERROR;
use crate::net::auth::AuthApi;
use crate::state::session::SessionStore;

#[derive(Debug, Clone)]
pub struct LoginPage {
    form: LoginForm,
    hide_password: bool,
    on_error: bool,
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginPage {
    #[must_use]
    pub fn new() -> Self {
        Self { form: LoginForm::new(), hide_password: true, on_error: false }
    }

    #[must_use]
    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    pub fn set(&mut self, field: LoginField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    #[must_use]
    pub fn hide_password(&self) -> bool {
        self.hide_password
    }

    pub fn toggle_password_visibility(&mut self) {
        self.hide_password = !self.hide_password;
    }

    #[must_use]
    pub fn on_error(&self) -> bool {
        self.on_error
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.on_error.then_some(GENERIC_ERROR)
    }

    /// Exchange the credentials and, on success, log the user in and head
    /// to the sessions list. Any rejection keeps the user here.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] without calling the backend when the
    /// form is invalid.
    pub async fn submit(&mut self, auth: &dyn AuthApi, store: &SessionStore) -> Result<Outcome, ValidationError> {
        let request = self.form.login_request().inspect_err(|_| self.form.mark_all_dirty())?;
        match auth.login(&request).await {
            Ok(info) => {
                self.on_error = false;
                store.log_in(info);
                Ok(Outcome::to(Route::Sessions))
            }
            Err(err) => {
                warn!(error = %err, kind = ?err.kind(), "login failed");
                self.on_error = true;
                Ok(Outcome::stay())
            }
        }
    }
}
