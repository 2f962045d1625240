//! Registration screen.
//!
//! Every rejection, duplicate email included, shows the generic error and
//! keeps the user on this screen with the typed values intact.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use tracing::{info, warn};

use super::{Outcome, Route};
use crate::forms::{RegisterField, RegisterForm, ValidationError};
use crate::net::GENERIC_ERROR;
use crate::net::auth::AuthApi;

#[derive(Debug, Clone, Default)]
pub struct RegisterPage {
    form: RegisterForm,
    on_error: bool,
}

impl RegisterPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn form(&self) -> &RegisterForm {
        &self.form
    }

    pub fn set(&mut self, field: RegisterField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    #[must_use]
    pub fn on_error(&self) -> bool {
        self.on_error
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.on_error.then_some(GENERIC_ERROR)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError`] without calling the backend when the
    /// form is invalid.
    pub async fn submit(&mut self, auth: &dyn AuthApi) -> Result<Outcome, ValidationError> {
        let request = self.form.register_request().inspect_err(|_| self.form.mark_all_dirty())?;
        match auth.register(&request).await {
            Ok(()) => {
                info!("account registered");
                self.on_error = false;
                Ok(Outcome::to(Route::Login))
            }
            Err(err) => {
                warn!(error = %err, duplicate_email = err.is_duplicate_email(), "registration failed");
                self.on_error = true;
                Ok(Outcome::stay())
            }
        }
    }
}
