//! Create / edit screen for class sessions. Administrators only.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use tracing::{info, warn};

use super::{Outcome, Route};
use crate::forms::{SessionField, SessionForm, ValidationError};
use crate::net::GENERIC_ERROR;
use crate::net::sessions::SessionApi;
use crate::net::teachers::TeacherApi;
use crate::net::types::{SessionId, Teacher};
use crate::state::session::SessionStore;

pub const CREATED_MESSAGE: &str = "Session created !";
pub const UPDATED_MESSAGE: &str = "Session updated !";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(SessionId),
}

impl FormMode {
    /// Any path mentioning `update` opens in edit mode for the id it names.
    fn from_path(path: &str) -> Option<Self> {
        if !path.contains("update") {
            return Some(Self::Create);
        }
        match Route::parse(path) {
            Route::SessionUpdate(id) => Some(Self::Update(id)),
            _ => None,
        }
    }
}

/// Result of opening the form.
#[derive(Debug)]
pub enum FormEntry {
    Page(SessionFormPage),
    Redirect(Route),
}

#[derive(Debug, Clone)]
pub struct SessionFormPage {
    mode: FormMode,
    form: SessionForm,
    teachers: Vec<Teacher>,
    on_error: bool,
}

impl SessionFormPage {
    /// Open the form for `path`. Non-administrators are sent back to the
    /// sessions list; in edit mode the current values are fetched and
    /// prefilled.
    pub async fn open(
        path: &str,
        store: &SessionStore,
        sessions: &dyn SessionApi,
        teachers: &dyn TeacherApi,
    ) -> FormEntry {
        if !store.is_admin() {
            return FormEntry::Redirect(Route::Sessions);
        }
        let Some(mode) = FormMode::from_path(path) else {
            return FormEntry::Redirect(Route::NotFound);
        };
        let mut page = Self { mode, form: SessionForm::new(), teachers: Vec::new(), on_error: false };

        match teachers.all().await {
            Ok(list) => page.teachers = list,
            Err(err) => {
                warn!(error = %err, "teacher list fetch failed");
                page.on_error = true;
            }
        }
        if let FormMode::Update(id) = mode {
            match sessions.detail(id).await {
                Ok(session) => page.form = SessionForm::from_payload(&session.to_payload()),
                Err(err) => {
                    warn!(session_id = id, error = %err, "session fetch for edit failed");
                    page.on_error = true;
                }
            }
        }
        FormEntry::Page(page)
    }

    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    #[must_use]
    pub fn on_update(&self) -> bool {
        matches!(self.mode, FormMode::Update(_))
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        if self.on_update() { "Update session" } else { "Create session" }
    }

    #[must_use]
    pub fn form(&self) -> &SessionForm {
        &self.form
    }

    pub fn set(&mut self, field: SessionField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Options for the teacher selector.
    #[must_use]
    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.on_error.then_some(GENERIC_ERROR)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError`] without calling the backend when the
    /// form is invalid or a value does not convert.
    pub async fn submit(&mut self, sessions: &dyn SessionApi) -> Result<Outcome, ValidationError> {
        let payload = self.form.session_payload().inspect_err(|_| self.form.mark_all_dirty())?;
        let result = match self.mode {
            FormMode::Create => sessions.create(&payload).await.map(|s| (s.id, CREATED_MESSAGE)),
            FormMode::Update(id) => sessions.update(id, &payload).await.map(|s| (s.id, UPDATED_MESSAGE)),
        };
        match result {
            Ok((id, message)) => {
                info!(session_id = id, mode = ?self.mode, "session saved");
                self.on_error = false;
                Ok(Outcome::notify(message, Route::Sessions))
            }
            Err(err) => {
                warn!(mode = ?self.mode, error = %err, kind = ?err.kind(), "session save failed");
                self.on_error = true;
                Ok(Outcome::stay())
            }
        }
    }
}
