//! Class-session detail screen.
//!
//! DESIGN
//! ======
//! Participation is never patched locally. After a participate or
//! un-participate call the screen refetches the session (and its teacher),
//! so [`DetailPage::participation`] always reflects what the backend holds.

#[cfg(test)]
#[path = "detail_test.rs"]
mod detail_test;

use tracing::{info, warn};

use super::sessions::Action;
use super::{Outcome, Route};
use crate::net::GENERIC_ERROR;
use crate::net::error::ApiError;
use crate::net::sessions::SessionApi;
use crate::net::teachers::TeacherApi;
use crate::net::types::{ClassSession, SessionId, Teacher, UserId};
use crate::state::session::SessionStore;

pub const DELETED_MESSAGE: &str = "Session deleted !";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipationState {
    NotParticipating,
    Participating,
}

#[derive(Debug, Clone)]
pub struct DetailPage {
    session_id: SessionId,
    user_id: Option<UserId>,
    is_admin: bool,
    session: Option<ClassSession>,
    teacher: Option<Teacher>,
    on_error: bool,
}

impl DetailPage {
    #[must_use]
    pub fn new(session_id: SessionId, store: &SessionStore) -> Self {
        Self {
            session_id,
            user_id: store.user_id(),
            is_admin: store.is_admin(),
            session: None,
            teacher: None,
            on_error: false,
        }
    }

    /// Fetch the session, then its teacher.
    pub async fn load(&mut self, sessions: &dyn SessionApi, teachers: &dyn TeacherApi) {
        let session = match sessions.detail(self.session_id).await {
            Ok(session) => session,
            Err(err) => return self.fail("session fetch", &err),
        };
        let teacher_id = session.teacher_id;
        self.session = Some(session);
        match teachers.detail(teacher_id).await {
            Ok(teacher) => {
                self.teacher = Some(teacher);
                self.on_error = false;
            }
            Err(err) => self.fail("teacher fetch", &err),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&ClassSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn teacher(&self) -> Option<&Teacher> {
        self.teacher.as_ref()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    #[must_use]
    pub fn is_participate(&self) -> bool {
        match (&self.session, self.user_id) {
            (Some(session), Some(user_id)) => session.has_participant(user_id),
            _ => false,
        }
    }

    #[must_use]
    pub fn participation(&self) -> ParticipationState {
        if self.is_participate() {
            ParticipationState::Participating
        } else {
            ParticipationState::NotParticipating
        }
    }

    #[must_use]
    pub fn attendee_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.participants.len())
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.on_error.then_some(GENERIC_ERROR)
    }

    /// Administrators may delete; everyone else toggles participation.
    #[must_use]
    pub fn actions(&self) -> Vec<Action> {
        if self.is_admin {
            vec![Action::Delete]
        } else if self.is_participate() {
            vec![Action::DoNotParticipate]
        } else {
            vec![Action::Participate]
        }
    }

    pub async fn participate(&mut self, sessions: &dyn SessionApi, teachers: &dyn TeacherApi) {
        let Some(user_id) = self.user_id else {
            warn!(session_id = self.session_id, "participate without a logged-in user");
            return;
        };
        match sessions.participate(self.session_id, user_id).await {
            Ok(()) => {
                info!(session_id = self.session_id, user_id, "participating");
                self.load(sessions, teachers).await;
            }
            Err(err) => self.fail("participate", &err),
        }
    }

    pub async fn un_participate(&mut self, sessions: &dyn SessionApi, teachers: &dyn TeacherApi) {
        let Some(user_id) = self.user_id else {
            warn!(session_id = self.session_id, "un-participate without a logged-in user");
            return;
        };
        match sessions.un_participate(self.session_id, user_id).await {
            Ok(()) => {
                info!(session_id = self.session_id, user_id, "no longer participating");
                self.load(sessions, teachers).await;
            }
            Err(err) => self.fail("un-participate", &err),
        }
    }

    /// Delete the session and return to the list with a confirmation.
    pub async fn delete(&mut self, sessions: &dyn SessionApi) -> Outcome {
        match sessions.delete(self.session_id).await {
            Ok(()) => {
                info!(session_id = self.session_id, "session deleted");
                Outcome::notify(DELETED_MESSAGE, Route::Sessions)
            }
            Err(err) => {
                self.fail("session delete", &err);
                Outcome::stay()
            }
        }
    }

    #[must_use]
    pub fn back(&self) -> Outcome {
        Outcome::to(Route::Back)
    }

    fn fail(&mut self, action: &str, err: &ApiError) {
        warn!(session_id = self.session_id, action, error = %err, kind = ?err.kind(), "detail action failed");
        self.on_error = true;
    }
}
