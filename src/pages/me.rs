//! Account screen.

#[cfg(test)]
#[path = "me_test.rs"]
mod me_test;

use tracing::{info, warn};

use super::{Outcome, Route};
use crate::net::GENERIC_ERROR;
use crate::net::types::UserAccount;
use crate::net::users::UserApi;
use crate::state::session::SessionStore;

pub const ACCOUNT_DELETED_MESSAGE: &str = "Your account has been deleted !";

#[derive(Debug, Clone, Default)]
pub struct MePage {
    user: Option<UserAccount>,
    on_error: bool,
}

impl MePage {
    /// Fetch the logged-in user's account.
    pub async fn load(users: &dyn UserApi, store: &SessionStore) -> Self {
        let Some(user_id) = store.user_id() else {
            warn!("account page opened while logged out");
            return Self { user: None, on_error: true };
        };
        match users.get_by_id(user_id).await {
            Ok(user) => Self { user: Some(user), on_error: false },
            Err(err) => {
                warn!(user_id, error = %err, "account fetch failed");
                Self { user: None, on_error: true }
            }
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserAccount> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.on_error.then_some(GENERIC_ERROR)
    }

    /// Delete the account, log out and go home. On failure the user stays
    /// logged in here.
    pub async fn delete(&mut self, users: &dyn UserApi, store: &SessionStore) -> Outcome {
        let Some(user_id) = store.user_id() else {
            self.on_error = true;
            return Outcome::stay();
        };
        match users.delete(user_id).await {
            Ok(()) => {
                info!(user_id, "account deleted");
                store.log_out();
                Outcome::notify(ACCOUNT_DELETED_MESSAGE, Route::Home)
            }
            Err(err) => {
                warn!(user_id, error = %err, kind = ?err.kind(), "account delete failed");
                self.on_error = true;
                Outcome::stay()
            }
        }
    }

    #[must_use]
    pub fn back(&self) -> Outcome {
        Outcome::to(Route::Back)
    }
}
