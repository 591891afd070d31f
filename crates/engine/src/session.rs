//! Authenticated session handle.
//!
//! Sessions are issued by [`Engine::login`] and must be passed to every other
//! operation. The engine keeps the set of live tokens, so a session stops
//! working as soon as it is logged out or its account is deleted.
//!
//! [`Engine::login`]: crate::Engine::login

use uuid::Uuid;

use crate::UserId;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Session {
    token: Uuid,
    user_id: UserId,
    username: String,
}

impl Session {
    pub(crate) fn new(user_id: UserId, username: String) -> Self {
        Self {
            token: Uuid::new_v4(),
            user_id,
            username,
        }
    }

    #[must_use]
    pub fn token(&self) -> Uuid {
        self.token
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}
