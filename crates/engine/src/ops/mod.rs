use std::collections::HashMap;

use sea_orm::DatabaseConnection;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Session, UserId};

mod analytics;
mod balances;
mod family;
mod identity;
mod ledger;

pub use balances::GoalProgress;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    /// Live session tokens and the user each one is bound to.
    sessions: RwLock<HashMap<Uuid, UserId>>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Resolve a session to its user, failing once it was logged out.
    async fn authenticate(&self, session: &Session) -> ResultEngine<UserId> {
        let sessions = self.sessions.read().await;
        match sessions.get(&session.token()) {
            Some(user_id) if *user_id == session.user_id() => Ok(*user_id),
            _ => Err(EngineError::NotAuthenticated),
        }
    }

    async fn open_session(&self, session: &Session) {
        self.sessions
            .write()
            .await
            .insert(session.token(), session.user_id());
    }

    async fn close_session(&self, session: &Session) -> bool {
        self.sessions
            .write()
            .await
            .remove(&session.token())
            .is_some()
    }

    async fn close_user_sessions(&self, user_id: UserId) {
        self.sessions
            .write()
            .await
            .retain(|_, owner| *owner != user_id);
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            sessions: RwLock::new(HashMap::new()),
        })
    }
}
