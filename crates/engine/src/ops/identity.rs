use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use tracing::{info, warn};

use crate::{
    EngineError, ResultEngine, Session, UserId, balance,
    credentials::{self, Verification},
    family_members, goals, history, users,
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates an account together with its zero balance, zero goal and the
    /// seeded `Self` member. Either all rows are written or none.
    ///
    /// The username is stored exactly as given; only a blank one is refused.
    pub async fn register(&self, username: &str, password: &str) -> ResultEngine<UserId> {
        if username.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }
        let username = username.to_string();
        if password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        let password_hash = credentials::hash_password(password)?;

        with_tx!(self, |db_tx| {
            let taken = users::Entity::find()
                .filter(users::Column::Username.eq(username.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::AlreadyExists(username));
            }

            let user = users::ActiveModel {
                id: ActiveValue::NotSet,
                username: ActiveValue::Set(username.clone()),
                password_hash: ActiveValue::Set(password_hash),
            }
            .insert(&db_tx)
            .await?;

            insert_zero_balance(&db_tx, user.id).await?;
            insert_zero_goal(&db_tx, user.id).await?;
            family_members::ActiveModel::seeded_self(user.id)
                .insert(&db_tx)
                .await?;

            info!(user_id = user.id, "registered account");
            Ok(user.id)
        })
    }

    /// Verifies credentials and opens a session.
    ///
    /// Accounts missing their balance, goal or member rows are repaired on
    /// the way in; legacy SHA-256 digests are replaced by Argon2 hashes.
    pub async fn login(&self, username: &str, password: &str) -> ResultEngine<Session> {
        let username = username.to_string();

        let result: ResultEngine<UserId> = with_tx!(self, |db_tx| {
            let Some(user) = users::Entity::find()
                .filter(users::Column::Username.eq(username.clone()))
                .one(&db_tx)
                .await?
            else {
                warn!("rejected login for unknown account");
                return Err(EngineError::InvalidCredentials);
            };

            match credentials::verify_password(password, &user.password_hash)? {
                Verification::Valid => {}
                Verification::Legacy => {
                    let upgraded = credentials::hash_password(password)?;
                    let mut active: users::ActiveModel = user.clone().into();
                    active.password_hash = ActiveValue::Set(upgraded);
                    active.update(&db_tx).await?;
                    info!(user_id = user.id, "upgraded legacy password digest");
                }
                Verification::Invalid => {
                    warn!(user_id = user.id, "rejected login: wrong password");
                    return Err(EngineError::InvalidCredentials);
                }
            }

            if backfill_owned_rows(&db_tx, user.id).await? {
                warn!(user_id = user.id, "repaired missing account rows at login");
            }
            Ok(user.id)
        });
        let user_id = result?;

        let session = Session::new(user_id, username);
        self.open_session(&session).await;
        info!(user_id, "logged in");
        Ok(session)
    }

    /// Invalidates `session`. Later calls with it fail with `NotAuthenticated`.
    pub async fn logout(&self, session: &Session) -> ResultEngine<()> {
        if !self.close_session(session).await {
            return Err(EngineError::NotAuthenticated);
        }
        info!(user_id = session.user_id(), "logged out");
        Ok(())
    }

    /// Deletes the account and everything it owns, then invalidates every
    /// session of that user.
    pub async fn delete_account(&self, session: &Session) -> ResultEngine<()> {
        let user_id = self.authenticate(session).await?;

        let result: ResultEngine<()> = with_tx!(self, |db_tx| {
            history::Entity::delete_many()
                .filter(history::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;
            family_members::Entity::delete_many()
                .filter(family_members::Column::OwnerId.eq(user_id))
                .exec(&db_tx)
                .await?;
            balance::Entity::delete_by_id(user_id).exec(&db_tx).await?;
            goals::Entity::delete_by_id(user_id).exec(&db_tx).await?;
            users::Entity::delete_by_id(user_id).exec(&db_tx).await?;
            Ok(())
        });
        result?;

        self.close_user_sessions(user_id).await;
        info!(user_id, "deleted account");
        Ok(())
    }
}

async fn insert_zero_balance(db_tx: &DatabaseTransaction, user_id: UserId) -> ResultEngine<()> {
    balance::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        amount_minor: ActiveValue::Set(0),
    }
    .insert(db_tx)
    .await?;
    Ok(())
}

async fn insert_zero_goal(db_tx: &DatabaseTransaction, user_id: UserId) -> ResultEngine<()> {
    goals::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        target_minor: ActiveValue::Set(0),
    }
    .insert(db_tx)
    .await?;
    Ok(())
}

/// Recreates the per-user rows older databases may lack. Returns whether
/// anything was written; running it twice writes nothing the second time.
async fn backfill_owned_rows(db_tx: &DatabaseTransaction, user_id: UserId) -> ResultEngine<bool> {
    let mut repaired = false;

    if balance::Entity::find_by_id(user_id).one(db_tx).await?.is_none() {
        insert_zero_balance(db_tx, user_id).await?;
        repaired = true;
    }
    if goals::Entity::find_by_id(user_id).one(db_tx).await?.is_none() {
        insert_zero_goal(db_tx, user_id).await?;
        repaired = true;
    }

    let has_member = family_members::Entity::find()
        .filter(family_members::Column::OwnerId.eq(user_id))
        .one(db_tx)
        .await?
        .is_some();
    if !has_member {
        family_members::ActiveModel::seeded_self(user_id)
            .insert(db_tx)
            .await?;
        repaired = true;
    }

    Ok(repaired)
}
