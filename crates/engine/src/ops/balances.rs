use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Money, ResultEngine, Session, UserId, analytics, balance, goals,
};

use super::{Engine, family::members_of, ledger::entries_of, with_tx};

/// How far the stored balance is towards the savings goal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub balance: Money,
    pub target: Money,
    /// `balance / target` clamped to `[0, 1]`; `0` when no positive target is set.
    pub ratio: f64,
}

impl GoalProgress {
    fn new(balance: Money, target: Money) -> Self {
        let ratio = if target.is_positive() {
            balance.ratio(target).unwrap_or(0.0).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            balance,
            target,
            ratio,
        }
    }
}

impl Engine {
    /// Stored balance of the session user (`0` if the row is missing).
    pub async fn get_balance(&self, session: &Session) -> ResultEngine<Money> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| stored_balance(&db_tx, user_id).await)
    }

    /// Overwrites the stored balance.
    pub async fn set_balance(&self, session: &Session, amount: Money) -> ResultEngine<()> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| {
            let row = balance::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                amount_minor: ActiveValue::Set(amount.minor()),
            };
            if balance::Entity::find_by_id(user_id).one(&db_tx).await?.is_some() {
                row.update(&db_tx).await?;
            } else {
                row.insert(&db_tx).await?;
            }
            info!(user_id, amount = amount.minor(), "set balance");
            Ok(())
        })
    }

    /// Savings goal of the session user (`0` if the row is missing).
    pub async fn get_goal(&self, session: &Session) -> ResultEngine<Money> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| stored_goal(&db_tx, user_id).await)
    }

    /// Overwrites the savings goal.
    pub async fn set_goal(&self, session: &Session, target: Money) -> ResultEngine<()> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| {
            let row = goals::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                target_minor: ActiveValue::Set(target.minor()),
            };
            if goals::Entity::find_by_id(user_id).one(&db_tx).await?.is_some() {
                row.update(&db_tx).await?;
            } else {
                row.insert(&db_tx).await?;
            }
            info!(user_id, target = target.minor(), "set goal");
            Ok(())
        })
    }

    pub async fn goal_progress(&self, session: &Session) -> ResultEngine<GoalProgress> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| {
            let balance = stored_balance(&db_tx, user_id).await?;
            let target = stored_goal(&db_tx, user_id).await?;
            Ok(GoalProgress::new(balance, target))
        })
    }

    /// Household total: the stored balance stands in for the owner, every
    /// other registry member contributes its derived balance.
    pub async fn family_balance(&self, session: &Session) -> ResultEngine<Money> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| {
            let entries = entries_of(&db_tx, user_id).await?;
            let members = members_of(&db_tx, user_id).await?;
            let mut total = stored_balance(&db_tx, user_id).await?;
            for row in analytics::member_summaries(&entries, &members) {
                let is_owner = row.member_id.is_none()
                    || members
                        .iter()
                        .any(|m| Some(m.id) == row.member_id && m.is_self_row());
                if !is_owner {
                    total = total.saturating_add(row.summary.balance);
                }
            }
            Ok(total)
        })
    }
}

async fn stored_balance(db_tx: &DatabaseTransaction, user_id: UserId) -> ResultEngine<Money> {
    let amount = balance::Entity::find_by_id(user_id)
        .one(db_tx)
        .await?
        .map_or(0, |row| row.amount_minor);
    Ok(Money::new(amount))
}

async fn stored_goal(db_tx: &DatabaseTransaction, user_id: UserId) -> ResultEngine<Money> {
    let target = goals::Entity::find_by_id(user_id)
        .one(db_tx)
        .await?
        .map_or(0, |row| row.target_minor);
    Ok(Money::new(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_progress_clamps_ratio() {
        let half = GoalProgress::new(Money::new(50), Money::new(100));
        assert!((half.ratio - 0.5).abs() < f64::EPSILON);

        let over = GoalProgress::new(Money::new(500), Money::new(100));
        assert!((over.ratio - 1.0).abs() < f64::EPSILON);

        let negative = GoalProgress::new(Money::new(-20), Money::new(100));
        assert_eq!(negative.ratio, 0.0);
    }

    #[test]
    fn goal_progress_without_target_is_zero() {
        assert_eq!(GoalProgress::new(Money::new(50), Money::ZERO).ratio, 0.0);
        assert_eq!(GoalProgress::new(Money::new(50), Money::new(-1)).ratio, 0.0);
    }
}
