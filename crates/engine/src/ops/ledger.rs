use base64::Engine as _;
use chrono::Local;
use serde::{Deserialize, Serialize};

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*, sea_query::Expr,
};
use tracing::debug;

use crate::{
    ENTRY_DATE_FORMAT, EngineError, EntryId, EntryKind, LedgerEntry, Money, RecordCmd,
    ResultEngine, Session, UserId, balance,
    history::{self, NewEntry},
    util::stored_category,
};

use super::{Engine, family::require_owned_member, with_tx};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct HistoryCursor {
    last_id: EntryId,
}

impl HistoryCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid history cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid history cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid history cursor".to_string()))
    }
}

impl Engine {
    /// Appends an entry to the ledger.
    ///
    /// Income attributed to the owner (no member) also credits the stored
    /// balance. Expenses never touch it.
    pub async fn record(&self, session: &Session, cmd: RecordCmd) -> ResultEngine<EntryId> {
        let user_id = self.authenticate(session).await?;
        if !cmd.amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }

        let occurred_at = cmd
            .occurred_at
            .unwrap_or_else(|| Local::now().naive_local());
        let entry = NewEntry {
            user_id,
            member_id: cmd.member_id,
            kind: cmd.kind,
            amount: cmd.amount,
            category: stored_category(cmd.category),
            description: cmd.description,
            date: occurred_at.format(ENTRY_DATE_FORMAT).to_string(),
        };

        with_tx!(self, |db_tx| {
            if let Some(member_id) = entry.member_id {
                require_owned_member(&db_tx, user_id, member_id).await?;
            }

            let model = history::ActiveModel::from(&entry).insert(&db_tx).await?;

            if entry.kind == EntryKind::Income && entry.member_id.is_none() {
                credit_balance(&db_tx, user_id, entry.amount).await?;
            }

            debug!(
                user_id,
                entry_id = model.id,
                kind = entry.kind.as_str(),
                amount = entry.amount.minor(),
                "recorded ledger entry"
            );
            Ok(model.id)
        })
    }

    /// The whole ledger of the session user, newest first.
    pub async fn list_all(&self, session: &Session) -> ResultEngine<Vec<LedgerEntry>> {
        let user_id = self.authenticate(session).await?;
        with_tx!(self, |db_tx| entries_of(&db_tx, user_id).await)
    }

    /// One page of the ledger, newest first, with an opaque cursor for the
    /// next page (`None` once exhausted).
    pub async fn list_page(
        &self,
        session: &Session,
        limit: u64,
        cursor: Option<&str>,
    ) -> ResultEngine<(Vec<LedgerEntry>, Option<String>)> {
        let user_id = self.authenticate(session).await?;
        if limit == 0 {
            return Err(EngineError::InvalidInput(
                "limit must be > 0".to_string(),
            ));
        }
        let cursor = cursor.map(HistoryCursor::decode).transpose()?;

        with_tx!(self, |db_tx| {
            let mut query = history::Entity::find()
                .filter(history::Column::UserId.eq(user_id))
                .order_by_desc(history::Column::Id)
                .limit(limit.saturating_add(1));
            if let Some(cursor) = &cursor {
                query = query.filter(history::Column::Id.lt(cursor.last_id));
            }

            let rows = query.all(&db_tx).await?;
            let has_more = rows.len() as u64 > limit;
            let page = rows
                .into_iter()
                .take(limit as usize)
                .map(LedgerEntry::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let next = match page.last() {
                Some(last) if has_more => Some(HistoryCursor { last_id: last.id }.encode()?),
                _ => None,
            };
            Ok((page, next))
        })
    }
}

pub(super) async fn entries_of(
    db_tx: &DatabaseTransaction,
    user_id: UserId,
) -> ResultEngine<Vec<LedgerEntry>> {
    history::Entity::find()
        .filter(history::Column::UserId.eq(user_id))
        .order_by_desc(history::Column::Id)
        .all(db_tx)
        .await?
        .into_iter()
        .map(LedgerEntry::try_from)
        .collect()
}

async fn credit_balance(
    db_tx: &DatabaseTransaction,
    user_id: UserId,
    amount: Money,
) -> ResultEngine<()> {
    let current = balance::Entity::find_by_id(user_id).one(db_tx).await?;
    let Some(current) = current else {
        balance::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            amount_minor: ActiveValue::Set(amount.minor()),
        }
        .insert(db_tx)
        .await?;
        return Ok(());
    };

    let credited = Money::new(current.amount_minor)
        .checked_add(amount)
        .ok_or_else(|| EngineError::InvalidAmount("balance overflow".to_string()))?;
    balance::Entity::update_many()
        .col_expr(balance::Column::AmountMinor, Expr::value(credited.minor()))
        .filter(balance::Column::UserId.eq(user_id))
        .exec(db_tx)
        .await?;
    Ok(())
}
