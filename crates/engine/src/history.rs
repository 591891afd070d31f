//! Ledger primitives.
//!
//! A `LedgerEntry` is one row of the `history` table: an income or expense
//! recorded by the account owner, optionally attributed to a family member.
//! Entries are never updated; the only later change is the member detach
//! performed when a family member is removed.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MemberId, Money, ResultEngine, UserId, util};

pub type EntryId = i64;

/// Category used when none is given or the stored one is blank.
pub const DEFAULT_CATEGORY: &str = "Other";
/// Canonical write format of `history.date`.
pub const ENTRY_DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidInput(format!(
                "invalid entry kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub user_id: UserId,
    /// `None` means the entry belongs to the account owner ("Self").
    pub member_id: Option<MemberId>,
    pub kind: EntryKind,
    /// Always a positive magnitude.
    pub amount: Money,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Timestamp exactly as stored.
    pub date: String,
}

impl LedgerEntry {
    /// Category label used by aggregations: trimmed and NFC-composed, with
    /// blank or missing categories folded into [`DEFAULT_CATEGORY`]. The
    /// stored `category` itself is never rewritten.
    #[must_use]
    pub fn category_label(&self) -> String {
        util::category_label(self.category.as_deref())
    }

    /// Calendar day of the entry, if the stored timestamp can be parsed.
    #[must_use]
    pub fn occurred_on(&self) -> Option<NaiveDate> {
        util::parse_entry_date(&self.date)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: EntryId,
    pub user_id: UserId,
    pub member_id: Option<MemberId>,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    /// Minor units (cents).
    #[sea_orm(column_name = "amount")]
    pub amount_minor: i64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::family_members::Entity",
        from = "Column::MemberId",
        to = "super::family_members::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Member,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::family_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            member_id: model.member_id,
            kind: EntryKind::try_from(model.kind.as_str())?,
            amount: Money::new(model.amount_minor),
            category: model.category,
            description: model.description,
            date: model.date,
        })
    }
}

/// Insertable row for a new entry; `id` is assigned by the database.
pub(crate) struct NewEntry {
    pub(crate) user_id: UserId,
    pub(crate) member_id: Option<MemberId>,
    pub(crate) kind: EntryKind,
    pub(crate) amount: Money,
    pub(crate) category: String,
    pub(crate) description: Option<String>,
    pub(crate) date: String,
}

impl From<&NewEntry> for ActiveModel {
    fn from(entry: &NewEntry) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(entry.user_id),
            member_id: ActiveValue::Set(entry.member_id),
            kind: ActiveValue::Set(entry.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(entry.amount.minor()),
            category: ActiveValue::Set(Some(entry.category.clone())),
            description: ActiveValue::Set(entry.description.clone()),
            date: ActiveValue::Set(entry.date.clone()),
        }
    }
}
