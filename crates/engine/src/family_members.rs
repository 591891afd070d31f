//! Family registry rows.
//!
//! A member is an attribution target for ledger entries. The account owner
//! ("Self") is never a row here: entries attributed to the owner carry no
//! member at all. Registration still seeds one `Self`/`Owner` row so hosts
//! have something to show in member pickers.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::UserId;

pub type MemberId = i64;

/// Maximum number of registry rows per owner, the seeded row included.
pub const MAX_FAMILY_MEMBERS: u64 = 5;
/// Color assigned when the caller does not pick one.
pub const DEFAULT_MEMBER_COLOR: &str = "#6C5CE7";
/// Display label for entries without a member.
pub const SELF_LABEL: &str = "Self";
/// Display label for member ids that do not resolve.
pub const UNKNOWN_LABEL: &str = "Unknown";
/// Role of the row seeded at registration.
pub const OWNER_ROLE: &str = "Owner";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: MemberId,
    pub owner_id: UserId,
    pub name: String,
    pub role: Option<String>,
    pub color: String,
    pub avatar: Option<String>,
}

impl FamilyMember {
    /// True for the registry row standing in for the account owner.
    #[must_use]
    pub fn is_self_row(&self) -> bool {
        self.name == SELF_LABEL
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "family_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: MemberId,
    pub owner_id: UserId,
    pub name: String,
    pub role: Option<String>,
    pub color: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::history::Entity")]
    History,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Insertable row for the owner's default `Self` member.
    pub(crate) fn seeded_self(owner_id: UserId) -> Self {
        Self {
            id: ActiveValue::NotSet,
            owner_id: ActiveValue::Set(owner_id),
            name: ActiveValue::Set(SELF_LABEL.to_string()),
            role: ActiveValue::Set(Some(OWNER_ROLE.to_string())),
            color: ActiveValue::Set(Some(DEFAULT_MEMBER_COLOR.to_string())),
            avatar: ActiveValue::Set(None),
        }
    }
}

impl From<Model> for FamilyMember {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            name: model.name,
            role: model.role.filter(|r| !r.is_empty()),
            color: model
                .color
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_MEMBER_COLOR.to_string()),
            avatar: model.avatar.filter(|a| !a.is_empty()),
        }
    }
}
