//! Users table.
//!
//! `password_hash` holds either an Argon2 PHC string or, for accounts created
//! by older releases, a bare SHA-256 hex digest that is upgraded on the next
//! successful login.

use sea_orm::entity::prelude::*;

pub type UserId = i64;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: UserId,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::balance::Entity")]
    Balance,
    #[sea_orm(has_one = "super::goals::Entity")]
    Goal,
    #[sea_orm(has_many = "super::family_members::Entity")]
    FamilyMembers,
    #[sea_orm(has_many = "super::history::Entity")]
    History,
}

impl Related<super::balance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Balance.def()
    }
}

impl Related<super::goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goal.def()
    }
}

impl Related<super::family_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FamilyMembers.def()
    }
}

impl Related<super::history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
