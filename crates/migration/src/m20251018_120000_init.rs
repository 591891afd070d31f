//! Initial schema for the family ledger.
//!
//! - `users`: accounts and credential digests
//! - `balance`: the stored running balance, one row per user
//! - `goals`: the savings target, one row per user
//! - `family_members`: per-user roster used to attribute ledger entries
//! - `history`: the append-only ledger
//!
//! Amount columns (`balance.amount`, `goals.target`, `history.amount`) hold
//! minor units (cents).
//!
//! Every owned table cascades on user deletion. Deleting a family member
//! detaches its history rows (`member_id` becomes NULL) instead of deleting
//! them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
}

#[derive(Iden)]
enum Balance {
    Table,
    UserId,
    Amount,
}

#[derive(Iden)]
enum Goals {
    Table,
    UserId,
    Target,
}

#[derive(Iden)]
enum FamilyMembers {
    Table,
    Id,
    OwnerId,
    Name,
    Role,
    Color,
    Avatar,
}

#[derive(Iden)]
enum History {
    Table,
    Id,
    UserId,
    MemberId,
    Type,
    Amount,
    Category,
    Description,
    Date,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Balance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Balance::UserId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Balance::Amount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-balance-user_id")
                            .from(Balance::Table, Balance::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Goals::UserId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Goals::Target)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-goals-user_id")
                            .from(Goals::Table, Goals::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FamilyMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FamilyMembers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FamilyMembers::OwnerId).integer().not_null())
                    .col(ColumnDef::new(FamilyMembers::Name).string().not_null())
                    .col(ColumnDef::new(FamilyMembers::Role).string())
                    .col(ColumnDef::new(FamilyMembers::Color).string())
                    .col(ColumnDef::new(FamilyMembers::Avatar).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-family_members-owner_id")
                            .from(FamilyMembers::Table, FamilyMembers::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(History::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(History::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(History::UserId).integer().not_null())
                    .col(ColumnDef::new(History::MemberId).integer())
                    .col(ColumnDef::new(History::Type).string().not_null())
                    .col(ColumnDef::new(History::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(History::Category)
                            .string()
                            .default("Other"),
                    )
                    .col(ColumnDef::new(History::Description).string())
                    .col(ColumnDef::new(History::Date).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-history-user_id")
                            .from(History::Table, History::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-history-member_id")
                            .from(History::Table, History::MemberId)
                            .to(FamilyMembers::Table, FamilyMembers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first so FK checks never fire on a dangling parent.
        manager
            .drop_table(Table::drop().table(History::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FamilyMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Goals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Balance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
