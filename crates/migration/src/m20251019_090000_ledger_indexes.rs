//! Lookup indexes for per-user ledger scans and member attribution.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum History {
    Table,
    UserId,
    MemberId,
    Type,
}

#[derive(Iden)]
enum FamilyMembers {
    Table,
    OwnerId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx-history-user_id-type")
                    .table(History::Table)
                    .col(History::UserId)
                    .col(History::Type)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-history-member_id")
                    .table(History::Table)
                    .col(History::MemberId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-family_members-owner_id")
                    .table(FamilyMembers::Table)
                    .col(FamilyMembers::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx-family_members-owner_id")
                    .table(FamilyMembers::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx-history-member_id")
                    .table(History::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx-history-user_id-type")
                    .table(History::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
