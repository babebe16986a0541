use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20250301_000001_create_users_table::Users,
    m20250301_000002_create_crews_table::Crews,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Role and status are stored as plain strings so the same schema
        // runs on PostgreSQL and SQLite. Foreign keys are declared inline
        // for the same reason.
        manager
            .create_table(
                Table::create()
                    .table(CrewMembers::Table)
                    .if_not_exists()
                    .col(pk_uuid(CrewMembers::Id))
                    .col(uuid(CrewMembers::UserId))
                    .col(uuid(CrewMembers::CrewId))
                    .col(string_len(CrewMembers::Role, 20).default("PARTICIPANT"))
                    .col(string_len(CrewMembers::Status, 20).default("PENDING"))
                    .col(
                        timestamp_with_time_zone(CrewMembers::JoinedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_crew_members_user_id")
                            .from(CrewMembers::Table, CrewMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_crew_members_crew_id")
                            .from(CrewMembers::Table, CrewMembers::CrewId)
                            .to(Crews::Table, Crews::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One membership per (user, crew) regardless of status
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_crew_members_user_crew_unique")
                    .table(CrewMembers::Table)
                    .col(CrewMembers::UserId)
                    .col(CrewMembers::CrewId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Covers the ACCEPTED-count and member-listing queries
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_crew_members_crew_status")
                    .table(CrewMembers::Table)
                    .col(CrewMembers::CrewId)
                    .col(CrewMembers::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_crew_members_user_id")
                    .table(CrewMembers::Table)
                    .col(CrewMembers::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CrewMembers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CrewMembers {
    Table,
    Id,
    UserId,
    CrewId,
    Role,
    Status,
    JoinedAt,
}
