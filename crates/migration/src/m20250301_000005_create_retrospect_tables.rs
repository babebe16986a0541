use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20250301_000001_create_users_table::Users,
    m20250301_000002_create_crews_table::Crews,
    m20250301_000004_create_challenge_tables::Challenges,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Templates::Table)
                    .if_not_exists()
                    .col(pk_uuid(Templates::Id))
                    .col(uuid_null(Templates::UserId))
                    .col(uuid_null(Templates::CrewId))
                    // USER, CREW, or COMMON (no owner reference)
                    .col(string_len(Templates::OwnerType, 10))
                    .col(string_len(Templates::Name, 255))
                    .col(json(Templates::Steps))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_templates_user_id")
                            .from(Templates::Table, Templates::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_templates_crew_id")
                            .from(Templates::Table, Templates::CrewId)
                            .to(Crews::Table, Crews::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // user_id is always the author; the owner reference is user_id for
        // USER rows and crew_id for CREW rows.
        manager
            .create_table(
                Table::create()
                    .table(Retrospects::Table)
                    .if_not_exists()
                    .col(pk_uuid(Retrospects::Id))
                    .col(uuid(Retrospects::ChallengeId))
                    .col(uuid_null(Retrospects::TemplateId))
                    .col(uuid(Retrospects::UserId))
                    .col(uuid_null(Retrospects::CrewId))
                    .col(text(Retrospects::Content))
                    .col(double_null(Retrospects::KpiResult))
                    .col(string_len(Retrospects::Visibility, 10).default("PRIVATE"))
                    .col(string_len(Retrospects::OwnerType, 10))
                    .col(
                        timestamp_with_time_zone(Retrospects::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Retrospects::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retrospects_challenge_id")
                            .from(Retrospects::Table, Retrospects::ChallengeId)
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retrospects_template_id")
                            .from(Retrospects::Table, Retrospects::TemplateId)
                            .to(Templates::Table, Templates::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retrospects_user_id")
                            .from(Retrospects::Table, Retrospects::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retrospects_crew_id")
                            .from(Retrospects::Table, Retrospects::CrewId)
                            .to(Crews::Table, Crews::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_retrospects_visibility")
                    .table(Retrospects::Table)
                    .col(Retrospects::Visibility)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_retrospects_crew_id")
                    .table(Retrospects::Table)
                    .col(Retrospects::CrewId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WeeklyAnalyses::Table)
                    .if_not_exists()
                    .col(pk_uuid(WeeklyAnalyses::Id))
                    .col(uuid_null(WeeklyAnalyses::UserId))
                    .col(uuid_null(WeeklyAnalyses::CrewId))
                    .col(json(WeeklyAnalyses::Summary))
                    .col(integer_null(WeeklyAnalyses::WeeklyKpi))
                    .col(date(WeeklyAnalyses::StartDate))
                    .col(date(WeeklyAnalyses::EndDate))
                    .col(string_len(WeeklyAnalyses::OwnerType, 10))
                    .col(
                        timestamp_with_time_zone(WeeklyAnalyses::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_weekly_analyses_user_id")
                            .from(WeeklyAnalyses::Table, WeeklyAnalyses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_weekly_analyses_crew_id")
                            .from(WeeklyAnalyses::Table, WeeklyAnalyses::CrewId)
                            .to(Crews::Table, Crews::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WeeklyAnalyses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Retrospects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Templates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Templates {
    Table,
    Id,
    UserId,
    CrewId,
    OwnerType,
    Name,
    Steps,
}

#[derive(DeriveIden)]
pub enum Retrospects {
    Table,
    Id,
    ChallengeId,
    TemplateId,
    UserId,
    CrewId,
    Content,
    KpiResult,
    Visibility,
    OwnerType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum WeeklyAnalyses {
    Table,
    Id,
    UserId,
    CrewId,
    Summary,
    WeeklyKpi,
    StartDate,
    EndDate,
    OwnerType,
    CreatedAt,
}
