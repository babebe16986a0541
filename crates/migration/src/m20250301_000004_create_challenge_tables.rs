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
        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(pk_uuid(Plans::Id))
                    .col(json(Plans::PlanList))
                    .to_owned(),
            )
            .await?;

        // Exactly one of user_id/crew_id is set, consistent with owner_type;
        // enforced at the service layer.
        manager
            .create_table(
                Table::create()
                    .table(Challenges::Table)
                    .if_not_exists()
                    .col(pk_uuid(Challenges::Id))
                    .col(uuid_null(Challenges::PlanId))
                    .col(uuid_null(Challenges::UserId))
                    .col(uuid_null(Challenges::CrewId))
                    .col(string_len(Challenges::ChallengeName, 255))
                    .col(timestamp_with_time_zone(Challenges::Deadline))
                    .col(text(Challenges::KpiDescription))
                    .col(json_null(Challenges::KpiMetrics))
                    .col(string_len(Challenges::OwnerType, 10))
                    .col(string_len(Challenges::Status, 10).default("LIVE"))
                    .col(
                        timestamp_with_time_zone(Challenges::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_challenges_plan_id")
                            .from(Challenges::Table, Challenges::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_challenges_user_id")
                            .from(Challenges::Table, Challenges::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_challenges_crew_id")
                            .from(Challenges::Table, Challenges::CrewId)
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
                    .name("idx_challenges_status")
                    .table(Challenges::Table)
                    .col(Challenges::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserChallengeStatuses::Table)
                    .if_not_exists()
                    .col(pk_uuid(UserChallengeStatuses::Id))
                    .col(uuid(UserChallengeStatuses::UserId))
                    .col(uuid(UserChallengeStatuses::ChallengeId))
                    .col(string_len(UserChallengeStatuses::Status, 10).default("PENDING"))
                    .col(
                        timestamp_with_time_zone(UserChallengeStatuses::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_challenge_statuses_user_id")
                            .from(UserChallengeStatuses::Table, UserChallengeStatuses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_challenge_statuses_challenge_id")
                            .from(
                                UserChallengeStatuses::Table,
                                UserChallengeStatuses::ChallengeId,
                            )
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_challenge_statuses_user_challenge_unique")
                    .table(UserChallengeStatuses::Table)
                    .col(UserChallengeStatuses::UserId)
                    .col(UserChallengeStatuses::ChallengeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserChallengeStatuses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Challenges::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Plans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Plans {
    Table,
    Id,
    PlanList,
}

#[derive(DeriveIden)]
pub enum Challenges {
    Table,
    Id,
    PlanId,
    UserId,
    CrewId,
    ChallengeName,
    Deadline,
    KpiDescription,
    KpiMetrics,
    OwnerType,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum UserChallengeStatuses {
    Table,
    Id,
    UserId,
    ChallengeId,
    Status,
    UpdatedAt,
}
