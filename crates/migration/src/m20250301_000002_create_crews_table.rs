use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Crews::Table)
                    .if_not_exists()
                    .col(pk_uuid(Crews::Id))
                    .col(string_len(Crews::CrewName, 255))
                    .col(text(Crews::CrewDescription))
                    // Cache over ACCEPTED membership rows; the count query is
                    // the source of truth.
                    .col(integer(Crews::MemberCount).default(0))
                    .col(string_len_null(Crews::CrewImage, 2048))
                    .col(
                        timestamp_with_time_zone(Crews::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_crews_crew_name_unique")
                    .table(Crews::Table)
                    .col(Crews::CrewName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Crews::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Crews {
    Table,
    Id,
    CrewName,
    CrewDescription,
    MemberCount,
    CrewImage,
    CreatedAt,
}
