//! Challenges Entity
//!
//! A time-boxed goal with a KPI, owned by a user or a crew, progressing
//! LIVE -> SUCCESS/FAIL.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ChallengeStatus, OwnerType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "challenges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:              uuid::Uuid,
    pub plan_id:         Option<uuid::Uuid>,
    pub user_id:         Option<uuid::Uuid>,
    pub crew_id:         Option<uuid::Uuid>,
    pub challenge_name:  String,
    pub deadline:        chrono::DateTime<chrono::Utc>,
    pub kpi_description: String,
    pub kpi_metrics:     Option<Json>,
    pub owner_type:      OwnerType,
    pub status:          ChallengeStatus,
    pub created_at:      chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plans::Entity",
        from = "Column::PlanId",
        to = "super::plans::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Plan,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::crews::Entity",
        from = "Column::CrewId",
        to = "super::crews::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Crew,
    #[sea_orm(has_many = "super::retrospects::Entity")]
    Retrospects,
    #[sea_orm(has_many = "super::user_challenge_statuses::Entity")]
    UserChallengeStatuses,
}

impl Related<super::plans::Entity> for Entity {
    fn to() -> RelationDef { Relation::Plan.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<super::crews::Entity> for Entity {
    fn to() -> RelationDef { Relation::Crew.def() }
}

impl Related<super::retrospects::Entity> for Entity {
    fn to() -> RelationDef { Relation::Retrospects.def() }
}

impl Related<super::user_challenge_statuses::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserChallengeStatuses.def() }
}

impl ActiveModelBehavior for ActiveModel {}
