//! Weekly Analyses Entity
//!
//! Generated weekly retrospective analysis for a user or a crew, covering
//! the [start_date, end_date] window.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::OwnerType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "weekly_analyses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:         uuid::Uuid,
    pub user_id:    Option<uuid::Uuid>,
    pub crew_id:    Option<uuid::Uuid>,
    pub summary:    Json,
    pub weekly_kpi: Option<i32>,
    pub start_date: chrono::NaiveDate,
    pub end_date:   chrono::NaiveDate,
    pub owner_type: OwnerType,
    pub created_at: chrono::DateTime<chrono::Utc>,
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
        belongs_to = "super::crews::Entity",
        from = "Column::CrewId",
        to = "super::crews::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Crew,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<super::crews::Entity> for Entity {
    fn to() -> RelationDef { Relation::Crew.def() }
}

impl ActiveModelBehavior for ActiveModel {}
