//! Retrospects Entity
//!
//! A retrospective written against a challenge, optionally following a
//! template. `user_id` is always the author; the polymorphic owner
//! reference is `user_id` when owner_type=USER and `crew_id` when
//! owner_type=CREW. CREW-owned rows may not be PRIVATE.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{OwnerType, Visibility};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "retrospects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:           uuid::Uuid,
    pub challenge_id: uuid::Uuid,
    pub template_id:  Option<uuid::Uuid>,
    pub user_id:      uuid::Uuid,
    pub crew_id:      Option<uuid::Uuid>,
    pub content:      String,
    pub kpi_result:   Option<f64>,
    pub visibility:   Visibility,
    pub owner_type:   OwnerType,
    pub created_at:   chrono::DateTime<chrono::Utc>,
    pub updated_at:   chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::challenges::Entity",
        from = "Column::ChallengeId",
        to = "super::challenges::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Challenge,
    #[sea_orm(
        belongs_to = "super::templates::Entity",
        from = "Column::TemplateId",
        to = "super::templates::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Template,
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

impl Related<super::challenges::Entity> for Entity {
    fn to() -> RelationDef { Relation::Challenge.def() }
}

impl Related<super::templates::Entity> for Entity {
    fn to() -> RelationDef { Relation::Template.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<super::crews::Entity> for Entity {
    fn to() -> RelationDef { Relation::Crew.def() }
}

impl ActiveModelBehavior for ActiveModel {}
