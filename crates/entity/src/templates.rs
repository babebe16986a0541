//! Templates Entity
//!
//! Retrospective template: a named JSON list of steps. Owned by a user, a
//! crew, or shared as COMMON (no owner reference).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::OwnerType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:         uuid::Uuid,
    pub user_id:    Option<uuid::Uuid>,
    pub crew_id:    Option<uuid::Uuid>,
    pub owner_type: OwnerType,
    pub name:       String,
    pub steps:      Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::crews::Entity",
        from = "Column::CrewId",
        to = "super::crews::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Crew,
    #[sea_orm(has_many = "super::retrospects::Entity")]
    Retrospects,
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

impl ActiveModelBehavior for ActiveModel {}
