//! Users Entity
//!
//! Account identity referenced by memberships and authored content.
//! Credential and session management live outside this core.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:         uuid::Uuid,
    pub email:      String,
    pub nickname:   String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::crew_members::Entity")]
    CrewMembers,
    #[sea_orm(has_many = "super::challenges::Entity")]
    Challenges,
    #[sea_orm(has_many = "super::retrospects::Entity")]
    Retrospects,
}

impl Related<super::crew_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::CrewMembers.def() }
}

impl Related<super::challenges::Entity> for Entity {
    fn to() -> RelationDef { Relation::Challenges.def() }
}

impl Related<super::retrospects::Entity> for Entity {
    fn to() -> RelationDef { Relation::Retrospects.def() }
}

impl ActiveModelBehavior for ActiveModel {}
