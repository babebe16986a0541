//! Crews Entity
//!
//! A user group with a single CREATOR and any number of PARTICIPANTs.
//! `member_count` is a read cache over the ACCEPTED membership rows; it is
//! recomputed, never incremented, by every mutation that can change the
//! ACCEPTED set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "crews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:               uuid::Uuid,
    pub crew_name:        String,
    pub crew_description: String,
    pub member_count:     i32,
    pub crew_image:       Option<String>,
    pub created_at:       chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::crew_members::Entity")]
    CrewMembers,
    #[sea_orm(has_many = "super::challenges::Entity")]
    Challenges,
    #[sea_orm(has_many = "super::retrospects::Entity")]
    Retrospects,
    #[sea_orm(has_many = "super::templates::Entity")]
    Templates,
    #[sea_orm(has_many = "super::weekly_analyses::Entity")]
    WeeklyAnalyses,
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

impl Related<super::templates::Entity> for Entity {
    fn to() -> RelationDef { Relation::Templates.def() }
}

impl Related<super::weekly_analyses::Entity> for Entity {
    fn to() -> RelationDef { Relation::WeeklyAnalyses.def() }
}

impl ActiveModelBehavior for ActiveModel {}
