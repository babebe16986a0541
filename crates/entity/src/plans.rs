//! Plans Entity
//!
//! Generated challenge plan, stored as an ordered JSON list of steps.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:        uuid::Uuid,
    pub plan_list: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::challenges::Entity")]
    Challenges,
}

impl Related<super::challenges::Entity> for Entity {
    fn to() -> RelationDef { Relation::Challenges.def() }
}

impl ActiveModelBehavior for ActiveModel {}
