//! Crew Members Entity
//!
//! The membership ledger row binding a user to a crew, carrying role and
//! lifecycle status. Unique on (user_id, crew_id); owned by the crew
//! (cascade-deleted with it).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{MembershipRole, MembershipStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "crew_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Uuid")]
    pub id:        uuid::Uuid,
    pub user_id:   uuid::Uuid,
    pub crew_id:   uuid::Uuid,
    pub role:      MembershipRole,
    pub status:    MembershipStatus,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::crews::Entity",
        from = "Column::CrewId",
        to = "super::crews::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Crew,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::crews::Entity> for Entity {
    fn to() -> RelationDef { Relation::Crew.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}
