//! Active Enum Definitions
//!
//! String-backed enums shared across entities. Values are persisted as
//! plain upper-case strings so the same schema runs on PostgreSQL and
//! SQLite.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Membership role within a crew
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipRole {
    /// The crew's single creator; approves and rejects join requests
    #[sea_orm(string_value = "CREATOR")]
    Creator,
    /// Regular member
    #[sea_orm(string_value = "PARTICIPANT")]
    Participant,
}

impl std::fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipRole::Creator => write!(f, "CREATOR"),
            MembershipRole::Participant => write!(f, "PARTICIPANT"),
        }
    }
}

/// Membership lifecycle status
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    /// Join request filed, awaiting the creator's decision
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Member of the crew; the only status counted by member_count
    #[sea_orm(string_value = "ACCEPTED")]
    Accepted,
    /// Join request turned down
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipStatus::Pending => write!(f, "PENDING"),
            MembershipStatus::Accepted => write!(f, "ACCEPTED"),
            MembershipStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Polymorphic owner discriminator carried by the content models.
///
/// COMMON is valid for templates only.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnerType {
    /// Owned by an individual user
    #[sea_orm(string_value = "USER")]
    User,
    /// Owned by a crew
    #[sea_orm(string_value = "CREW")]
    Crew,
    /// Shared template with no owner reference
    #[sea_orm(string_value = "COMMON")]
    Common,
}

impl std::fmt::Display for OwnerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OwnerType::User => write!(f, "USER"),
            OwnerType::Crew => write!(f, "CREW"),
            OwnerType::Common => write!(f, "COMMON"),
        }
    }
}

/// Challenge lifecycle status
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeStatus {
    /// Running
    #[sea_orm(string_value = "LIVE")]
    Live,
    /// Finished successfully
    #[sea_orm(string_value = "SUCCESS")]
    Success,
    /// Finished unsuccessfully
    #[sea_orm(string_value = "FAIL")]
    Fail,
}

impl std::fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChallengeStatus::Live => write!(f, "LIVE"),
            ChallengeStatus::Success => write!(f, "SUCCESS"),
            ChallengeStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Read-access scope of a retrospect, independent of ownership
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    /// Only the owning user
    #[sea_orm(string_value = "PRIVATE")]
    Private,
    /// Accepted members of the owning crew
    #[sea_orm(string_value = "CREW")]
    Crew,
    /// Everyone, including anonymous callers
    #[sea_orm(string_value = "PUBLIC")]
    Public,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Private => write!(f, "PRIVATE"),
            Visibility::Crew => write!(f, "CREW"),
            Visibility::Public => write!(f, "PUBLIC"),
        }
    }
}

/// Per-user achievement state for a challenge
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementStatus {
    /// Not yet recorded
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// The user achieved the challenge KPI
    #[sea_orm(string_value = "ACHIEVED")]
    Achieved,
    /// The user missed the challenge KPI
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

impl std::fmt::Display for AchievementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AchievementStatus::Pending => write!(f, "PENDING"),
            AchievementStatus::Achieved => write!(f, "ACHIEVED"),
            AchievementStatus::Failed => write!(f, "FAILED"),
        }
    }
}
