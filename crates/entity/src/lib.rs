//! Entity definitions for Waypoint
//!
//! This crate contains Sea-ORM entity definitions for the database models:
//! users, crews and their membership ledger, and the owned content models
//! (templates, challenges, retrospects, weekly analyses).

pub mod sea_orm_active_enums;

pub mod users;
pub use users::Entity as Users;
pub mod crews;
pub use crews::Entity as Crews;
pub mod crew_members;
pub use crew_members::Entity as CrewMembers;
pub mod plans;
pub use plans::Entity as Plans;
pub mod templates;
pub use templates::Entity as Templates;
pub mod challenges;
pub use challenges::Entity as Challenges;
pub mod user_challenge_statuses;
pub use user_challenge_statuses::Entity as UserChallengeStatuses;
pub mod retrospects;
pub use retrospects::Entity as Retrospects;
pub mod weekly_analyses;
pub use weekly_analyses::Entity as WeeklyAnalyses;
