//! # Waypoint Core Services
//!
//! Service layer for the Waypoint backend: the crew membership ledger,
//! polymorphic ownership checks, visibility-scoped reads, and the
//! challenge/retrospect workflows built on top of them. Surrounding
//! request-handling code constructs an [`AppState`] and calls these
//! services with a [`principal::Principal`].
//!
//! ## Modules
//!
//! - [`membership`]: crew membership lifecycle and member_count upkeep
//! - [`crews`]: crew CRUD
//! - [`ownership`]: write-authorization and owner-field validation
//! - [`visibility`]: PRIVATE/CREW/PUBLIC read scoping
//! - [`challenges`]: challenge lifecycle and achievement tracking
//! - [`retrospects`], [`templates`], [`analysis`]: owned content workflows
//! - [`events`], [`llm`]: collaborator seams (notifications, plan generation)

pub mod analysis;
pub mod challenges;
pub mod crews;
pub mod dto;
pub mod events;
pub mod llm;
pub mod membership;
pub mod ownership;
pub mod principal;
pub mod retrospects;
pub mod templates;
pub mod utils;
pub mod visibility;

use std::sync::Arc;

use events::{LogNotifier, NotificationSink};
use llm::{HeuristicPlanner, PlanGenerator};

pub use principal::Principal;

/// Application state shared across services.
///
/// Collaborators are injected here; services never reach for ambient
/// singletons.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db:       sea_orm::DbConn,
    /// Sink receiving membership and analysis events
    pub notifier: Arc<dyn NotificationSink>,
    /// Plan/KPI generation collaborator
    pub planner:  Arc<dyn PlanGenerator>,
}

impl AppState {
    /// Create state with explicit collaborators.
    #[must_use]
    pub fn new(
        db: sea_orm::DbConn,
        notifier: Arc<dyn NotificationSink>,
        planner: Arc<dyn PlanGenerator>,
    ) -> Self {
        Self {
            db,
            notifier,
            planner,
        }
    }

    /// Create state with the logging notifier and the heuristic planner.
    #[must_use]
    pub fn with_defaults(db: sea_orm::DbConn) -> Self {
        Self::new(db, Arc::new(LogNotifier), Arc::new(HeuristicPlanner))
    }
}
