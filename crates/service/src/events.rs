//! # Collaborator Events
//!
//! Events emitted at membership and analysis state changes. A
//! [`NotificationSink`] turns them into user-facing notifications; the
//! sink is invoked synchronously after the owning transaction commits,
//! and delivery/retry is the sink's concern, not this core's.

use async_trait::async_trait;
use entity::sea_orm_active_enums::{MembershipRole, OwnerType};
use tracing::info;
use uuid::Uuid;

/// Emitted when a membership reaches ACCEPTED (direct join or approval)
#[derive(Debug, Clone)]
pub struct MembershipAccepted {
    pub crew_id: Uuid,
    pub user_id: Uuid,
    pub role:    MembershipRole,
}

/// Emitted when a PENDING join request is rejected
#[derive(Debug, Clone)]
pub struct MembershipRejected {
    pub crew_id: Uuid,
    pub user_id: Uuid,
}

/// Emitted when a weekly analysis has been stored
#[derive(Debug, Clone)]
pub struct WeeklyAnalysisCompleted {
    pub analysis_id: Uuid,
    pub owner_type:  OwnerType,
    pub user_id:     Option<Uuid>,
    pub crew_id:     Option<Uuid>,
}

/// Sink for membership and analysis events
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn membership_accepted(&self, event: &MembershipAccepted);
    async fn membership_rejected(&self, event: &MembershipRejected);
    async fn weekly_analysis_completed(&self, event: &WeeklyAnalysisCompleted);
}

/// Default sink that records events in the structured log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn membership_accepted(&self, event: &MembershipAccepted) {
        info!(
            crew_id = %event.crew_id,
            user_id = %event.user_id,
            role = %event.role,
            "notification: membership accepted"
        );
    }

    async fn membership_rejected(&self, event: &MembershipRejected) {
        info!(
            crew_id = %event.crew_id,
            user_id = %event.user_id,
            "notification: membership rejected"
        );
    }

    async fn weekly_analysis_completed(&self, event: &WeeklyAnalysisCompleted) {
        info!(
            analysis_id = %event.analysis_id,
            owner_type = %event.owner_type,
            "notification: weekly analysis completed"
        );
    }
}
