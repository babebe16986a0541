//! # Challenge Data Transfer Objects

use entity::sea_orm_active_enums::OwnerType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::PaginationInfo;

/// Request to create a new challenge
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateChallengeRequest {
    /// Challenge name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Challenge name must be between 1 and 255 characters"
    ))]
    pub challenge_name: String,
    /// Free-form goal description fed to plan generation
    #[validate(length(min = 1, message = "Description is required"))]
    pub description:    String,
    /// Challenge deadline
    pub deadline:       chrono::DateTime<chrono::Utc>,
    /// USER or CREW ownership
    pub owner_type:     OwnerType,
    /// Owning crew for CREW ownership
    pub crew_id:        Option<Uuid>,
}

/// Query parameters for challenge list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChallengeListQuery {
    /// Page number (1-based, default: 1)
    pub page:     Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
    /// Status filter; unrecognized values are ignored
    pub status:   Option<String>,
}

impl ChallengeListQuery {
    /// Get page number (1-based, default: 1)
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    /// Get items per page (default: 20, max: 100)
    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for challenge list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeListResponse {
    /// Challenges on this page
    pub challenges: Vec<entity::challenges::Model>,
    /// Pagination info
    pub pagination: PaginationInfo,
}
