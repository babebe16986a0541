//! # Crew Data Transfer Objects

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::PaginationInfo;

/// Request to create a new crew
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateCrewRequest {
    /// Crew name, unique across the system
    #[validate(length(
        min = 1,
        max = 255,
        message = "Crew name must be between 1 and 255 characters"
    ))]
    pub crew_name:        String,
    /// Crew description
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub crew_description: Option<String>,
    /// Crew image URL
    #[validate(length(max = 2048, message = "Image URL must not exceed 2048 characters"))]
    pub crew_image:       Option<String>,
}

/// Request to update an existing crew
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateCrewRequest {
    /// Updated crew name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Crew name must be between 1 and 255 characters"
    ))]
    pub crew_name:        Option<String>,
    /// Updated description
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub crew_description: Option<String>,
    /// Updated image URL
    #[validate(length(max = 2048, message = "Image URL must not exceed 2048 characters"))]
    pub crew_image:       Option<String>,
}

/// Query parameters for crew list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrewListQuery {
    /// Page number (1-based, default: 1)
    pub page:     Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
    /// Search term for the crew name
    pub search:   Option<String>,
}

impl CrewListQuery {
    /// Get page number (1-based, default: 1)
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    /// Get items per page (default: 20, max: 100)
    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for crew list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrewListResponse {
    /// Crews on this page
    pub crews:      Vec<entity::crews::Model>,
    /// Pagination info
    pub pagination: PaginationInfo,
}
