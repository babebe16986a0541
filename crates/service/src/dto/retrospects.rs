//! # Retrospect Data Transfer Objects

use entity::sea_orm_active_enums::{OwnerType, Visibility};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::PaginationInfo;

/// Request to create a retrospect
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct CreateRetrospectRequest {
    /// Challenge the retrospect is written against
    pub challenge_id: Uuid,
    /// Optional template the retrospect follows
    pub template_id:  Option<Uuid>,
    /// Owning crew for CREW ownership
    pub crew_id:      Option<Uuid>,
    /// Retrospect body
    #[validate(length(min = 1, message = "Content is required"))]
    pub content:      String,
    /// Measured KPI result
    pub kpi_result:   Option<f64>,
    /// Read-access scope
    pub visibility:   Visibility,
    /// USER or CREW ownership
    pub owner_type:   OwnerType,
}

/// Request to update a retrospect
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct UpdateRetrospectRequest {
    /// Updated body
    #[validate(length(min = 1, message = "Content is required"))]
    pub content:    Option<String>,
    /// Updated KPI result
    pub kpi_result: Option<f64>,
    /// Updated read-access scope
    pub visibility: Option<Visibility>,
}

/// Query parameters for retrospect list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetrospectListQuery {
    /// Page number (1-based, default: 1)
    pub page:         Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page:     Option<u64>,
    /// Restrict to a single challenge
    pub challenge_id: Option<Uuid>,
}

impl RetrospectListQuery {
    /// Get page number (1-based, default: 1)
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    /// Get items per page (default: 20, max: 100)
    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for retrospect list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrospectListResponse {
    /// Retrospects on this page
    pub retrospects: Vec<entity::retrospects::Model>,
    /// Pagination info
    pub pagination:  PaginationInfo,
}
