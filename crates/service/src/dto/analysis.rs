//! # Weekly Analysis Data Transfer Objects

use entity::sea_orm_active_enums::OwnerType;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Request to store a weekly analysis
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateWeeklyAnalysisRequest {
    /// USER or CREW ownership
    pub owner_type: OwnerType,
    /// Owning crew for CREW ownership
    pub crew_id:    Option<Uuid>,
    /// Analysis summary JSON
    pub summary:    serde_json::Value,
    /// Aggregate weekly KPI
    #[validate(range(min = 0, message = "Weekly KPI must not be negative"))]
    pub weekly_kpi: Option<i32>,
    /// First day of the analyzed week
    pub start_date: chrono::NaiveDate,
    /// Last day of the analyzed week
    pub end_date:   chrono::NaiveDate,
}
