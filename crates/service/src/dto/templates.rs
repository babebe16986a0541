//! # Template Data Transfer Objects

use entity::sea_orm_active_enums::OwnerType;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Request to create a template
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    /// Template name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Template name must be between 1 and 255 characters"
    ))]
    pub name:       String,
    /// Ordered JSON list of steps
    pub steps:      serde_json::Value,
    /// USER, CREW, or COMMON ownership
    pub owner_type: OwnerType,
    /// Owning crew for CREW ownership
    pub crew_id:    Option<Uuid>,
}

/// Request to update a template
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateTemplateRequest {
    /// Updated name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Template name must be between 1 and 255 characters"
    ))]
    pub name:  Option<String>,
    /// Updated steps
    pub steps: Option<serde_json::Value>,
}
