//! # Data Transfer Objects
//!
//! Request and response types consumed by the service layer. Requests
//! carry `validator` constraints; validation failures surface as
//! `AppError::Validation`.

pub mod analysis;
pub mod challenges;
pub mod crews;
pub mod retrospects;
pub mod templates;

use serde::Serialize;

/// Pagination metadata for list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    /// Current page (1-based)
    pub page:        u64,
    /// Items per page
    pub per_page:    u64,
    /// Total matching items
    pub total:       u64,
    /// Total pages
    pub total_pages: u64,
}
