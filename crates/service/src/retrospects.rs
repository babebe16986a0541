//! # Retrospect Service
//!
//! Retrospect CRUD with owner-type/visibility cross-validation and
//! visibility-scoped reads. `user_id` always records the author; the
//! polymorphic owner reference follows `owner_type`.

use chrono::Utc;
use entity::{
    challenges::Entity as Challenges,
    retrospects::{self, Column as RetrospectColumn, Entity as Retrospects},
    sea_orm_active_enums::{OwnerType, Visibility},
    templates::Entity as Templates,
};
use error::{AppError, Result};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    Set,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        retrospects::{
            CreateRetrospectRequest,
            RetrospectListQuery,
            RetrospectListResponse,
            UpdateRetrospectRequest,
        },
        PaginationInfo,
    },
    ownership::OwnershipResolver,
    principal::Principal,
    visibility::VisibilityFilter,
    AppState,
};

/// Retrospect workflow operations
#[derive(Clone)]
pub struct RetrospectService {
    state: AppState,
}

impl RetrospectService {
    /// Create a new service over the shared state
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
        }
    }

    fn resolver(&self) -> OwnershipResolver { OwnershipResolver::new(self.state.db.clone()) }

    fn visibility(&self) -> VisibilityFilter { VisibilityFilter::new(self.state.db.clone()) }

    /// Create a retrospect authored by the principal
    pub async fn create_retrospect(
        &self,
        principal: &Principal,
        req: CreateRetrospectRequest,
    ) -> Result<retrospects::Model> {
        let author = principal.require_user()?;
        req.validate()?;
        validate_owner_visibility(&req.owner_type, req.crew_id, &req.visibility)?;

        let owner_user = match req.owner_type {
            OwnerType::User => Some(author),
            _ => None,
        };
        self.resolver()
            .validate_owner_fields(principal, &req.owner_type, owner_user, req.crew_id)
            .await?;

        Challenges::find_by_id(req.challenge_id)
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Challenge not found"))?;

        if let Some(template_id) = req.template_id {
            Templates::find_by_id(template_id)
                .one(&self.state.db)
                .await?
                .ok_or_else(|| AppError::not_found("Template not found"))?;
        }

        let now = Utc::now();
        let retrospect = retrospects::ActiveModel {
            id:           Set(Uuid::new_v4()),
            challenge_id: Set(req.challenge_id),
            template_id:  Set(req.template_id),
            user_id:      Set(author),
            crew_id:      Set(req.crew_id),
            content:      Set(req.content),
            kpi_result:   Set(req.kpi_result),
            visibility:   Set(req.visibility),
            owner_type:   Set(req.owner_type),
            created_at:   Set(now),
            updated_at:   Set(now),
        }
        .insert(&self.state.db)
        .await?;

        info!(
            retrospect_id = %retrospect.id,
            user_id = %author,
            owner_type = %retrospect.owner_type,
            "Retrospect created"
        );
        Ok(retrospect)
    }

    /// Get a single retrospect the principal may read.
    ///
    /// Unreadable rows present as NotFound so PRIVATE entities do not
    /// leak their existence.
    pub async fn get_retrospect(
        &self,
        principal: &Principal,
        retrospect_id: Uuid,
    ) -> Result<retrospects::Model> {
        let retrospect = Retrospects::find_by_id(retrospect_id)
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Retrospect not found"))?;

        self.visibility()
            .readable_set(principal, vec![retrospect])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("Retrospect not found"))
    }

    /// List the retrospects readable by the principal
    pub async fn list_retrospects(
        &self,
        principal: &Principal,
        query: RetrospectListQuery,
    ) -> Result<RetrospectListResponse> {
        let page = query.page();
        let per_page = query.per_page();

        let scope = self.visibility().retrospect_scope(principal).await?;
        let mut base_query = Retrospects::find().filter(scope);

        if let Some(challenge_id) = query.challenge_id {
            base_query = base_query.filter(RetrospectColumn::ChallengeId.eq(challenge_id));
        }

        let total = base_query.clone().count(&self.state.db).await?;
        let total_pages = if total == 0 {
            0
        }
        else {
            total.div_ceil(per_page)
        };

        let retrospects = base_query
            .order_by_desc(RetrospectColumn::CreatedAt)
            .paginate(&self.state.db, per_page)
            .fetch_page(page.saturating_sub(1))
            .await?;

        Ok(RetrospectListResponse {
            retrospects,
            pagination: PaginationInfo {
                page,
                per_page,
                total,
                total_pages,
            },
        })
    }

    /// Update a retrospect. Owner (USER) or crew member (CREW) only.
    pub async fn update_retrospect(
        &self,
        principal: &Principal,
        retrospect_id: Uuid,
        req: UpdateRetrospectRequest,
    ) -> Result<retrospects::Model> {
        req.validate()?;

        let retrospect = Retrospects::find_by_id(retrospect_id)
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Retrospect not found"))?;

        if !self.resolver().can_write(principal, &retrospect).await? {
            return Err(AppError::forbidden(
                "You do not have permission to modify this retrospect",
            ));
        }

        if let Some(ref visibility) = req.visibility {
            validate_owner_visibility(&retrospect.owner_type, retrospect.crew_id, visibility)?;
        }

        let mut active: retrospects::ActiveModel = retrospect.into();
        if let Some(content) = req.content {
            active.content = Set(content);
        }
        if let Some(kpi_result) = req.kpi_result {
            active.kpi_result = Set(Some(kpi_result));
        }
        if let Some(visibility) = req.visibility {
            active.visibility = Set(visibility);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.state.db).await?;

        info!(retrospect_id = %retrospect_id, "Retrospect updated");
        Ok(updated)
    }

    /// Delete a retrospect. Owner (USER) or crew member (CREW) only.
    pub async fn delete_retrospect(
        &self,
        principal: &Principal,
        retrospect_id: Uuid,
    ) -> Result<()> {
        let retrospect = Retrospects::find_by_id(retrospect_id)
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Retrospect not found"))?;

        if !self.resolver().can_write(principal, &retrospect).await? {
            return Err(AppError::forbidden(
                "You do not have permission to delete this retrospect",
            ));
        }

        Retrospects::delete_by_id(retrospect_id)
            .exec(&self.state.db)
            .await?;

        info!(retrospect_id = %retrospect_id, "Retrospect deleted");
        Ok(())
    }
}

/// Cross-field validation between owner type, crew reference, and
/// visibility:
/// - a crew reference requires CREW ownership and vice versa
/// - CREW-owned retrospects may not be PRIVATE
fn validate_owner_visibility(
    owner_type: &OwnerType,
    crew_id: Option<Uuid>,
    visibility: &Visibility,
) -> Result<()> {
    if crew_id.is_some() && *owner_type != OwnerType::Crew {
        return Err(AppError::validation(
            "If crew is provided, owner_type must be CREW",
        ));
    }
    if crew_id.is_none() && *owner_type != OwnerType::User {
        return Err(AppError::validation(
            "If crew is not provided, owner_type must be USER",
        ));
    }
    if *owner_type == OwnerType::Crew && *visibility == Visibility::Private {
        return Err(AppError::validation(
            "Crew retrospects cannot have PRIVATE visibility",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_owner_rejects_crew_reference() {
        let err = validate_owner_visibility(
            &OwnerType::User,
            Some(Uuid::new_v4()),
            &Visibility::Private,
        )
        .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_crew_owner_requires_crew_reference() {
        let err =
            validate_owner_visibility(&OwnerType::Crew, None, &Visibility::Crew).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_crew_owner_excludes_private() {
        let err = validate_owner_visibility(
            &OwnerType::Crew,
            Some(Uuid::new_v4()),
            &Visibility::Private,
        )
        .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_valid_combinations() {
        assert!(validate_owner_visibility(&OwnerType::User, None, &Visibility::Private).is_ok());
        assert!(validate_owner_visibility(&OwnerType::User, None, &Visibility::Public).is_ok());
        assert!(validate_owner_visibility(
            &OwnerType::Crew,
            Some(Uuid::new_v4()),
            &Visibility::Crew,
        )
        .is_ok());
        assert!(validate_owner_visibility(
            &OwnerType::Crew,
            Some(Uuid::new_v4()),
            &Visibility::Public,
        )
        .is_ok());
    }
}
