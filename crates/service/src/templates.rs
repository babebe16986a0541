//! # Template Service
//!
//! Retrospect templates with USER/CREW/COMMON ownership. Listing is the
//! union of COMMON templates, the principal's own USER templates, and
//! CREW templates of crews the principal is an ACCEPTED member of;
//! anonymous callers see COMMON only. COMMON templates are never
//! writable through this service.

use entity::{
    sea_orm_active_enums::OwnerType,
    templates::{self, Column as TemplateColumn, Entity as Templates},
};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::templates::{CreateTemplateRequest, UpdateTemplateRequest},
    ownership::OwnershipResolver,
    principal::Principal,
    visibility::VisibilityFilter,
    AppState,
};

/// Template workflow operations
#[derive(Clone)]
pub struct TemplateService {
    state: AppState,
}

impl TemplateService {
    /// Create a new service over the shared state
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
        }
    }

    fn resolver(&self) -> OwnershipResolver { OwnershipResolver::new(self.state.db.clone()) }

    /// Create a template
    pub async fn create_template(
        &self,
        principal: &Principal,
        req: CreateTemplateRequest,
    ) -> Result<templates::Model> {
        req.validate()?;

        let owner_user = match req.owner_type {
            OwnerType::User => Some(principal.require_user()?),
            _ => None,
        };
        self.resolver()
            .validate_owner_fields(principal, &req.owner_type, owner_user, req.crew_id)
            .await?;

        let template = templates::ActiveModel {
            id:         Set(Uuid::new_v4()),
            user_id:    Set(owner_user),
            crew_id:    Set(req.crew_id),
            owner_type: Set(req.owner_type),
            name:       Set(req.name),
            steps:      Set(req.steps),
        }
        .insert(&self.state.db)
        .await?;

        info!(template_id = %template.id, owner_type = %template.owner_type, "Template created");
        Ok(template)
    }

    /// List the templates visible to the principal
    pub async fn list_templates(&self, principal: &Principal) -> Result<Vec<templates::Model>> {
        let scope = self.template_scope(principal).await?;
        Ok(Templates::find()
            .filter(scope)
            .order_by_asc(TemplateColumn::Name)
            .all(&self.state.db)
            .await?)
    }

    /// Get a single template the principal may read
    pub async fn get_template(
        &self,
        principal: &Principal,
        template_id: Uuid,
    ) -> Result<templates::Model> {
        let scope = self.template_scope(principal).await?;
        Templates::find_by_id(template_id)
            .filter(scope)
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Template not found"))
    }

    /// Update a template. COMMON templates are always denied.
    pub async fn update_template(
        &self,
        principal: &Principal,
        template_id: Uuid,
        req: UpdateTemplateRequest,
    ) -> Result<templates::Model> {
        req.validate()?;

        let template = Templates::find_by_id(template_id)
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Template not found"))?;

        if !self.resolver().can_write(principal, &template).await? {
            return Err(AppError::forbidden(
                "You do not have permission to modify this template",
            ));
        }

        let mut active: templates::ActiveModel = template.into();
        if let Some(name) = req.name {
            active.name = Set(name);
        }
        if let Some(steps) = req.steps {
            active.steps = Set(steps);
        }

        let updated = active.update(&self.state.db).await?;

        info!(template_id = %template_id, "Template updated");
        Ok(updated)
    }

    /// Delete a template. COMMON templates are always denied.
    pub async fn delete_template(&self, principal: &Principal, template_id: Uuid) -> Result<()> {
        let template = Templates::find_by_id(template_id)
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Template not found"))?;

        if !self.resolver().can_write(principal, &template).await? {
            return Err(AppError::forbidden(
                "You do not have permission to delete this template",
            ));
        }

        Templates::delete_by_id(template_id)
            .exec(&self.state.db)
            .await?;

        info!(template_id = %template_id, "Template deleted");
        Ok(())
    }

    /// COMMON for everyone; own USER and member CREW templates for
    /// authenticated principals
    async fn template_scope(&self, principal: &Principal) -> Result<Condition> {
        let Some(user_id) = principal.user_id() else {
            return Ok(Condition::all().add(TemplateColumn::OwnerType.eq(OwnerType::Common)));
        };

        let crew_ids = VisibilityFilter::new(self.state.db.clone())
            .accepted_crew_ids(user_id)
            .await?;

        Ok(Condition::any()
            .add(TemplateColumn::OwnerType.eq(OwnerType::Common))
            .add(
                Condition::all()
                    .add(TemplateColumn::OwnerType.eq(OwnerType::User))
                    .add(TemplateColumn::UserId.eq(user_id)),
            )
            .add(
                Condition::all()
                    .add(TemplateColumn::OwnerType.eq(OwnerType::Crew))
                    .add(TemplateColumn::CrewId.is_in(crew_ids)),
            ))
    }
}
