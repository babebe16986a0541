//! # Crew Service
//!
//! Crew CRUD. Creating a crew does not add a membership; the first user
//! whose membership reaches ACCEPTED is promoted to CREATOR by the
//! membership ledger. Update and delete are restricted to the creator.

use chrono::Utc;
use entity::crews::{self, Column as CrewColumn, Entity as Crews};
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
        crews::{CreateCrewRequest, CrewListQuery, CrewListResponse, UpdateCrewRequest},
        PaginationInfo,
    },
    ownership::OwnershipResolver,
    principal::Principal,
    utils::escape_like_wildcards,
    AppState,
};

/// Crew aggregate operations
#[derive(Clone)]
pub struct CrewService {
    state: AppState,
}

impl CrewService {
    /// Create a new service over the shared state
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
        }
    }

    fn resolver(&self) -> OwnershipResolver { OwnershipResolver::new(self.state.db.clone()) }

    /// Create a new crew with an empty member set
    pub async fn create_crew(
        &self,
        principal: &Principal,
        req: CreateCrewRequest,
    ) -> Result<crews::Model> {
        let user_id = principal.require_user()?;
        req.validate()?;

        let existing = Crews::find()
            .filter(CrewColumn::CrewName.eq(&req.crew_name))
            .one(&self.state.db)
            .await?;
        if existing.is_some() {
            return Err(AppError::conflict("A crew with this name already exists"));
        }

        let crew = crews::ActiveModel {
            id:               Set(Uuid::new_v4()),
            crew_name:        Set(req.crew_name),
            crew_description: Set(req.crew_description.unwrap_or_default()),
            member_count:     Set(0),
            crew_image:       Set(req.crew_image),
            created_at:       Set(Utc::now()),
        }
        .insert(&self.state.db)
        .await?;

        info!(crew_id = %crew.id, user_id = %user_id, "Crew created");
        Ok(crew)
    }

    /// Get a single crew by id
    pub async fn get_crew(&self, crew_id: Uuid) -> Result<crews::Model> {
        Crews::find_by_id(crew_id)
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Crew not found"))
    }

    /// List crews with pagination and name search
    pub async fn list_crews(&self, query: CrewListQuery) -> Result<CrewListResponse> {
        let page = query.page();
        let per_page = query.per_page();

        let mut base_query = Crews::find();

        if let Some(ref search) = query.search {
            let pattern = format!("%{}%", escape_like_wildcards(search));
            base_query = base_query.filter(CrewColumn::CrewName.like(&pattern));
        }

        let total = base_query.clone().count(&self.state.db).await?;
        let total_pages = if total == 0 {
            0
        }
        else {
            total.div_ceil(per_page)
        };

        let crews = base_query
            .order_by_asc(CrewColumn::CrewName)
            .paginate(&self.state.db, per_page)
            .fetch_page(page.saturating_sub(1))
            .await?;

        Ok(CrewListResponse {
            crews,
            pagination: PaginationInfo {
                page,
                per_page,
                total,
                total_pages,
            },
        })
    }

    /// Update a crew. Creator only.
    pub async fn update_crew(
        &self,
        principal: &Principal,
        crew_id: Uuid,
        req: UpdateCrewRequest,
    ) -> Result<crews::Model> {
        req.validate()?;

        let crew = self.get_crew(crew_id).await?;
        let actor = self.resolver().require_creator(principal, crew_id).await?;

        let mut active: crews::ActiveModel = crew.into();

        if let Some(name) = req.crew_name {
            let existing = Crews::find()
                .filter(CrewColumn::CrewName.eq(&name))
                .filter(CrewColumn::Id.ne(crew_id))
                .one(&self.state.db)
                .await?;
            if existing.is_some() {
                return Err(AppError::conflict("A crew with this name already exists"));
            }
            active.crew_name = Set(name);
        }
        if let Some(description) = req.crew_description {
            active.crew_description = Set(description);
        }
        if let Some(image) = req.crew_image {
            active.crew_image = Set(Some(image));
        }

        let updated = active.update(&self.state.db).await?;

        info!(crew_id = %crew_id, user_id = %actor, "Crew updated");
        Ok(updated)
    }

    /// Delete a crew. Creator only; memberships cascade with the row.
    pub async fn delete_crew(&self, principal: &Principal, crew_id: Uuid) -> Result<()> {
        self.get_crew(crew_id).await?;
        let actor = self.resolver().require_creator(principal, crew_id).await?;

        Crews::delete_by_id(crew_id).exec(&self.state.db).await?;

        info!(crew_id = %crew_id, user_id = %actor, "Crew deleted");
        Ok(())
    }
}
