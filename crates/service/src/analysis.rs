//! # Weekly Analysis Service
//!
//! Stores weekly retrospective analyses for a user or a crew and emits a
//! completion event for the notification sink.

use chrono::Utc;
use entity::{
    sea_orm_active_enums::OwnerType,
    weekly_analyses::{self, Column as AnalysisColumn, Entity as WeeklyAnalyses},
};
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::analysis::CreateWeeklyAnalysisRequest,
    events::WeeklyAnalysisCompleted,
    ownership::OwnershipResolver,
    principal::Principal,
    visibility::VisibilityFilter,
    AppState,
};

/// Weekly analysis operations
#[derive(Clone)]
pub struct WeeklyAnalysisService {
    state: AppState,
}

impl WeeklyAnalysisService {
    /// Create a new service over the shared state
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
        }
    }

    fn resolver(&self) -> OwnershipResolver { OwnershipResolver::new(self.state.db.clone()) }

    /// Store a weekly analysis and emit the completion event
    pub async fn create_weekly_analysis(
        &self,
        principal: &Principal,
        req: CreateWeeklyAnalysisRequest,
    ) -> Result<weekly_analyses::Model> {
        req.validate()?;

        if req.owner_type == OwnerType::Common {
            return Err(AppError::validation(
                "COMMON ownership is reserved for templates",
            ));
        }
        if req.end_date < req.start_date {
            return Err(AppError::validation(
                "end_date must not precede start_date",
            ));
        }

        let owner_user = match req.owner_type {
            OwnerType::User => Some(principal.require_user()?),
            _ => None,
        };
        self.resolver()
            .validate_owner_fields(principal, &req.owner_type, owner_user, req.crew_id)
            .await?;

        let analysis = weekly_analyses::ActiveModel {
            id:         Set(Uuid::new_v4()),
            user_id:    Set(owner_user),
            crew_id:    Set(req.crew_id),
            summary:    Set(req.summary),
            weekly_kpi: Set(req.weekly_kpi),
            start_date: Set(req.start_date),
            end_date:   Set(req.end_date),
            owner_type: Set(req.owner_type),
            created_at: Set(Utc::now()),
        }
        .insert(&self.state.db)
        .await?;

        info!(
            analysis_id = %analysis.id,
            owner_type = %analysis.owner_type,
            "Weekly analysis stored"
        );
        self.state
            .notifier
            .weekly_analysis_completed(&WeeklyAnalysisCompleted {
                analysis_id: analysis.id,
                owner_type:  analysis.owner_type.clone(),
                user_id:     analysis.user_id,
                crew_id:     analysis.crew_id,
            })
            .await;

        Ok(analysis)
    }

    /// List the principal's own and crew analyses, newest week first
    pub async fn list_weekly_analyses(
        &self,
        principal: &Principal,
    ) -> Result<Vec<weekly_analyses::Model>> {
        let user_id = principal.require_user()?;

        let crew_ids = VisibilityFilter::new(self.state.db.clone())
            .accepted_crew_ids(user_id)
            .await?;

        Ok(WeeklyAnalyses::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(AnalysisColumn::OwnerType.eq(OwnerType::User))
                            .add(AnalysisColumn::UserId.eq(user_id)),
                    )
                    .add(
                        Condition::all()
                            .add(AnalysisColumn::OwnerType.eq(OwnerType::Crew))
                            .add(AnalysisColumn::CrewId.is_in(crew_ids)),
                    ),
            )
            .order_by_desc(AnalysisColumn::StartDate)
            .all(&self.state.db)
            .await?)
    }
}
