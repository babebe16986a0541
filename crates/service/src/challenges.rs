//! # Challenge Lifecycle
//!
//! Challenge creation with generated plan/KPI, the LIVE -> SUCCESS/FAIL
//! status overwrite, ownership-scoped listing with a lenient status
//! filter, and per-user achievement tracking.

use chrono::Utc;
use entity::{
    challenges::{self, Column as ChallengeColumn, Entity as Challenges},
    plans,
    sea_orm_active_enums::{AchievementStatus, ChallengeStatus, OwnerType},
    user_challenge_statuses::{self, Column as AchievementColumn, Entity as UserChallengeStatuses},
};
use error::{AppError, Result};
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    Condition,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    Set,
};
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        challenges::{ChallengeListQuery, ChallengeListResponse, CreateChallengeRequest},
        PaginationInfo,
    },
    ownership::OwnershipResolver,
    principal::Principal,
    visibility::VisibilityFilter,
    AppState,
};

/// Challenge workflow operations
#[derive(Clone)]
pub struct ChallengeLifecycle {
    state: AppState,
}

impl ChallengeLifecycle {
    /// Create a new lifecycle service over the shared state
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
        }
    }

    fn resolver(&self) -> OwnershipResolver { OwnershipResolver::new(self.state.db.clone()) }

    /// Create a challenge, generating its plan and KPI.
    ///
    /// Generation failures are logged and degrade to an empty plan/KPI;
    /// the challenge is still created. Retries are the generator's
    /// concern, not this core's.
    pub async fn create_challenge(
        &self,
        principal: &Principal,
        req: CreateChallengeRequest,
    ) -> Result<challenges::Model> {
        req.validate()?;

        if req.owner_type == OwnerType::Common {
            return Err(AppError::validation(
                "COMMON ownership is reserved for templates",
            ));
        }

        let owner_user = match req.owner_type {
            OwnerType::User => Some(principal.require_user()?),
            _ => None,
        };
        self.resolver()
            .validate_owner_fields(principal, &req.owner_type, owner_user, req.crew_id)
            .await?;

        let (plan_id, steps) = match self.state.planner.generate_plan(&req.description).await {
            Ok(steps) => {
                let plan = plans::ActiveModel {
                    id:        Set(Uuid::new_v4()),
                    plan_list: Set(steps.clone()),
                }
                .insert(&self.state.db)
                .await?;
                (Some(plan.id), steps)
            },
            Err(e) => {
                warn!(error = %e, "Plan generation failed; creating challenge without a plan");
                (None, serde_json::Value::Array(Vec::new()))
            },
        };

        let (kpi_description, kpi_metrics) = match self
            .state
            .planner
            .generate_kpi(&req.challenge_name, &steps)
            .await
        {
            Ok((description, metrics)) => (description, Some(metrics)),
            Err(e) => {
                warn!(error = %e, "KPI generation failed; creating challenge without KPI");
                (String::new(), None)
            },
        };

        let challenge = challenges::ActiveModel {
            id:              Set(Uuid::new_v4()),
            plan_id:         Set(plan_id),
            user_id:         Set(owner_user),
            crew_id:         Set(req.crew_id),
            challenge_name:  Set(req.challenge_name),
            deadline:        Set(req.deadline),
            kpi_description: Set(kpi_description),
            kpi_metrics:     Set(kpi_metrics),
            owner_type:      Set(req.owner_type),
            status:          Set(ChallengeStatus::Live),
            created_at:      Set(Utc::now()),
        }
        .insert(&self.state.db)
        .await?;

        info!(challenge_id = %challenge.id, owner_type = %challenge.owner_type, "Challenge created");
        Ok(challenge)
    }

    /// Get a single challenge by id
    pub async fn get_challenge(
        &self,
        principal: &Principal,
        challenge_id: Uuid,
    ) -> Result<challenges::Model> {
        principal.require_user()?;
        Challenges::find_by_id(challenge_id)
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Challenge not found"))
    }

    /// Overwrite the challenge status.
    ///
    /// Forbidden unless the actor can write the challenge; Validation on
    /// an unrecognized status. No transition graph is enforced: any
    /// recognized status overwrites any other.
    pub async fn update_status(
        &self,
        actor: &Principal,
        challenge_id: Uuid,
        new_status: &str,
    ) -> Result<challenges::Model> {
        let challenge = Challenges::find_by_id(challenge_id)
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Challenge not found"))?;

        if !self.resolver().can_write(actor, &challenge).await? {
            return Err(AppError::forbidden(
                "You do not have permission to update this challenge",
            ));
        }

        let status = parse_challenge_status(new_status)?;

        let mut active: challenges::ActiveModel = challenge.into();
        active.status = Set(status.clone());
        let updated = active.update(&self.state.db).await?;

        info!(challenge_id = %challenge_id, status = %status, "Challenge status updated");
        Ok(updated)
    }

    /// List the principal's own and crew challenges.
    ///
    /// An unrecognized status filter value is ignored rather than
    /// rejected.
    pub async fn list_challenges(
        &self,
        principal: &Principal,
        query: ChallengeListQuery,
    ) -> Result<ChallengeListResponse> {
        let user_id = principal.require_user()?;
        let page = query.page();
        let per_page = query.per_page();

        let crew_ids = VisibilityFilter::new(self.state.db.clone())
            .accepted_crew_ids(user_id)
            .await?;

        let mut base_query = Challenges::find().filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(ChallengeColumn::OwnerType.eq(OwnerType::User))
                        .add(ChallengeColumn::UserId.eq(user_id)),
                )
                .add(
                    Condition::all()
                        .add(ChallengeColumn::OwnerType.eq(OwnerType::Crew))
                        .add(ChallengeColumn::CrewId.is_in(crew_ids)),
                ),
        );

        if let Some(raw) = query.status.as_deref() {
            match parse_challenge_status(raw) {
                Ok(status) => base_query = base_query.filter(ChallengeColumn::Status.eq(status)),
                Err(_) => {
                    debug!(value = raw, "Ignoring unrecognized status filter");
                },
            }
        }

        let total = base_query.clone().count(&self.state.db).await?;
        let total_pages = if total == 0 {
            0
        }
        else {
            total.div_ceil(per_page)
        };

        let challenges = base_query
            .order_by_desc(ChallengeColumn::CreatedAt)
            .paginate(&self.state.db, per_page)
            .fetch_page(page.saturating_sub(1))
            .await?;

        Ok(ChallengeListResponse {
            challenges,
            pagination: PaginationInfo {
                page,
                per_page,
                total,
                total_pages,
            },
        })
    }

    /// Record the caller's achievement state for a challenge (upsert)
    pub async fn record_achievement(
        &self,
        principal: &Principal,
        challenge_id: Uuid,
        status: &str,
    ) -> Result<user_challenge_statuses::Model> {
        let user_id = principal.require_user()?;

        let challenge = Challenges::find_by_id(challenge_id)
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Challenge not found"))?;

        if !self.resolver().can_write(principal, &challenge).await? {
            return Err(AppError::forbidden(
                "You do not have access to this challenge",
            ));
        }

        let status = parse_achievement_status(status)?;

        let existing = UserChallengeStatuses::find()
            .filter(AchievementColumn::UserId.eq(user_id))
            .filter(AchievementColumn::ChallengeId.eq(challenge_id))
            .one(&self.state.db)
            .await?;

        let record = match existing {
            Some(record) => {
                let mut active: user_challenge_statuses::ActiveModel = record.into();
                active.status = Set(status.clone());
                active.updated_at = Set(Utc::now());
                active.update(&self.state.db).await?
            },
            None => {
                user_challenge_statuses::ActiveModel {
                    id:           Set(Uuid::new_v4()),
                    user_id:      Set(user_id),
                    challenge_id: Set(challenge_id),
                    status:       Set(status.clone()),
                    updated_at:   Set(Utc::now()),
                }
                .insert(&self.state.db)
                .await?
            },
        };

        info!(
            challenge_id = %challenge_id,
            user_id = %user_id,
            status = %status,
            "Achievement recorded"
        );
        Ok(record)
    }
}

/// Parse a challenge status string (LIVE, SUCCESS, FAIL)
fn parse_challenge_status(raw: &str) -> Result<ChallengeStatus> {
    match raw.to_uppercase().as_str() {
        "LIVE" => Ok(ChallengeStatus::Live),
        "SUCCESS" => Ok(ChallengeStatus::Success),
        "FAIL" => Ok(ChallengeStatus::Fail),
        _ => {
            Err(AppError::validation(
                "Invalid status. Must be one of: LIVE, SUCCESS, FAIL",
            ))
        },
    }
}

/// Parse an achievement status string (ACHIEVED, FAILED, PENDING)
fn parse_achievement_status(raw: &str) -> Result<AchievementStatus> {
    match raw.to_uppercase().as_str() {
        "ACHIEVED" => Ok(AchievementStatus::Achieved),
        "FAILED" => Ok(AchievementStatus::Failed),
        "PENDING" => Ok(AchievementStatus::Pending),
        _ => {
            Err(AppError::validation(
                "Invalid status. Must be one of: ACHIEVED, FAILED, PENDING",
            ))
        },
    }
}
