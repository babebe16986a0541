//! # Membership Ledger
//!
//! The crew membership state machine: PENDING/ACCEPTED/REJECTED rows with
//! first-accepted-wins CREATOR promotion and the derived crew
//! `member_count` cache.
//!
//! Every mutating operation runs in a transaction that locks the target
//! crew row first, so the "is this the first accepted member" check and
//! the writes that follow are serialized per crew. `member_count` is
//! always recomputed from the ACCEPTED rows inside the same transaction,
//! never incremented.

use chrono::Utc;
use entity::{
    crew_members::{self, Column as MemberColumn, Entity as CrewMembers},
    crews::{self, Column as CrewColumn, Entity as Crews},
    sea_orm_active_enums::{MembershipRole, MembershipStatus},
};
use error::{AppError, Result};
use sea_orm::{
    sea_query::Expr,
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    DatabaseTransaction,
    DbBackend,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    QuerySelect,
    Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    events::{MembershipAccepted, MembershipRejected},
    ownership::OwnershipResolver,
    principal::Principal,
    AppState,
};

/// Crew membership lifecycle operations
#[derive(Clone)]
pub struct MembershipLedger {
    state: AppState,
}

impl MembershipLedger {
    /// Create a new ledger over the shared state
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
        }
    }

    fn resolver(&self) -> OwnershipResolver { OwnershipResolver::new(self.state.db.clone()) }

    /// Fetch the membership row for (user, crew)
    pub async fn get(&self, user_id: Uuid, crew_id: Uuid) -> Result<crew_members::Model> {
        CrewMembers::find()
            .filter(MemberColumn::UserId.eq(user_id))
            .filter(MemberColumn::CrewId.eq(crew_id))
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Membership not found"))
    }

    /// File a join request, leaving it PENDING until the creator decides.
    ///
    /// The stored role is provisional: CREATOR if the crew has no
    /// membership rows of any status yet, PARTICIPANT otherwise. It is
    /// recomputed when the request is accepted.
    pub async fn request_join(
        &self,
        principal: &Principal,
        crew_id: Uuid,
    ) -> Result<crew_members::Model> {
        let user_id = principal.require_user()?;

        let txn = self.state.db.begin().await?;
        lock_crew(&txn, crew_id).await?;

        if find_membership(&txn, user_id, crew_id).await?.is_some() {
            return Err(AppError::conflict(
                "A membership already exists for this user and crew",
            ));
        }

        let any_membership = CrewMembers::find()
            .filter(MemberColumn::CrewId.eq(crew_id))
            .count(&txn)
            .await?;
        let role = if any_membership == 0 {
            MembershipRole::Creator
        }
        else {
            MembershipRole::Participant
        };

        let membership = crew_members::ActiveModel {
            id:        Set(Uuid::new_v4()),
            user_id:   Set(user_id),
            crew_id:   Set(crew_id),
            role:      Set(role),
            status:    Set(MembershipStatus::Pending),
            joined_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(crew_id = %crew_id, user_id = %user_id, "Join request filed");
        Ok(membership)
    }

    /// Join a crew directly, or accept the caller's own PENDING request.
    ///
    /// - absent:   inserted as ACCEPTED; the first accepted member of the
    ///   crew becomes CREATOR
    /// - PENDING:  transitioned to ACCEPTED, role recomputed
    /// - ACCEPTED: Conflict
    /// - REJECTED: Forbidden (no self-service re-join)
    pub async fn join(&self, principal: &Principal, crew_id: Uuid) -> Result<crew_members::Model> {
        let user_id = principal.require_user()?;

        let txn = self.state.db.begin().await?;
        lock_crew(&txn, crew_id).await?;

        let membership = match find_membership(&txn, user_id, crew_id).await? {
            None => {
                let role = accepted_role(&txn, user_id, crew_id).await?;
                crew_members::ActiveModel {
                    id:        Set(Uuid::new_v4()),
                    user_id:   Set(user_id),
                    crew_id:   Set(crew_id),
                    role:      Set(role),
                    status:    Set(MembershipStatus::Accepted),
                    joined_at: Set(Utc::now()),
                }
                .insert(&txn)
                .await?
            },
            Some(existing) => {
                match existing.status {
                    MembershipStatus::Pending => accept_pending(&txn, existing).await?,
                    MembershipStatus::Accepted => {
                        return Err(AppError::conflict(
                            "User is already a member of this crew",
                        ));
                    },
                    MembershipStatus::Rejected => {
                        return Err(AppError::forbidden(
                            "A rejected join request cannot be re-submitted",
                        ));
                    },
                }
            },
        };

        refresh_member_count(&txn, crew_id).await?;
        txn.commit().await?;

        info!(
            crew_id = %crew_id,
            user_id = %user_id,
            role = %membership.role,
            "Membership accepted"
        );
        self.state
            .notifier
            .membership_accepted(&MembershipAccepted {
                crew_id,
                user_id,
                role: membership.role.clone(),
            })
            .await;

        Ok(membership)
    }

    /// Accept a PENDING join request on behalf of the crew. Creator only.
    ///
    /// The role is recomputed at acceptance: CREATOR iff no other ACCEPTED
    /// membership exists for the crew at transition time.
    pub async fn accept(
        &self,
        actor: &Principal,
        crew_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<crew_members::Model> {
        self.resolver().require_creator(actor, crew_id).await?;

        let txn = self.state.db.begin().await?;
        lock_crew(&txn, crew_id).await?;

        let membership = find_membership(&txn, target_user_id, crew_id)
            .await?
            .ok_or_else(|| AppError::not_found("Membership not found"))?;
        if membership.status != MembershipStatus::Pending {
            return Err(AppError::invalid_state(
                "Only PENDING join requests can be accepted",
            ));
        }

        let membership = accept_pending(&txn, membership).await?;
        refresh_member_count(&txn, crew_id).await?;
        txn.commit().await?;

        info!(
            crew_id = %crew_id,
            user_id = %target_user_id,
            role = %membership.role,
            "Join request accepted"
        );
        self.state
            .notifier
            .membership_accepted(&MembershipAccepted {
                crew_id,
                user_id: target_user_id,
                role: membership.role.clone(),
            })
            .await;

        Ok(membership)
    }

    /// Reject a PENDING join request. Creator only.
    ///
    /// Does not change the ACCEPTED set, so `member_count` is untouched.
    pub async fn reject(
        &self,
        actor: &Principal,
        crew_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<crew_members::Model> {
        self.resolver().require_creator(actor, crew_id).await?;

        let txn = self.state.db.begin().await?;
        lock_crew(&txn, crew_id).await?;

        let membership = find_membership(&txn, target_user_id, crew_id)
            .await?
            .ok_or_else(|| AppError::not_found("Membership not found"))?;
        if membership.status != MembershipStatus::Pending {
            return Err(AppError::invalid_state(
                "Only PENDING join requests can be rejected",
            ));
        }

        let mut active: crew_members::ActiveModel = membership.into();
        active.status = Set(MembershipStatus::Rejected);
        let membership = active.update(&txn).await?;
        txn.commit().await?;

        info!(crew_id = %crew_id, user_id = %target_user_id, "Join request rejected");
        self.state
            .notifier
            .membership_rejected(&MembershipRejected {
                crew_id,
                user_id: target_user_id,
            })
            .await;

        Ok(membership)
    }

    /// Leave a crew, deleting the membership row
    pub async fn leave(&self, principal: &Principal, crew_id: Uuid) -> Result<()> {
        let user_id = principal.require_user()?;

        let txn = self.state.db.begin().await?;
        lock_crew(&txn, crew_id).await?;

        let membership = find_membership(&txn, user_id, crew_id)
            .await?
            .ok_or_else(|| AppError::not_found("You are not a member of this crew"))?;

        CrewMembers::delete_by_id(membership.id).exec(&txn).await?;
        refresh_member_count(&txn, crew_id).await?;
        txn.commit().await?;

        info!(crew_id = %crew_id, user_id = %user_id, "Membership removed");
        Ok(())
    }

    /// ACCEPTED members of a crew in join order
    pub async fn list_members(&self, crew_id: Uuid) -> Result<Vec<crew_members::Model>> {
        // Verify the crew exists
        Crews::find_by_id(crew_id)
            .one(&self.state.db)
            .await?
            .ok_or_else(|| AppError::not_found("Crew not found"))?;

        Ok(CrewMembers::find()
            .filter(MemberColumn::CrewId.eq(crew_id))
            .filter(MemberColumn::Status.eq(MembershipStatus::Accepted))
            .order_by_asc(MemberColumn::JoinedAt)
            .all(&self.state.db)
            .await?)
    }

    /// Crews where the principal is an ACCEPTED member
    pub async fn my_crews(&self, principal: &Principal) -> Result<Vec<crews::Model>> {
        let user_id = principal.require_user()?;

        let crew_ids: Vec<Uuid> = CrewMembers::find()
            .select_only()
            .column(MemberColumn::CrewId)
            .filter(MemberColumn::UserId.eq(user_id))
            .filter(MemberColumn::Status.eq(MembershipStatus::Accepted))
            .into_tuple()
            .all(&self.state.db)
            .await?;

        Ok(Crews::find()
            .filter(CrewColumn::Id.is_in(crew_ids))
            .order_by_asc(CrewColumn::CrewName)
            .all(&self.state.db)
            .await?)
    }
}

/// Lock the crew row for the duration of a membership mutation.
///
/// `SELECT ... FOR UPDATE` serializes concurrent membership mutations per
/// crew on Postgres. SQLite has no row locks; its single-writer
/// transactions already serialize the check-then-act sequence.
async fn lock_crew(txn: &DatabaseTransaction, crew_id: Uuid) -> Result<crews::Model> {
    let mut query = Crews::find_by_id(crew_id);
    if txn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query
        .one(txn)
        .await?
        .ok_or_else(|| AppError::not_found("Crew not found"))
}

async fn find_membership(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    crew_id: Uuid,
) -> Result<Option<crew_members::Model>> {
    Ok(CrewMembers::find()
        .filter(MemberColumn::UserId.eq(user_id))
        .filter(MemberColumn::CrewId.eq(crew_id))
        .one(txn)
        .await?)
}

/// Role for a membership becoming ACCEPTED now: CREATOR iff no other
/// ACCEPTED membership exists for the crew at this moment.
async fn accepted_role(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    crew_id: Uuid,
) -> Result<MembershipRole> {
    let other_accepted = CrewMembers::find()
        .filter(MemberColumn::CrewId.eq(crew_id))
        .filter(MemberColumn::Status.eq(MembershipStatus::Accepted))
        .filter(MemberColumn::UserId.ne(user_id))
        .count(txn)
        .await?;
    Ok(if other_accepted == 0 {
        MembershipRole::Creator
    }
    else {
        MembershipRole::Participant
    })
}

/// Transition a PENDING membership to ACCEPTED, recomputing the role
async fn accept_pending(
    txn: &DatabaseTransaction,
    membership: crew_members::Model,
) -> Result<crew_members::Model> {
    let role = accepted_role(txn, membership.user_id, membership.crew_id).await?;
    let mut active: crew_members::ActiveModel = membership.into();
    active.status = Set(MembershipStatus::Accepted);
    active.role = Set(role);
    Ok(active.update(txn).await?)
}

/// Recompute the crew's cached `member_count` from the ACCEPTED rows
async fn refresh_member_count(txn: &DatabaseTransaction, crew_id: Uuid) -> Result<u64> {
    let count = CrewMembers::find()
        .filter(MemberColumn::CrewId.eq(crew_id))
        .filter(MemberColumn::Status.eq(MembershipStatus::Accepted))
        .count(txn)
        .await?;

    Crews::update_many()
        .col_expr(CrewColumn::MemberCount, Expr::value(count as i32))
        .filter(CrewColumn::Id.eq(crew_id))
        .exec(txn)
        .await?;

    Ok(count)
}
