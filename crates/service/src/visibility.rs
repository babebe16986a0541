//! # Visibility Filter
//!
//! Computes the readable set of visibility-carrying entities for a
//! principal: PUBLIC for everyone, PRIVATE for the owning user only, CREW
//! for ACCEPTED members of the owning crew. Applies to retrospects today
//! and generalizes to any entity implementing [`Owned`] + [`Visible`].

use std::collections::HashSet;

use entity::{
    crew_members::{Column as MemberColumn, Entity as CrewMembers},
    retrospects::Column as RetrospectColumn,
    sea_orm_active_enums::{MembershipStatus, OwnerType, Visibility},
};
use error::Result;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::{
    ownership::{Owned, OwnerRef, OwnerTypeTag},
    principal::Principal,
};

/// Implemented by entities carrying a visibility attribute
pub trait Visible {
    /// The entity's visibility scope
    fn visibility(&self) -> Visibility;
}

impl Visible for entity::retrospects::Model {
    fn visibility(&self) -> Visibility { self.visibility.clone() }
}

/// Visibility-scoped read access backed by the membership ledger
#[derive(Clone, Debug)]
pub struct VisibilityFilter {
    db: sea_orm::DbConn,
}

impl VisibilityFilter {
    /// Create a new filter
    #[must_use]
    pub fn new(db: sea_orm::DbConn) -> Self {
        Self {
            db,
        }
    }

    /// Crew ids where the user is an ACCEPTED member
    pub async fn accepted_crew_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = CrewMembers::find()
            .select_only()
            .column(MemberColumn::CrewId)
            .filter(MemberColumn::UserId.eq(user_id))
            .filter(MemberColumn::Status.eq(MembershipStatus::Accepted))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await?;
        Ok(ids)
    }

    /// Narrow a candidate set to the entities the principal may read.
    ///
    /// Runs a single membership query per call, then evaluates the pure
    /// [`is_readable`] predicate over the candidates.
    pub async fn readable_set<T>(&self, principal: &Principal, items: Vec<T>) -> Result<Vec<T>>
    where
        T: Owned + Visible,
    {
        let accepted: HashSet<Uuid> = match principal.user_id() {
            Some(user_id) => {
                self.accepted_crew_ids(user_id)
                    .await?
                    .into_iter()
                    .collect()
            },
            None => HashSet::new(),
        };
        Ok(items
            .into_iter()
            .filter(|item| is_readable(principal, &item.owner(), &item.visibility(), &accepted))
            .collect())
    }

    /// Visibility scope for retrospect listing queries.
    ///
    /// The union of the principal's own USER-owned rows (any visibility),
    /// CREW/PUBLIC rows of crews the principal is an ACCEPTED member of,
    /// and all PUBLIC rows. A single OR condition, so the union is
    /// deduplicated by construction. Anonymous principals get PUBLIC only.
    pub async fn retrospect_scope(&self, principal: &Principal) -> Result<Condition> {
        let Some(user_id) = principal.user_id() else {
            return Ok(Condition::all().add(RetrospectColumn::Visibility.eq(Visibility::Public)));
        };

        let crew_ids = self.accepted_crew_ids(user_id).await?;
        Ok(Condition::any()
            .add(RetrospectColumn::Visibility.eq(Visibility::Public))
            .add(
                Condition::all()
                    .add(RetrospectColumn::OwnerType.eq(OwnerType::User))
                    .add(RetrospectColumn::UserId.eq(user_id)),
            )
            .add(
                Condition::all()
                    .add(RetrospectColumn::OwnerType.eq(OwnerType::Crew))
                    .add(RetrospectColumn::CrewId.is_in(crew_ids))
                    .add(
                        RetrospectColumn::Visibility.is_in([Visibility::Crew, Visibility::Public]),
                    ),
            ))
    }
}

/// Whether the principal may read an entity with the given owner and
/// visibility, given the set of crews the principal is accepted into.
#[must_use]
pub fn is_readable(
    principal: &Principal,
    owner: &OwnerRef,
    visibility: &Visibility,
    accepted_crews: &HashSet<Uuid>,
) -> bool {
    match visibility {
        Visibility::Public => true,
        Visibility::Private => {
            owner.owner_type == OwnerTypeTag::User
                && owner.user_id.is_some()
                && owner.user_id == principal.user_id()
        },
        Visibility::Crew => {
            match owner.crew_id {
                Some(crew_id) => accepted_crews.contains(&crew_id),
                // USER-owned rows with crew visibility have no owning crew;
                // only the owner reads them.
                None => owner.user_id.is_some() && owner.user_id == principal.user_id(),
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(crews: &[Uuid]) -> HashSet<Uuid> { crews.iter().copied().collect() }

    #[test]
    fn test_public_readable_by_anonymous() {
        let owner = OwnerRef::user(Uuid::new_v4());
        assert!(is_readable(
            &Principal::anonymous(),
            &owner,
            &Visibility::Public,
            &accepted(&[]),
        ));
    }

    #[test]
    fn test_private_readable_only_by_owner() {
        let owner_id = Uuid::new_v4();
        let owner = OwnerRef::user(owner_id);

        assert!(is_readable(
            &Principal::user(owner_id),
            &owner,
            &Visibility::Private,
            &accepted(&[]),
        ));
        assert!(!is_readable(
            &Principal::user(Uuid::new_v4()),
            &owner,
            &Visibility::Private,
            &accepted(&[]),
        ));
        assert!(!is_readable(
            &Principal::anonymous(),
            &owner,
            &Visibility::Private,
            &accepted(&[]),
        ));
    }

    #[test]
    fn test_crew_visibility_requires_membership() {
        let crew_id = Uuid::new_v4();
        let owner = OwnerRef::crew(crew_id);
        let member = Principal::user(Uuid::new_v4());

        assert!(is_readable(
            &member,
            &owner,
            &Visibility::Crew,
            &accepted(&[crew_id]),
        ));
        assert!(!is_readable(
            &member,
            &owner,
            &Visibility::Crew,
            &accepted(&[Uuid::new_v4()]),
        ));
        assert!(!is_readable(
            &Principal::anonymous(),
            &owner,
            &Visibility::Crew,
            &accepted(&[]),
        ));
    }

    #[test]
    fn test_crew_visibility_on_user_owned_row_falls_back_to_owner() {
        let owner_id = Uuid::new_v4();
        let owner = OwnerRef::user(owner_id);

        assert!(is_readable(
            &Principal::user(owner_id),
            &owner,
            &Visibility::Crew,
            &accepted(&[]),
        ));
        assert!(!is_readable(
            &Principal::user(Uuid::new_v4()),
            &owner,
            &Visibility::Crew,
            &accepted(&[]),
        ));
    }
}
