//! # Ownership Resolver
//!
//! Answers "can principal P perform action A on entity E" for entities
//! carrying the polymorphic USER/CREW/COMMON owner discriminator, and
//! validates owner fields at creation time. The membership ledger's
//! ACCEPTED rows are the single source of truth for crew-based access.

use entity::{
    crew_members::{Column as MemberColumn, Entity as CrewMembers},
    sea_orm_active_enums::{MembershipRole, MembershipStatus, OwnerType},
};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::principal::Principal;

/// Owner reference of an entity: the discriminator plus the matching id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerRef {
    pub owner_type: OwnerTypeTag,
    pub user_id:    Option<Uuid>,
    pub crew_id:    Option<Uuid>,
}

/// Copyable mirror of [`OwnerType`] for use inside [`OwnerRef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerTypeTag {
    User,
    Crew,
    Common,
}

impl From<&OwnerType> for OwnerTypeTag {
    fn from(owner_type: &OwnerType) -> Self {
        match owner_type {
            OwnerType::User => OwnerTypeTag::User,
            OwnerType::Crew => OwnerTypeTag::Crew,
            OwnerType::Common => OwnerTypeTag::Common,
        }
    }
}

impl OwnerRef {
    /// Owner reference for a USER-owned entity
    #[must_use]
    pub fn user(id: Uuid) -> Self {
        Self {
            owner_type: OwnerTypeTag::User,
            user_id:    Some(id),
            crew_id:    None,
        }
    }

    /// Owner reference for a CREW-owned entity
    #[must_use]
    pub fn crew(id: Uuid) -> Self {
        Self {
            owner_type: OwnerTypeTag::Crew,
            user_id:    None,
            crew_id:    Some(id),
        }
    }

    /// Owner reference for a COMMON entity (no owner)
    #[must_use]
    pub fn common() -> Self {
        Self {
            owner_type: OwnerTypeTag::Common,
            user_id:    None,
            crew_id:    None,
        }
    }
}

/// Builds the owner reference from the persisted discriminator and the
/// raw foreign keys. The reference carries only the id matching the
/// discriminator, so an author column alongside a crew owner does not
/// leak into ownership decisions.
#[must_use]
pub fn owner_ref(owner_type: &OwnerType, user_id: Option<Uuid>, crew_id: Option<Uuid>) -> OwnerRef {
    match owner_type {
        OwnerType::User => {
            OwnerRef {
                owner_type: OwnerTypeTag::User,
                user_id,
                crew_id: None,
            }
        },
        OwnerType::Crew => {
            OwnerRef {
                owner_type: OwnerTypeTag::Crew,
                user_id: None,
                crew_id,
            }
        },
        OwnerType::Common => OwnerRef::common(),
    }
}

/// Implemented by every entity carrying the polymorphic owner pair
pub trait Owned {
    /// The entity's owner reference
    fn owner(&self) -> OwnerRef;
}

impl Owned for entity::challenges::Model {
    fn owner(&self) -> OwnerRef { owner_ref(&self.owner_type, self.user_id, self.crew_id) }
}

impl Owned for entity::templates::Model {
    fn owner(&self) -> OwnerRef { owner_ref(&self.owner_type, self.user_id, self.crew_id) }
}

impl Owned for entity::retrospects::Model {
    fn owner(&self) -> OwnerRef { owner_ref(&self.owner_type, Some(self.user_id), self.crew_id) }
}

impl Owned for entity::weekly_analyses::Model {
    fn owner(&self) -> OwnerRef { owner_ref(&self.owner_type, self.user_id, self.crew_id) }
}

/// Ownership policy checks backed by the membership ledger
#[derive(Clone, Debug)]
pub struct OwnershipResolver {
    db: sea_orm::DbConn,
}

impl OwnershipResolver {
    /// Create a new resolver
    #[must_use]
    pub fn new(db: sea_orm::DbConn) -> Self {
        Self {
            db,
        }
    }

    /// Whether the principal may mutate the entity.
    ///
    /// - USER: the principal is the owning user
    /// - CREW: the principal has an ACCEPTED membership in the owning crew
    /// - COMMON: always denied (reserved for privileged maintenance)
    ///
    /// Anonymous principals are always denied.
    pub async fn can_write(&self, principal: &Principal, entity: &impl Owned) -> Result<bool> {
        let Some(actor) = principal.user_id() else {
            return Ok(false);
        };
        let owner = entity.owner();
        match owner.owner_type {
            OwnerTypeTag::User => Ok(owner.user_id == Some(actor)),
            OwnerTypeTag::Crew => {
                match owner.crew_id {
                    Some(crew_id) => self.is_accepted_member(actor, crew_id).await,
                    None => Ok(false),
                }
            },
            OwnerTypeTag::Common => Ok(false),
        }
    }

    /// Read access for safe operations.
    ///
    /// Defaults to allow; entities with a visibility attribute go through
    /// the visibility filter instead, and anonymous exposure is decided by
    /// each entity's listing scope.
    pub async fn can_read(&self, _principal: &Principal, _entity: &impl Owned) -> Result<bool> {
        Ok(true)
    }

    /// Creation-time owner-field validation.
    ///
    /// Exactly one of user/crew must be set, matching the owner type
    /// (neither for COMMON). For CREW the acting principal must already be
    /// an ACCEPTED member of the target crew.
    pub async fn validate_owner_fields(
        &self,
        principal: &Principal,
        owner_type: &OwnerType,
        user_id: Option<Uuid>,
        crew_id: Option<Uuid>,
    ) -> Result<()> {
        let actor = principal.require_user()?;
        match owner_type {
            OwnerType::User => {
                let Some(user_id) = user_id else {
                    return Err(AppError::validation("User must be set for USER owner type"));
                };
                if crew_id.is_some() {
                    return Err(AppError::validation(
                        "Crew must not be set for USER owner type",
                    ));
                }
                if user_id != actor {
                    return Err(AppError::forbidden(
                        "Cannot create content owned by another user",
                    ));
                }
                Ok(())
            },
            OwnerType::Crew => {
                let Some(crew_id) = crew_id else {
                    return Err(AppError::validation("Crew must be set for CREW owner type"));
                };
                if user_id.is_some() {
                    return Err(AppError::validation(
                        "User must not be set for CREW owner type",
                    ));
                }
                if !self.is_accepted_member(actor, crew_id).await? {
                    return Err(AppError::forbidden(
                        "You are not an accepted member of this crew",
                    ));
                }
                Ok(())
            },
            OwnerType::Common => {
                if user_id.is_some() || crew_id.is_some() {
                    return Err(AppError::validation(
                        "Neither user nor crew may be set for COMMON owner type",
                    ));
                }
                Ok(())
            },
        }
    }

    /// True when the user has an ACCEPTED membership in the crew
    pub async fn is_accepted_member(&self, user_id: Uuid, crew_id: Uuid) -> Result<bool> {
        let count = CrewMembers::find()
            .filter(MemberColumn::UserId.eq(user_id))
            .filter(MemberColumn::CrewId.eq(crew_id))
            .filter(MemberColumn::Status.eq(MembershipStatus::Accepted))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// True when the user holds the crew's ACCEPTED CREATOR membership
    pub async fn is_creator(&self, user_id: Uuid, crew_id: Uuid) -> Result<bool> {
        let count = CrewMembers::find()
            .filter(MemberColumn::UserId.eq(user_id))
            .filter(MemberColumn::CrewId.eq(crew_id))
            .filter(MemberColumn::Status.eq(MembershipStatus::Accepted))
            .filter(MemberColumn::Role.eq(MembershipRole::Creator))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Require the principal to be the crew's creator, returning the
    /// authenticated user id
    pub async fn require_creator(&self, principal: &Principal, crew_id: Uuid) -> Result<Uuid> {
        let actor = principal.require_user()?;
        if self.is_creator(actor, crew_id).await? {
            Ok(actor)
        }
        else {
            Err(AppError::forbidden(
                "Only the crew creator may perform this action",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_ref_constructors() {
        let id = Uuid::new_v4();
        assert_eq!(OwnerRef::user(id).user_id, Some(id));
        assert_eq!(OwnerRef::crew(id).crew_id, Some(id));
        let common = OwnerRef::common();
        assert_eq!(common.user_id, None);
        assert_eq!(common.crew_id, None);
    }

    #[test]
    fn test_owner_ref_masks_author_for_crew_rows() {
        let author = Uuid::new_v4();
        let crew = Uuid::new_v4();
        let owner = owner_ref(&OwnerType::Crew, Some(author), Some(crew));
        assert_eq!(owner.owner_type, OwnerTypeTag::Crew);
        assert_eq!(owner.user_id, None);
        assert_eq!(owner.crew_id, Some(crew));
    }

    #[test]
    fn test_owner_type_tag_from() {
        assert_eq!(OwnerTypeTag::from(&OwnerType::User), OwnerTypeTag::User);
        assert_eq!(OwnerTypeTag::from(&OwnerType::Crew), OwnerTypeTag::Crew);
        assert_eq!(OwnerTypeTag::from(&OwnerType::Common), OwnerTypeTag::Common);
    }
}
