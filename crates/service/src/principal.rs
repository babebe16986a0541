//! # Request Principal
//!
//! The identity a request acts as: an authenticated user or an anonymous
//! caller. Authentication itself (tokens, sessions) happens in the
//! surrounding request-handling code; this core only consumes the result.

use error::{AppError, Result};
use uuid::Uuid;

/// The acting identity of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// An authenticated user
    User {
        /// User id
        id: Uuid,
    },
    /// An unauthenticated caller
    Anonymous,
}

impl Principal {
    /// Principal for an authenticated user
    #[must_use]
    pub fn user(id: Uuid) -> Self {
        Self::User {
            id,
        }
    }

    /// Principal for an unauthenticated caller
    #[must_use]
    pub fn anonymous() -> Self { Self::Anonymous }

    /// The user id, if authenticated
    #[must_use]
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Principal::User {
                id,
            } => Some(*id),
            Principal::Anonymous => None,
        }
    }

    /// Whether the principal is an authenticated user
    #[must_use]
    pub fn is_authenticated(&self) -> bool { matches!(self, Principal::User { .. }) }

    /// The authenticated user id, or Unauthorized
    pub fn require_user(&self) -> Result<Uuid> {
        self.user_id()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_principal() {
        let id = Uuid::new_v4();
        let principal = Principal::user(id);
        assert!(principal.is_authenticated());
        assert_eq!(principal.user_id(), Some(id));
        assert_eq!(principal.require_user().unwrap(), id);
    }

    #[test]
    fn test_anonymous_principal() {
        let principal = Principal::anonymous();
        assert!(!principal.is_authenticated());
        assert_eq!(principal.user_id(), None);

        let err = principal.require_user().unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");
    }
}
