//! Per-request caller identity.

use crate::domain::UserId;
use crate::error::AppError;

/// Who is making the request, derived from the bearer credential.
///
/// Never persisted and never global: the inbound adapter builds one per
/// request and passes it down explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caller {
    user_id: Option<UserId>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn authenticated(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Returns the caller's user id, or `Unauthenticated` for anonymous callers.
    pub fn require(&self) -> Result<UserId, AppError> {
        self.user_id
            .ok_or_else(|| AppError::unauthenticated("Authentication required."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_caller_is_rejected() {
        let err = Caller::anonymous().require().unwrap_err();
        assert_eq!(err, AppError::Unauthenticated("Authentication required.".into()));
    }

    #[test]
    fn test_authenticated_caller() {
        let id = UserId::new();
        assert_eq!(Caller::authenticated(id).require().unwrap(), id);
    }
}
