//! Error types for the finance tracker.

/// Domain-level errors (business rule and input violations).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,

    /// A unique constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Token service errors.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT_SECRET is not configured")]
    MissingSecret,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Password hashing failures.
#[derive(Debug, thiserror::Error)]
#[error("Password hashing failed: {0}")]
pub struct HashError(pub String);

/// Application-level errors.
///
/// Every client-facing variant carries a human-readable message and maps to a
/// stable machine-readable code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Bad input: {0}")]
    BadInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub const CODE_UNAUTHENTICATED: &str = "UNAUTHENTICATED";
pub const CODE_BAD_USER_INPUT: &str = "BAD_USER_INPUT";
pub const CODE_NOT_FOUND: &str = "NOT_FOUND";
pub const CODE_INTERNAL: &str = "INTERNAL_SERVER_ERROR";

/// Message returned to clients in place of internal detail.
pub const OPAQUE_INTERNAL_MESSAGE: &str = "Internal server error";

impl AppError {
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        AppError::Unauthenticated(msg.into())
    }

    pub fn bad_input(msg: impl Into<String>) -> Self {
        AppError::BadInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Stable code exposed to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => CODE_UNAUTHENTICATED,
            AppError::BadInput(_) => CODE_BAD_USER_INPUT,
            AppError::NotFound(_) => CODE_NOT_FOUND,
            AppError::Internal(_) => CODE_INTERNAL,
        }
    }

    /// Message safe to show to clients. Internal detail is replaced.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::Unauthenticated(msg) | AppError::BadInput(msg) | AppError::NotFound(msg) => {
                msg
            }
            AppError::Internal(_) => OPAQUE_INTERNAL_MESSAGE,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::Internal(_))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::BadInput(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            RepoError::NotFound => AppError::NotFound("Resource not found.".into()),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Conflict(e) => AppError::BadInput(e),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(_) => AppError::Unauthenticated("Invalid or expired token.".into()),
            e @ (TokenError::MissingSecret | TokenError::Signing(_)) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<HashError> for AppError {
    fn from(err: HashError) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(AppError::unauthenticated("x").code(), "UNAUTHENTICATED");
        assert_eq!(AppError::bad_input("x").code(), "BAD_USER_INPUT");
        assert_eq!(AppError::not_found("x").code(), "NOT_FOUND");
        assert_eq!(AppError::internal("x").code(), "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err: AppError = RepoError::Database("connection refused on 10.0.0.5".into()).into();
        assert!(err.is_internal());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_validation_maps_to_bad_input() {
        let err: AppError = DomainError::Validation("Email is invalid.".into()).into();
        assert_eq!(err, AppError::BadInput("Email is invalid.".into()));
    }

    #[test]
    fn test_invalid_token_maps_to_unauthenticated() {
        let err: AppError = TokenError::Invalid("ExpiredSignature".into()).into();
        assert_eq!(err.code(), "UNAUTHENTICATED");
        assert_eq!(err.public_message(), "Invalid or expired token.");
    }
}
