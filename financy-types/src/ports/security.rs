//! Credential ports: password hashing and identity tokens.

use crate::domain::UserId;
use crate::error::{HashError, TokenError};

/// Irreversible password hashing.
///
/// Implementations must not block the async scheduler.
#[async_trait::async_trait]
pub trait PasswordHasher: Send + Sync + 'static {
    async fn hash(&self, password: &str) -> Result<String, HashError>;

    /// Returns `Ok(false)` on mismatch; errors only when the stored hash is unusable.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError>;
}

/// Issues and verifies signed, time-limited identity tokens.
pub trait TokenService: Send + Sync + 'static {
    fn issue(&self, user_id: UserId) -> Result<String, TokenError>;

    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
