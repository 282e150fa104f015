use std::sync::Arc;

use financy_types::{AppError, User, UserId, UserRepository};

pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Returns the caller's own record.
    ///
    /// A valid token for a user that no longer exists is an internal failure.
    #[tracing::instrument(skip(self))]
    pub async fn me(&self, owner: UserId) -> Result<User, AppError> {
        self.repo
            .find_user_by_id(owner)
            .await?
            .ok_or_else(|| AppError::internal("Authenticated user was not found."))
    }
}
