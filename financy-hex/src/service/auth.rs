//! Signup and login.

use std::sync::Arc;

use financy_types::validation::{self, NAME_LIMITS, TextLimits};
use financy_types::{
    AppError, AuthPayload, LoginInput, NewUser, PasswordHasher, RepoError, SignupInput,
    TokenService, UserRepository,
};

const EMAIL_IN_USE: &str = "Email is already in use.";
const INVALID_CREDENTIALS: &str = "Invalid credentials.";

pub struct AuthService<R: UserRepository> {
    repo: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, hasher: Arc<dyn PasswordHasher>, tokens: Arc<dyn TokenService>) -> Self {
        Self {
            repo,
            hasher,
            tokens,
        }
    }

    /// Registers a user and returns a token for them.
    #[tracing::instrument(skip_all)]
    pub async fn signup(&self, input: SignupInput) -> Result<AuthPayload, AppError> {
        let name = validation::required_text(&input.name, "Name", NAME_LIMITS)?;
        let email = validation::email(&input.email)?;
        let password = validation::password(&input.password)?;

        if self.repo.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::bad_input(EMAIL_IN_USE));
        }

        let password_hash = self.hasher.hash(password).await?;

        // A concurrent signup may win the race past the check above.
        let user = self
            .repo
            .create_user(NewUser {
                name,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepoError::Conflict(_) => AppError::bad_input(EMAIL_IN_USE),
                other => other.into(),
            })?;

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = %user.id, "user signed up");

        Ok(AuthPayload { token, user })
    }

    /// Authenticates by email and password.
    ///
    /// Unknown email and wrong password fail identically.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, input: LoginInput) -> Result<AuthPayload, AppError> {
        let email = validation::email(&input.email)?;
        validation::required_text(&input.password, "Password", TextLimits::default())?;

        let user = self
            .repo
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::unauthenticated(INVALID_CREDENTIALS))?;

        if !self.hasher.verify(&input.password, &user.password_hash).await? {
            tracing::debug!(user_id = %user.id, "password mismatch");
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        }

        let token = self.tokens.issue(user.id)?;
        Ok(AuthPayload { token, user })
    }
}
