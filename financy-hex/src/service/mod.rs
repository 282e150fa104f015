//! Application services.
//!
//! Each service validates untrusted input, enforces per-user ownership, and
//! delegates to the repository ports. Services never build transport payloads.

mod auth;
mod category;
mod transaction;
mod user;

use std::sync::Arc;

use financy_types::{FinanceRepository, PasswordHasher, TokenService};

pub use auth::AuthService;
pub use category::CategoryService;
pub use transaction::TransactionService;
pub use user::UserService;

/// All application services sharing one repository handle.
///
/// Generic over `R: FinanceRepository` - the adapter is injected at compile time.
pub struct Services<R: FinanceRepository> {
    pub auth: AuthService<R>,
    pub categories: CategoryService<R>,
    pub transactions: TransactionService<R>,
    pub users: UserService<R>,
    tokens: Arc<dyn TokenService>,
}

impl<R: FinanceRepository> Services<R> {
    pub fn new(repo: R, hasher: Arc<dyn PasswordHasher>, tokens: Arc<dyn TokenService>) -> Self {
        let repo = Arc::new(repo);
        Self {
            auth: AuthService::new(repo.clone(), hasher, tokens.clone()),
            categories: CategoryService::new(repo.clone()),
            transactions: TransactionService::new(repo.clone()),
            users: UserService::new(repo),
            tokens,
        }
    }

    /// Token service used by the authorization gate.
    pub fn tokens(&self) -> &dyn TokenService {
        self.tokens.as_ref()
    }
}
