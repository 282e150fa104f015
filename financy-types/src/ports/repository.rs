//! Repository port traits.
//!
//! Adapters (Postgres, SQLite, in-memory) implement these traits. Every
//! category and transaction operation is scoped to an owning user: a record
//! owned by someone else behaves exactly like a missing one.

use crate::domain::{
    Category, CategoryId, NewTransaction, NewUser, Transaction, TransactionChanges, TransactionId,
    User, UserId,
};
use crate::error::RepoError;

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Stores a new user. A taken email is reported as `RepoError::Conflict`.
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError>;

    /// Looks a user up by normalized email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, RepoError>;

    /// Replaces a user's name and password hash. Returns `None` when no such
    /// user exists.
    async fn update_user_credentials(
        &self,
        id: UserId,
        name: String,
        password_hash: String,
    ) -> Result<Option<User>, RepoError>;
}

#[async_trait::async_trait]
pub trait CategoryRepository: Send + Sync + 'static {
    /// Lists the owner's categories, newest-created first.
    async fn list_categories(&self, owner: UserId) -> Result<Vec<Category>, RepoError>;

    /// Stores a new category. A duplicate `(name, owner)` is `RepoError::Conflict`.
    async fn create_category(&self, category: Category) -> Result<Category, RepoError>;

    async fn find_category(
        &self,
        id: CategoryId,
        owner: UserId,
    ) -> Result<Option<Category>, RepoError>;

    /// Renames an owned category. Returns `None` when no such record exists.
    async fn rename_category(
        &self,
        id: CategoryId,
        owner: UserId,
        name: String,
    ) -> Result<Option<Category>, RepoError>;

    /// Deletes at most one owned category and clears it from referencing
    /// transactions. Returns whether a record was deleted.
    async fn delete_category(&self, id: CategoryId, owner: UserId) -> Result<bool, RepoError>;
}

#[async_trait::async_trait]
pub trait TransactionRepository: Send + Sync + 'static {
    /// Lists the owner's transactions with their category resolved, newest
    /// date first.
    async fn list_transactions(&self, owner: UserId) -> Result<Vec<Transaction>, RepoError>;

    /// Stores a new transaction and returns it with its category resolved.
    async fn create_transaction(&self, tx: NewTransaction) -> Result<Transaction, RepoError>;

    async fn find_transaction(
        &self,
        id: TransactionId,
        owner: UserId,
    ) -> Result<Option<Transaction>, RepoError>;

    /// Applies a partial update atomically. Returns `None` when no owned
    /// record exists.
    async fn update_transaction(
        &self,
        id: TransactionId,
        owner: UserId,
        changes: TransactionChanges,
    ) -> Result<Option<Transaction>, RepoError>;

    async fn delete_transaction(&self, id: TransactionId, owner: UserId)
        -> Result<bool, RepoError>;
}

/// Full storage capability needed by the application services.
pub trait FinanceRepository: UserRepository + CategoryRepository + TransactionRepository {}

impl<T> FinanceRepository for T where T: UserRepository + CategoryRepository + TransactionRepository {}
