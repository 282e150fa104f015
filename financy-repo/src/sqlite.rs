//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use financy_types::{
    Category, CategoryId, CategoryRepository, NewTransaction, NewUser, RepoError, Transaction,
    TransactionChanges, TransactionId, TransactionRepository, User, UserId, UserRepository,
};

use crate::types::{
    CATEGORY_COLUMNS, DbCategory, DbTransaction, DbUser, TRANSACTION_ORDER, TRANSACTION_SELECT,
    USER_COLUMNS, db_err,
};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if !is_in_memory(database_url) {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to an in-memory database is a separate database.
        let pool = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };

        let repo = Self { pool };
        repo.create_schema().await?;

        tracing::debug!(database_url, "SQLite repository ready");
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_tables.sql");
        sqlx::query(ddl).execute(&self.pool).await.map_err(db_err)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for SqliteRepo {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let user = user.into_user();

        sqlx::query(
            r#"INSERT INTO users (id, name, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);

        let row: Option<DbUser> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(DbUser::into_domain).transpose()
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);

        let row: Option<DbUser> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(DbUser::into_domain).transpose()
    }

    async fn update_user_credentials(
        &self,
        id: UserId,
        name: String,
        password_hash: String,
    ) -> Result<Option<User>, RepoError> {
        let result = sqlx::query(
            r#"UPDATE users SET name = ?, password_hash = ?, updated_at = ? WHERE id = ?"#,
        )
        .bind(&name)
        .bind(&password_hash)
        .bind(chrono::Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_user_by_id(id).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Categories
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CategoryRepository for SqliteRepo {
    async fn list_categories(&self, owner: UserId) -> Result<Vec<Category>, RepoError> {
        let sql = format!(
            "SELECT {} FROM categories WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
            CATEGORY_COLUMNS
        );

        let rows: Vec<DbCategory> = sqlx::query_as(&sql)
            .bind(owner.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.into_iter().map(DbCategory::into_domain).collect()
    }

    async fn create_category(&self, category: Category) -> Result<Category, RepoError> {
        sqlx::query(
            r#"INSERT INTO categories (id, name, user_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(category.id.to_string())
        .bind(&category.name)
        .bind(category.user_id.to_string())
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(category)
    }

    async fn find_category(
        &self,
        id: CategoryId,
        owner: UserId,
    ) -> Result<Option<Category>, RepoError> {
        let sql = format!(
            "SELECT {} FROM categories WHERE id = ? AND user_id = ?",
            CATEGORY_COLUMNS
        );

        let row: Option<DbCategory> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .bind(owner.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(DbCategory::into_domain).transpose()
    }

    async fn rename_category(
        &self,
        id: CategoryId,
        owner: UserId,
        name: String,
    ) -> Result<Option<Category>, RepoError> {
        let result =
            sqlx::query(r#"UPDATE categories SET name = ?, updated_at = ? WHERE id = ? AND user_id = ?"#)
                .bind(&name)
                .bind(chrono::Utc::now())
                .bind(id.to_string())
                .bind(owner.to_string())
                .execute(&self.pool)
                .await
                .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_category(id, owner).await
    }

    async fn delete_category(&self, id: CategoryId, owner: UserId) -> Result<bool, RepoError> {
        let mut db_tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            r#"UPDATE transactions SET category_id = NULL WHERE category_id = ? AND user_id = ?"#,
        )
        .bind(id.to_string())
        .bind(owner.to_string())
        .execute(&mut *db_tx)
        .await
        .map_err(db_err)?;

        let result = sqlx::query(r#"DELETE FROM categories WHERE id = ? AND user_id = ?"#)
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&mut *db_tx)
            .await
            .map_err(db_err)?;

        db_tx.commit().await.map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transactions
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl TransactionRepository for SqliteRepo {
    async fn list_transactions(&self, owner: UserId) -> Result<Vec<Transaction>, RepoError> {
        let sql = format!(
            "{} WHERE t.user_id = ? {}",
            TRANSACTION_SELECT, TRANSACTION_ORDER
        );

        let rows: Vec<DbTransaction> = sqlx::query_as(&sql)
            .bind(owner.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.into_iter().map(DbTransaction::into_domain).collect()
    }

    async fn create_transaction(&self, tx: NewTransaction) -> Result<Transaction, RepoError> {
        let tx = tx.into_transaction();

        sqlx::query(
            r#"INSERT INTO transactions (id, title, amount, kind, date, notes, user_id, category_id, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(tx.id.to_string())
        .bind(&tx.title)
        .bind(tx.amount)
        .bind(tx.transaction_type.as_str())
        .bind(tx.date)
        .bind(&tx.notes)
        .bind(tx.user_id.to_string())
        .bind(tx.category_id.map(|id| id.to_string()))
        .bind(tx.created_at)
        .bind(tx.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.find_transaction(tx.id, tx.user_id)
            .await?
            .ok_or(RepoError::NotFound)
    }

    async fn find_transaction(
        &self,
        id: TransactionId,
        owner: UserId,
    ) -> Result<Option<Transaction>, RepoError> {
        let sql = format!("{} WHERE t.id = ? AND t.user_id = ?", TRANSACTION_SELECT);

        let row: Option<DbTransaction> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .bind(owner.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(DbTransaction::into_domain).transpose()
    }

    async fn update_transaction(
        &self,
        id: TransactionId,
        owner: UserId,
        changes: TransactionChanges,
    ) -> Result<Option<Transaction>, RepoError> {
        let sql = format!("{} WHERE t.id = ? AND t.user_id = ?", TRANSACTION_SELECT);

        let mut db_tx = self.pool.begin().await.map_err(db_err)?;

        let row: Option<DbTransaction> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .bind(owner.to_string())
            .fetch_optional(&mut *db_tx)
            .await
            .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut tx = row.into_domain()?;
        tx.apply(changes);

        sqlx::query(
            r#"UPDATE transactions
               SET title = ?, amount = ?, kind = ?, date = ?, notes = ?, category_id = ?, updated_at = ?
               WHERE id = ? AND user_id = ?"#,
        )
        .bind(&tx.title)
        .bind(tx.amount)
        .bind(tx.transaction_type.as_str())
        .bind(tx.date)
        .bind(&tx.notes)
        .bind(tx.category_id.map(|id| id.to_string()))
        .bind(tx.updated_at)
        .bind(id.to_string())
        .bind(owner.to_string())
        .execute(&mut *db_tx)
        .await
        .map_err(db_err)?;

        db_tx.commit().await.map_err(db_err)?;

        self.find_transaction(id, owner).await
    }

    async fn delete_transaction(&self, id: TransactionId, owner: UserId) -> Result<bool, RepoError> {
        let result = sqlx::query(r#"DELETE FROM transactions WHERE id = ? AND user_id = ?"#)
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
