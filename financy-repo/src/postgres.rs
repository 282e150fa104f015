//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use financy_types::{
    Category, CategoryId, CategoryRepository, NewTransaction, NewUser, RepoError, Transaction,
    TransactionChanges, TransactionId, TransactionRepository, User, UserId, UserRepository,
};

use crate::types::{
    CATEGORY_COLUMNS, DbCategory, DbTransaction, DbUser, TRANSACTION_ORDER, TRANSACTION_SELECT,
    USER_COLUMNS, db_err,
};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository with row-level locking.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_tables_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        tracing::debug!("PostgreSQL repository ready");
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for PostgresRepo {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let user = user.into_user();

        sqlx::query(
            r#"INSERT INTO users (id, name, email, password_hash, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6)"#,
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
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let row: Option<DbUser> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(DbUser::into_domain).transpose()
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

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
        let sql = format!(
            "UPDATE users SET name = $1, password_hash = $2, updated_at = $3 WHERE id = $4 RETURNING {}",
            USER_COLUMNS
        );

        let row: Option<DbUser> = sqlx::query_as(&sql)
            .bind(&name)
            .bind(&password_hash)
            .bind(chrono::Utc::now())
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(DbUser::into_domain).transpose()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Categories
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CategoryRepository for PostgresRepo {
    async fn list_categories(&self, owner: UserId) -> Result<Vec<Category>, RepoError> {
        let sql = format!(
            "SELECT {} FROM categories WHERE user_id = $1 ORDER BY created_at DESC",
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
            r#"INSERT INTO categories (id, name, user_id, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)"#,
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
            "SELECT {} FROM categories WHERE id = $1 AND user_id = $2",
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
        let sql = format!(
            "UPDATE categories SET name = $1, updated_at = $2 WHERE id = $3 AND user_id = $4 RETURNING {}",
            CATEGORY_COLUMNS
        );

        let row: Option<DbCategory> = sqlx::query_as(&sql)
            .bind(&name)
            .bind(chrono::Utc::now())
            .bind(id.to_string())
            .bind(owner.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(DbCategory::into_domain).transpose()
    }

    async fn delete_category(&self, id: CategoryId, owner: UserId) -> Result<bool, RepoError> {
        let mut db_tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            r#"UPDATE transactions SET category_id = NULL WHERE category_id = $1 AND user_id = $2"#,
        )
        .bind(id.to_string())
        .bind(owner.to_string())
        .execute(&mut *db_tx)
        .await
        .map_err(db_err)?;

        let result = sqlx::query(r#"DELETE FROM categories WHERE id = $1 AND user_id = $2"#)
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
impl TransactionRepository for PostgresRepo {
    async fn list_transactions(&self, owner: UserId) -> Result<Vec<Transaction>, RepoError> {
        let sql = format!(
            "{} WHERE t.user_id = $1 {}",
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
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
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
        let sql = format!("{} WHERE t.id = $1 AND t.user_id = $2", TRANSACTION_SELECT);

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
        // Lock the transaction row for the read-modify-write
        let sql = format!(
            "{} WHERE t.id = $1 AND t.user_id = $2 FOR UPDATE OF t",
            TRANSACTION_SELECT
        );

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
               SET title = $1, amount = $2, kind = $3, date = $4, notes = $5, category_id = $6, updated_at = $7
               WHERE id = $8 AND user_id = $9"#,
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
        let result = sqlx::query(r#"DELETE FROM transactions WHERE id = $1 AND user_id = $2"#)
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}
