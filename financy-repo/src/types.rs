//! Database row types shared by the SQLite and PostgreSQL adapters.
//!
//! Ids are stored as TEXT and timestamps as `DateTime<Utc>` in both backends,
//! so one set of rows decodes from either driver.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use financy_types::{
    Category, CategoryId, RepoError, Transaction, TransactionId, TransactionType, User, UserId,
};

// ─────────────────────────────────────────────────────────────────────────────
// Shared SQL
// ─────────────────────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

pub const CATEGORY_COLUMNS: &str = "id, name, user_id, created_at, updated_at";

/// Transactions joined with their (optional) category.
pub const TRANSACTION_SELECT: &str = r#"SELECT t.id, t.title, t.amount, t.kind, t.date, t.notes, t.user_id, t.category_id,
       c.name AS category_name, c.created_at AS category_created_at, c.updated_at AS category_updated_at,
       t.created_at, t.updated_at
FROM transactions t
LEFT JOIN categories c ON c.id = t.category_id"#;

pub const TRANSACTION_ORDER: &str = "ORDER BY t.date DESC, t.created_at DESC";

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// User row from database.
#[derive(FromRow)]
pub struct DbUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category row from database.
#[derive(FromRow)]
pub struct DbCategory {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transaction row joined with its category columns.
#[derive(FromRow)]
pub struct DbTransaction {
    pub id: String,
    pub title: String,
    pub amount: f64,
    pub kind: String,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub user_id: String,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub category_created_at: Option<DateTime<Utc>>,
    pub category_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_uuid(s: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(s).map_err(|e| RepoError::Database(format!("Corrupt id {}: {}", s, e)))
}

pub fn parse_transaction_type(s: &str) -> Result<TransactionType, RepoError> {
    s.parse().map_err(RepoError::Database)
}

/// Maps a driver error, reporting unique constraint violations as conflicts.
pub fn db_err(e: sqlx::Error) -> RepoError {
    let unique = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());

    if unique {
        RepoError::Conflict(e.to_string())
    } else {
        RepoError::Database(e.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain conversion
// ─────────────────────────────────────────────────────────────────────────────

impl DbUser {
    pub fn into_domain(self) -> Result<User, RepoError> {
        Ok(User::from_parts(
            UserId::from_uuid(parse_uuid(&self.id)?),
            self.name,
            self.email,
            self.password_hash,
            self.created_at,
            self.updated_at,
        ))
    }
}

impl DbCategory {
    pub fn into_domain(self) -> Result<Category, RepoError> {
        Ok(Category::from_parts(
            CategoryId::from_uuid(parse_uuid(&self.id)?),
            self.name,
            UserId::from_uuid(parse_uuid(&self.user_id)?),
            self.created_at,
            self.updated_at,
        ))
    }
}

impl DbTransaction {
    pub fn into_domain(self) -> Result<Transaction, RepoError> {
        let user_id = UserId::from_uuid(parse_uuid(&self.user_id)?);
        let category_id = self
            .category_id
            .as_deref()
            .map(parse_uuid)
            .transpose()?
            .map(CategoryId::from_uuid);

        // The join yields category columns only when the reference resolves.
        let category = match (
            category_id,
            self.category_name,
            self.category_created_at,
            self.category_updated_at,
        ) {
            (Some(id), Some(name), Some(created_at), Some(updated_at)) => Some(
                Category::from_parts(id, name, user_id, created_at, updated_at),
            ),
            _ => None,
        };

        Ok(Transaction {
            id: TransactionId::from_uuid(parse_uuid(&self.id)?),
            title: self.title,
            amount: self.amount,
            transaction_type: parse_transaction_type(&self.kind)?,
            date: self.date,
            notes: self.notes,
            user_id,
            category_id,
            category,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
