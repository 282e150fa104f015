//! Category domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

uuid_id!(
    /// Unique identifier for a Category.
    CategoryId
);

/// A user-owned label for transactions.
///
/// `(name, user_id)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Owning user
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Creates a category owned by `user_id`. The name must already be normalized.
    pub fn new(name: String, user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a category with all fields specified (for database reconstruction).
    pub fn from_parts(
        id: CategoryId,
        name: String,
        user_id: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            user_id,
            created_at,
            updated_at,
        }
    }

    /// Renames the category and bumps `updated_at`.
    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }
}
