//! Transaction domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::{Category, CategoryId};
use super::user::UserId;
use crate::patch::Patch;

uuid_id!(
    /// Unique identifier for a Transaction.
    TransactionId
);

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

/// A recorded income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub title: String,
    /// Strictly positive amount
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Effective date of the income/expense
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    /// Owning user
    pub user_id: UserId,
    pub category_id: Option<CategoryId>,
    /// Resolved category, when `category_id` is set
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Applies a partial update and bumps `updated_at`.
    ///
    /// The resolved `category` is dropped whenever the reference changes;
    /// storage re-resolves it on read.
    pub fn apply(&mut self, changes: TransactionChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(kind) = changes.transaction_type {
            self.transaction_type = kind;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
        changes.notes.apply_to(&mut self.notes);
        if !changes.category_id.is_absent() {
            changes.category_id.apply_to(&mut self.category_id);
            if self.category.as_ref().map(|c| c.id) != self.category_id {
                self.category = None;
            }
        }
        self.updated_at = Utc::now();
    }
}

/// Already-validated data for a transaction about to be stored.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub title: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub user_id: UserId,
    pub category_id: Option<CategoryId>,
}

impl NewTransaction {
    /// Materializes the record with a fresh id and timestamps.
    pub fn into_transaction(self) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: TransactionId::new(),
            title: self.title,
            amount: self.amount,
            transaction_type: self.transaction_type,
            date: self.date,
            notes: self.notes,
            user_id: self.user_id,
            category_id: self.category_id,
            category: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Already-validated partial update of a transaction.
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub transaction_type: Option<TransactionType>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Patch<String>,
    pub category_id: Patch<CategoryId>,
}

impl TransactionChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.transaction_type.is_none()
            && self.date.is_none()
            && self.notes.is_absent()
            && self.category_id.is_absent()
    }
}
