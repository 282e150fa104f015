//! Demo data for local development.
//!
//! Seeding is idempotent: the seed user's name and password are reset, the
//! `Food` and `Salary` categories are reused when present, and the user's
//! transactions are replaced by one income and one expense.

use chrono::Utc;

use financy_types::{
    Category, FinanceRepository, NewTransaction, NewUser, PasswordHasher, RepoError, Transaction,
    TransactionType, User,
};

pub const SEED_USER_NAME: &str = "Seed User";
pub const SEED_USER_EMAIL: &str = "seed.user@financy.dev";
pub const SEED_USER_PASSWORD: &str = "123456";

/// What a seeding run left in the store.
#[derive(Debug)]
pub struct SeedSummary {
    pub user: User,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
}

/// Writes the demo user with its categories and transactions.
pub async fn seed<R: FinanceRepository>(
    repo: &R,
    hasher: &dyn PasswordHasher,
) -> anyhow::Result<SeedSummary> {
    let password_hash = hasher.hash(SEED_USER_PASSWORD).await?;

    let user = match repo.find_user_by_email(SEED_USER_EMAIL).await? {
        Some(existing) => repo
            .update_user_credentials(existing.id, SEED_USER_NAME.to_string(), password_hash)
            .await?
            .ok_or(RepoError::NotFound)?,
        None => {
            repo.create_user(NewUser {
                name: SEED_USER_NAME.to_string(),
                email: SEED_USER_EMAIL.to_string(),
                password_hash,
            })
            .await?
        }
    };

    let existing = repo.list_categories(user.id).await?;
    let mut categories = Vec::with_capacity(2);
    for name in ["Food", "Salary"] {
        let category = match existing.iter().find(|c| c.name == name) {
            Some(category) => category.clone(),
            None => {
                repo.create_category(Category::new(name.to_string(), user.id))
                    .await?
            }
        };
        categories.push(category);
    }
    let (food, salary) = (categories[0].id, categories[1].id);

    for tx in repo.list_transactions(user.id).await? {
        repo.delete_transaction(tx.id, user.id).await?;
    }

    let now = Utc::now();
    let income = repo
        .create_transaction(NewTransaction {
            title: "Monthly salary".to_string(),
            amount: 5000.0,
            transaction_type: TransactionType::Income,
            date: now,
            notes: Some("Seed income transaction".to_string()),
            user_id: user.id,
            category_id: Some(salary),
        })
        .await?;
    let expense = repo
        .create_transaction(NewTransaction {
            title: "Lunch".to_string(),
            amount: 35.5,
            transaction_type: TransactionType::Expense,
            date: now,
            notes: Some("Seed expense transaction".to_string()),
            user_id: user.id,
            category_id: Some(food),
        })
        .await?;

    tracing::info!(user_id = %user.id, "seed completed");

    Ok(SeedSummary {
        user,
        categories,
        transactions: vec![income, expense],
    })
}
