//! Income/expense transactions, scoped to the owning user.

use std::sync::Arc;

use financy_types::validation::{self, TRANSACTION_TITLE_LIMITS};
use financy_types::{
    AppError, CategoryId, CategoryRepository, CreateTransactionInput, NewTransaction, Patch,
    Transaction, TransactionChanges, TransactionId, TransactionRepository, UpdateTransactionInput,
    UserId,
};

const CATEGORY_NOT_FOUND: &str = "Category not found.";
const TRANSACTION_NOT_FOUND: &str = "Transaction not found.";

pub struct TransactionService<R: CategoryRepository + TransactionRepository> {
    repo: Arc<R>,
}

impl<R: CategoryRepository + TransactionRepository> TransactionService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Resolves a client-supplied category id to one owned by `owner`.
    async fn owned_category(&self, owner: UserId, raw: &str) -> Result<CategoryId, AppError> {
        let Some(id) = validation::record_id::<CategoryId>(raw, "Category ID")? else {
            return Err(AppError::not_found(CATEGORY_NOT_FOUND));
        };

        match self.repo.find_category(id, owner).await? {
            Some(category) => Ok(category.id),
            None => Err(AppError::not_found(CATEGORY_NOT_FOUND)),
        }
    }

    /// Lists the owner's transactions, newest date first, with categories resolved.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, owner: UserId) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.list_transactions(owner).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        owner: UserId,
        input: CreateTransactionInput,
    ) -> Result<Transaction, AppError> {
        let title =
            validation::required_text(&input.title, "Transaction title", TRANSACTION_TITLE_LIMITS)?;
        let amount = validation::amount(input.amount)?;
        let date = validation::date(&input.date)?;
        let notes = validation::optional_text(input.notes.into())
            .into_option()
            .flatten();

        let category_id = match input.category_id.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(self.owned_category(owner, raw).await?),
            _ => None,
        };

        let tx = self
            .repo
            .create_transaction(NewTransaction {
                title,
                amount,
                transaction_type: input.transaction_type,
                date,
                notes,
                user_id: owner,
                category_id,
            })
            .await?;

        tracing::debug!(transaction_id = %tx.id, "transaction created");
        Ok(tx)
    }

    /// Applies a partial update.
    ///
    /// The ownership lookup comes first, then the category check, then field
    /// validation. Nothing is written unless all of them pass.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        owner: UserId,
        input: UpdateTransactionInput,
    ) -> Result<Transaction, AppError> {
        let not_found = || AppError::not_found(TRANSACTION_NOT_FOUND);

        let id = validation::record_id::<TransactionId>(&input.id, "Transaction ID")?
            .ok_or_else(not_found)?;

        if self.repo.find_transaction(id, owner).await?.is_none() {
            return Err(not_found());
        }

        let category_id = match input.category_id {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(raw) if raw.trim().is_empty() => Patch::Null,
            Patch::Value(raw) => Patch::Value(self.owned_category(owner, &raw).await?),
        };

        let changes = TransactionChanges {
            title: input
                .title
                .as_deref()
                .map(|t| validation::required_text(t, "Transaction title", TRANSACTION_TITLE_LIMITS))
                .transpose()?,
            amount: input.amount.map(validation::amount).transpose()?,
            transaction_type: input.transaction_type,
            date: input.date.as_deref().map(validation::date).transpose()?,
            notes: validation::optional_text(input.notes),
            category_id,
        };

        if changes.is_empty() {
            return Err(AppError::bad_input(
                "At least one field must be provided to update.",
            ));
        }

        self.repo
            .update_transaction(id, owner, changes)
            .await?
            .ok_or_else(not_found)
    }

    /// Deletes at most one owned transaction. Returns whether one was deleted.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, owner: UserId, id: &str) -> Result<bool, AppError> {
        let Some(id) = validation::record_id::<TransactionId>(id, "Transaction ID")? else {
            return Ok(false);
        };

        Ok(self.repo.delete_transaction(id, owner).await?)
    }
}
