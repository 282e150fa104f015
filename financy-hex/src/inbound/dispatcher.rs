//! Routes named operations to the application services.

use serde::Serialize;
use serde_json::Value;

use financy_types::{AppError, Caller, FinanceRepository, HEALTH_MESSAGE, Operation};

use crate::Services;

fn to_value<T: Serialize>(value: T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::internal(e.to_string()))
}

/// Runs one operation on behalf of `caller`.
///
/// Operations other than `health`, `signup` and `login` require an
/// authenticated caller.
#[tracing::instrument(skip_all, fields(operation = op.name()))]
pub async fn dispatch<R: FinanceRepository>(
    services: &Services<R>,
    caller: Caller,
    op: Operation,
) -> Result<Value, AppError> {
    match op {
        Operation::Health => to_value(HEALTH_MESSAGE),
        Operation::Signup(input) => to_value(services.auth.signup(input).await?),
        Operation::Login(input) => to_value(services.auth.login(input).await?),
        Operation::Me => to_value(services.users.me(caller.require()?).await?),
        Operation::ListCategories => to_value(services.categories.list(caller.require()?).await?),
        Operation::CreateCategory(input) => {
            to_value(services.categories.create(caller.require()?, input).await?)
        }
        Operation::UpdateCategory(input) => {
            to_value(services.categories.update(caller.require()?, input).await?)
        }
        Operation::DeleteCategory(input) => {
            to_value(services.categories.delete(caller.require()?, &input.id).await?)
        }
        Operation::ListTransactions => {
            to_value(services.transactions.list(caller.require()?).await?)
        }
        Operation::CreateTransaction(input) => {
            to_value(services.transactions.create(caller.require()?, input).await?)
        }
        Operation::UpdateTransaction(input) => {
            to_value(services.transactions.update(caller.require()?, input).await?)
        }
        Operation::DeleteTransaction(input) => {
            to_value(services.transactions.delete(caller.require()?, &input.id).await?)
        }
    }
}
