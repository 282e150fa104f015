//! Data Transfer Objects (DTOs) for the operation surface.

use serde::{Deserialize, Serialize};

use crate::domain::{TransactionType, User};
use crate::patch::Patch;

/// Fixed response of the `health` operation and `GET /health`.
pub const HEALTH_MESSAGE: &str = "Financy backend is running";

// ─────────────────────────────────────────────────────────────────────────────
// Auth DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Arguments of `signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Arguments of `login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Result of a successful `signup` or `login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Bearer token valid for one day
    pub token: String,
    pub user: User,
}

// ─────────────────────────────────────────────────────────────────────────────
// Category DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCategoryInput {
    pub id: String,
    pub name: String,
}

/// Arguments of operations addressing a single record by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdInput {
    pub id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Transaction DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Arguments of `createTransaction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionInput {
    pub title: String,
    pub amount: f64,
    #[serde(rename = "type", alias = "kind")]
    pub transaction_type: TransactionType,
    /// RFC 3339 instant or plain `YYYY-MM-DD`
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

/// Arguments of `updateTransaction`.
///
/// Only supplied fields change. `notes` and `categoryId` distinguish a missing
/// key (unchanged) from an explicit `null` (cleared).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(
        rename = "type",
        alias = "kind",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub notes: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub category_id: Patch<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Operation envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST /rpc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub operation: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub args: serde_json::Value,
}

impl RpcRequest {
    pub fn new(operation: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            operation: operation.into(),
            args,
        }
    }
}

/// A named operation with its decoded arguments.
#[derive(Debug, Clone)]
pub enum Operation {
    Health,
    Signup(SignupInput),
    Login(LoginInput),
    Me,
    ListCategories,
    CreateCategory(CreateCategoryInput),
    UpdateCategory(UpdateCategoryInput),
    DeleteCategory(IdInput),
    ListTransactions,
    CreateTransaction(CreateTransactionInput),
    UpdateTransaction(UpdateTransactionInput),
    DeleteTransaction(IdInput),
}

impl Operation {
    /// Resolves the operation name and decodes its arguments.
    ///
    /// Operations without inputs ignore `args`. The error is a client-facing
    /// message.
    pub fn parse(request: RpcRequest) -> Result<Self, String> {
        let RpcRequest { operation, args } = request;

        fn decode<T: serde::de::DeserializeOwned>(
            operation: &str,
            args: serde_json::Value,
        ) -> Result<T, String> {
            serde_json::from_value(args)
                .map_err(|e| format!("Invalid arguments for {}: {}", operation, e))
        }

        let op = match operation.as_str() {
            "health" => Operation::Health,
            "signup" => Operation::Signup(decode(&operation, args)?),
            "login" => Operation::Login(decode(&operation, args)?),
            "me" => Operation::Me,
            "listCategories" => Operation::ListCategories,
            "createCategory" => Operation::CreateCategory(decode(&operation, args)?),
            "updateCategory" => Operation::UpdateCategory(decode(&operation, args)?),
            "deleteCategory" => Operation::DeleteCategory(decode(&operation, args)?),
            "listTransactions" => Operation::ListTransactions,
            "createTransaction" => Operation::CreateTransaction(decode(&operation, args)?),
            "updateTransaction" => Operation::UpdateTransaction(decode(&operation, args)?),
            "deleteTransaction" => Operation::DeleteTransaction(decode(&operation, args)?),
            other => return Err(format!("Unknown operation: {}", other)),
        };

        Ok(op)
    }

    /// Wire name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Health => "health",
            Operation::Signup(_) => "signup",
            Operation::Login(_) => "login",
            Operation::Me => "me",
            Operation::ListCategories => "listCategories",
            Operation::CreateCategory(_) => "createCategory",
            Operation::UpdateCategory(_) => "updateCategory",
            Operation::DeleteCategory(_) => "deleteCategory",
            Operation::ListTransactions => "listTransactions",
            Operation::CreateTransaction(_) => "createTransaction",
            Operation::UpdateTransaction(_) => "updateTransaction",
            Operation::DeleteTransaction(_) => "deleteTransaction",
        }
    }
}

/// Response body of `POST /rpc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorBody>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: vec![ErrorBody {
                message: message.into(),
                extensions: ErrorExtensions { code: code.into() },
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub extensions: ErrorExtensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorExtensions {
    /// Stable machine-readable code, e.g. `BAD_USER_INPUT`
    pub code: String,
}
