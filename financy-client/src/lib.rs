//! # Financy Client SDK
//!
//! A typed Rust client for the Financy operation surface.
//!
//! Every operation is a `POST /rpc` with `{ "operation", "args" }`; the
//! response envelope is unwrapped into either the typed result or
//! [`ClientError::Api`].

use financy_types::{
    AuthPayload, Category, CreateCategoryInput, CreateTransactionInput, Envelope, IdInput,
    LoginInput, RpcRequest, SignupInput, Transaction, UpdateCategoryInput,
    UpdateTransactionInput, User,
};
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {code} - {message}")]
    Api { code: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response carried neither data nor errors")]
    EmptyResponse,
}

impl ClientError {
    /// Stable error code when the server rejected the operation.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Financy API client.
pub struct FinancyClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl FinancyClient {
    /// Creates a new anonymous client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: Client::new(),
        }
    }

    /// Sets the bearer token sent with every operation.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Calls the `health` operation and returns its message.
    pub async fn health_message(&self) -> Result<String, ClientError> {
        self.call("health", Value::Null).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Auth
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a new user.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ClientError> {
        let args = SignupInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.call_with("signup", &args).await
    }

    /// Exchanges credentials for a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ClientError> {
        let args = LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.call_with("login", &args).await
    }

    /// Returns the authenticated user.
    pub async fn me(&self) -> Result<User, ClientError> {
        self.call("me", Value::Null).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Categories
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        self.call("listCategories", Value::Null).await
    }

    pub async fn create_category(&self, name: &str) -> Result<Category, ClientError> {
        let args = CreateCategoryInput {
            name: name.to_string(),
        };
        self.call_with("createCategory", &args).await
    }

    pub async fn update_category(&self, id: &str, name: &str) -> Result<Category, ClientError> {
        let args = UpdateCategoryInput {
            id: id.to_string(),
            name: name.to_string(),
        };
        self.call_with("updateCategory", &args).await
    }

    /// Returns `false` when nothing was deleted.
    pub async fn delete_category(&self, id: &str) -> Result<bool, ClientError> {
        let args = IdInput { id: id.to_string() };
        self.call_with("deleteCategory", &args).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        self.call("listTransactions", Value::Null).await
    }

    pub async fn create_transaction(
        &self,
        input: &CreateTransactionInput,
    ) -> Result<Transaction, ClientError> {
        self.call_with("createTransaction", input).await
    }

    pub async fn update_transaction(
        &self,
        input: &UpdateTransactionInput,
    ) -> Result<Transaction, ClientError> {
        self.call_with("updateTransaction", input).await
    }

    /// Returns `false` when nothing was deleted.
    pub async fn delete_transaction(&self, id: &str) -> Result<bool, ClientError> {
        let args = IdInput { id: id.to_string() };
        self.call_with("deleteTransaction", &args).await
    }

    async fn call_with<T: DeserializeOwned, A: Serialize>(
        &self,
        operation: &str,
        args: &A,
    ) -> Result<T, ClientError> {
        self.call(operation, serde_json::to_value(args)?).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        args: Value,
    ) -> Result<T, ClientError> {
        let mut req = self
            .http
            .post(format!("{}/rpc", self.base_url))
            .json(&RpcRequest::new(operation, args));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let body = resp.text().await?;
        Self::unwrap_envelope(&body)
    }

    fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
        let envelope: Envelope<T> = serde_json::from_str(body)?;

        if let Some(error) = envelope.errors.into_iter().next() {
            return Err(ClientError::Api {
                code: error.extensions.code,
                message: error.message,
            });
        }

        envelope.data.ok_or(ClientError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = FinancyClient::new("http://localhost:4000");
        assert_eq!(client.base_url, "http://localhost:4000");
        assert_eq!(client.token(), None);
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = FinancyClient::new("http://localhost:4000/");
        assert_eq!(client.base_url, "http://localhost:4000");
    }

    #[test]
    fn test_client_with_token() {
        let client = FinancyClient::new("http://localhost:4000").with_token("abc");
        assert_eq!(client.token(), Some("abc"));
    }

    #[test]
    fn test_unwrap_envelope_data() {
        let value: bool = FinancyClient::unwrap_envelope(r#"{"data": true}"#).unwrap();
        assert!(value);
    }

    #[test]
    fn test_unwrap_envelope_error() {
        let body = r#"{"data": null, "errors": [{"message": "Category not found.", "extensions": {"code": "NOT_FOUND"}}]}"#;
        let err = FinancyClient::unwrap_envelope::<Category>(body).unwrap_err();

        assert_eq!(err.code(), Some("NOT_FOUND"));
        assert_eq!(err.to_string(), "API error: NOT_FOUND - Category not found.");
    }

    #[test]
    fn test_unwrap_envelope_empty() {
        let err = FinancyClient::unwrap_envelope::<bool>(r#"{"data": null}"#).unwrap_err();
        assert!(matches!(err, ClientError::EmptyResponse));
    }
}
