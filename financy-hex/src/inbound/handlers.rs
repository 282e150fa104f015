//! HTTP request handlers and the response envelope.

use std::sync::Arc;

use axum::{
    Extension, Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use financy_types::{
    AppError, Caller, Envelope, FinanceRepository, HEALTH_MESSAGE, Operation, RpcRequest,
};

use super::dispatcher::dispatch;
use crate::Services;

/// Application state shared across handlers.
pub struct AppState<R: FinanceRepository> {
    pub services: Services<R>,
}

/// Builds the client-visible envelope for a failure.
///
/// Internal detail is logged here and replaced by an opaque message.
pub fn error_envelope(err: &AppError) -> Envelope<Value> {
    if err.is_internal() {
        tracing::error!(error = %err, "request failed");
    }
    Envelope::error(err.public_message(), err.code())
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
///
/// Only the authorization gate rejects a whole request: a refused token is a
/// 401 and a broken token service a 500. Operation failures travel inside an
/// HTTP 200 envelope.
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(error_envelope(&self.0))).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    HEALTH_MESSAGE
}

/// Single operation endpoint: `POST /rpc` with `{"operation", "args"}`.
#[tracing::instrument(skip_all)]
pub async fn rpc<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    caller: Option<Extension<Caller>>,
    body: Bytes,
) -> Json<Envelope<Value>> {
    let caller = caller.map(|Extension(c)| c).unwrap_or_default();

    let op = serde_json::from_slice::<RpcRequest>(&body)
        .map_err(|e| format!("Invalid request body: {}", e))
        .and_then(Operation::parse);

    let op = match op {
        Ok(op) => op,
        Err(msg) => return Json(error_envelope(&AppError::bad_input(msg))),
    };

    match dispatch(&state.services, caller, op).await {
        Ok(data) => Json(Envelope::data(data)),
        Err(err) => Json(error_envelope(&err)),
    }
}
