//! Authorization gate: bearer token to caller identity.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use financy_types::{AppError, Caller, FinanceRepository, TokenService};

use super::handlers::{ApiError, AppState};

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// Returns `None` for a missing header, another scheme, or an empty token.
pub fn bearer_token(auth_header: Option<&str>) -> Option<&str> {
    auth_header?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Derives the caller from the `Authorization` header value.
///
/// Without a bearer token the caller is anonymous. A token that fails
/// verification is a hard failure, never a silent downgrade to anonymous.
pub fn resolve_caller(
    tokens: &dyn TokenService,
    auth_header: Option<&str>,
) -> Result<Caller, AppError> {
    match bearer_token(auth_header) {
        None => Ok(Caller::anonymous()),
        Some(token) => {
            let user_id = tokens.verify(token).map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                AppError::from(e)
            })?;
            Ok(Caller::authenticated(user_id))
        }
    }
}

/// Middleware that attaches a [`Caller`] to every request.
///
/// `/health` bypasses the gate.
pub async fn auth_middleware<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match resolve_caller(state.services.tokens(), auth_header) {
        Ok(caller) => {
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Err(err) => ApiError(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use financy_types::{TokenError, UserId};
    use http_body_util::BodyExt;

    struct FixedTokens(UserId);

    impl TokenService for FixedTokens {
        fn issue(&self, _user_id: UserId) -> Result<String, TokenError> {
            Ok("good".into())
        }

        fn verify(&self, token: &str) -> Result<UserId, TokenError> {
            if token == "good" {
                Ok(self.0)
            } else {
                Err(TokenError::Invalid("signature mismatch".into()))
            }
        }
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(Some("bearer abc")), None);
        assert_eq!(bearer_token(Some("abc")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[test]
    fn test_missing_or_foreign_scheme_is_anonymous() {
        let tokens = FixedTokens(UserId::new());

        assert_eq!(resolve_caller(&tokens, None).unwrap(), Caller::anonymous());
        assert_eq!(
            resolve_caller(&tokens, Some("Basic dXNlcjpwYXNz")).unwrap(),
            Caller::anonymous()
        );
    }

    #[test]
    fn test_valid_token_authenticates() {
        let id = UserId::new();
        let caller = resolve_caller(&FixedTokens(id), Some("Bearer good")).unwrap();
        assert_eq!(caller.user_id(), Some(id));
    }

    #[test]
    fn test_bad_token_fails_closed() {
        let err = resolve_caller(&FixedTokens(UserId::new()), Some("Bearer forged")).unwrap_err();
        assert_eq!(err, AppError::Unauthenticated("Invalid or expired token.".into()));
    }

    async fn rejection(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_rejected_token_is_401() {
        let err = resolve_caller(&FixedTokens(UserId::new()), Some("Bearer forged")).unwrap_err();
        let (status, body) = rejection(err).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_broken_token_service_is_opaque_500() {
        let err = AppError::from(TokenError::Signing("key rejected".into()));
        let (status, body) = rejection(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errors"][0]["message"], "Internal server error");
        assert_eq!(body["errors"][0]["extensions"]["code"], "INTERNAL_SERVER_ERROR");
    }
}
