//! Credential adapters: argon2 password hashing and HS256 identity tokens.

use argon2::Argon2;
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use serde::{Deserialize, Serialize};

use financy_types::{HashError, PasswordHasher, TokenError, TokenService, UserId};

/// Lifetime of an issued token, in seconds (one day).
pub const TOKEN_TTL_SECONDS: i64 = 86_400;

// ─────────────────────────────────────────────────────────────────────────────
// Password hashing
// ─────────────────────────────────────────────────────────────────────────────

/// Argon2id hasher producing PHC strings.
///
/// Hashing is CPU-bound, so both operations run on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

#[async_trait]
impl PasswordHasher for Argon2Hasher {
    async fn hash(&self, password: &str) -> Result<String, HashError> {
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| HashError(e.to_string()))
        })
        .await
        .map_err(|e| HashError(e.to_string()))?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash).map_err(|e| HashError(e.to_string()))?;
            match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(e) => Err(HashError(e.to_string())),
            }
        })
        .await
        .map_err(|e| HashError(e.to_string()))?
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Identity tokens
// ─────────────────────────────────────────────────────────────────────────────

/// JWT claims carried by an identity token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id
    sub: String,
    exp: i64,
    iat: i64,
}

/// HS256 token service with a one-day expiry and no leeway.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenService {
    /// Fails with `MissingSecret` when `secret` is blank.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.trim().is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    fn issue_at(&self, user_id: UserId, issued_at: i64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: issued_at + TOKEN_TTL_SECONDS,
            iat: issued_at,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        data.claims
            .sub
            .parse()
            .map_err(|e: uuid::Error| TokenError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("secret1").await.unwrap();

        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, "secret1");
        assert!(hasher.verify("secret1", &hash).await.unwrap());
        assert!(!hasher.verify("secret2", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let hasher = Argon2Hasher;
        let a = hasher.hash("secret1").await.unwrap();
        let b = hasher.hash("secret1").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_verify_against_garbage_hash_errors() {
        assert!(Argon2Hasher.verify("secret1", "not-a-phc-string").await.is_err());
    }

    #[test]
    fn test_token_roundtrip() {
        let tokens = JwtTokenService::new("test-secret").unwrap();
        let user_id = UserId::new();

        let token = tokens.issue(user_id).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_token_from_other_secret_is_invalid() {
        let ours = JwtTokenService::new("secret-a").unwrap();
        let theirs = JwtTokenService::new("secret-b").unwrap();

        let token = theirs.issue(UserId::new()).unwrap();
        assert!(matches!(ours.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let tokens = JwtTokenService::new("test-secret").unwrap();
        let two_days_ago = Utc::now().timestamp() - 2 * TOKEN_TTL_SECONDS;

        let token = tokens.issue_at(UserId::new(), two_days_ago).unwrap();
        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        let tokens = JwtTokenService::new("test-secret").unwrap();
        assert!(matches!(tokens.verify("abc.def.ghi"), Err(TokenError::Invalid(_))));
        assert!(matches!(tokens.verify(""), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_blank_secret_is_rejected() {
        assert!(matches!(
            JwtTokenService::new("  "),
            Err(TokenError::MissingSecret)
        ));
    }
}
