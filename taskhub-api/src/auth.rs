//! Authentication for the Taskhub API
//!
//! Bearer-token (JWT, HS256) authentication. The middleware in
//! `middleware.rs` calls into this module and injects the resulting
//! AuthContext into request extensions.

use crate::error::{ApiError, ApiResult};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use taskhub_core::AccountId;
use uuid::Uuid;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT secret key for signing and verification
    pub jwt_secret: String,

    /// JWT algorithm (default: HS256)
    pub jwt_algorithm: Algorithm,

    /// JWT token expiration in seconds (default: 1 hour)
    pub jwt_expiration_secs: i64,

    /// JWT clock skew tolerance in seconds (default: 60)
    ///
    /// Allows tokens to be slightly in the future/past to handle clock
    /// drift in distributed systems.
    pub jwt_clock_skew_secs: i64,
}

impl AuthConfig {
    /// Create AuthConfig from environment variables.
    ///
    /// Environment variables:
    /// - `TASKHUB_JWT_SECRET`: Signing secret (default: dev-only placeholder)
    /// - `TASKHUB_JWT_EXPIRATION_SECS`: Token lifetime (default: 3600)
    /// - `TASKHUB_JWT_CLOCK_SKEW_SECS`: Skew tolerance (default: 60)
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("TASKHUB_JWT_SECRET")
            .unwrap_or_else(|_| "insecure-dev-secret".to_string());

        if jwt_secret == "insecure-dev-secret" {
            tracing::warn!("TASKHUB_JWT_SECRET not set - using insecure development secret");
        }

        Self {
            jwt_secret,
            jwt_algorithm: Algorithm::HS256,
            jwt_expiration_secs: std::env::var("TASKHUB_JWT_EXPIRATION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
            jwt_clock_skew_secs: std::env::var("TASKHUB_JWT_CLOCK_SKEW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        }
    }
}

// ============================================================================
// CLAIMS AND CONTEXT
// ============================================================================

/// JWT claims carried by taskhub access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Account email, when known at token issue time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Authenticated request context injected into request extensions.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated account id (from the JWT `sub` claim)
    pub account_id: AccountId,

    /// Account email, when the token carried one
    pub email: Option<String>,
}

// ============================================================================
// TOKEN OPERATIONS
// ============================================================================

/// Generate a signed JWT for the given account.
pub fn generate_jwt_token(
    config: &AuthConfig,
    account_id: AccountId,
    email: Option<String>,
) -> ApiResult<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: account_id.to_string(),
        iat: now,
        exp: now + config.jwt_expiration_secs,
        email,
    };

    encode(
        &Header::new(config.jwt_algorithm),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal_error(format!("Failed to sign token: {}", e)))
}

/// Validate a JWT and return its claims.
pub fn validate_jwt_token(config: &AuthConfig, token: &str) -> ApiResult<Claims> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    // Decode with signature validation only; expiry is checked below with
    // the configured skew tolerance.
    let mut validation = Validation::new(config.jwt_algorithm);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.required_spec_claims = std::collections::HashSet::from(["exp".to_string()]);

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidToken => {
                ApiError::invalid_token("Token is invalid")
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                ApiError::invalid_token("Token signature is invalid")
            }
            _ => ApiError::invalid_token(format!("Token validation failed: {}", e)),
        })?;

    let claims = token_data.claims;
    let now = Utc::now().timestamp();

    if claims.exp + config.jwt_clock_skew_secs < now {
        return Err(ApiError::token_expired());
    }

    Ok(claims)
}

/// Build an AuthContext from validated claims.
pub fn auth_context_from_claims(claims: &Claims) -> ApiResult<AuthContext> {
    let account_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| ApiError::invalid_token("Token subject is not a valid account id"))?;

    Ok(AuthContext {
        account_id,
        email: claims.email.clone(),
    })
}

/// Authenticate a bearer token, returning the request context.
pub fn authenticate(config: &AuthConfig, bearer_token: &str) -> ApiResult<AuthContext> {
    let claims = validate_jwt_token(config, bearer_token)?;
    auth_context_from_claims(&claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_algorithm: Algorithm::HS256,
            jwt_expiration_secs: 3600,
            jwt_clock_skew_secs: 60,
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let config = test_config();
        let account_id = Uuid::new_v4();

        let token =
            generate_jwt_token(&config, account_id, Some("user@example.com".to_string())).unwrap();
        let ctx = authenticate(&config, &token).unwrap();

        assert_eq!(ctx.account_id, account_id);
        assert_eq!(ctx.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let config = test_config();
        let token = generate_jwt_token(&config, Uuid::new_v4(), None).unwrap();

        let mut other = test_config();
        other.jwt_secret = "different-secret".to_string();

        let err = authenticate(&other, &token).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidToken);
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = test_config();
        config.jwt_expiration_secs = -7200; // already expired, beyond skew
        let token = generate_jwt_token(&config, Uuid::new_v4(), None).unwrap();

        let err = authenticate(&config, &token).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::TokenExpired);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let config = test_config();
        assert!(authenticate(&config, "not-a-jwt").is_err());
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            iat: 0,
            exp: i64::MAX,
            email: None,
        };
        assert!(auth_context_from_claims(&claims).is_err());
    }
}
