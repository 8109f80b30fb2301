//! Axum Middleware for Authentication
//!
//! Validates the Authorization bearer header, resolves it to an account,
//! and injects AuthContext into request extensions. Handlers read it back
//! with the `Extension<AuthContext>` extractor.

use crate::auth::{authenticate, AuthConfig, AuthContext};
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use taskhub_core::AccountId;

// ============================================================================
// MIDDLEWARE STATE
// ============================================================================

/// Shared state for the authentication middleware.
#[derive(Debug, Clone)]
pub struct AuthMiddlewareState {
    pub auth_config: Arc<AuthConfig>,
}

impl AuthMiddlewareState {
    pub fn new(auth_config: AuthConfig) -> Self {
        Self {
            auth_config: Arc::new(auth_config),
        }
    }
}

// ============================================================================
// MIDDLEWARE FUNCTION
// ============================================================================

/// Axum middleware for bearer-token authentication.
///
/// 1. Extracts the `Authorization: Bearer <token>` header
/// 2. Validates the JWT and resolves the account id
/// 3. Returns 401 when the header is missing or the token invalid
/// 4. Injects AuthContext into request extensions on success
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok());

    let token = auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization bearer header"))?;

    let context = authenticate(&state.auth_config, token)?;

    tracing::debug!(account_id = %context.account_id, "Request authenticated");

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

// ============================================================================
// ACCESS CHECKS
// ============================================================================

/// Verify that the authenticated account matches a path-scoped account id.
///
/// Routes nested under /accounts/{account_id} must only be reachable by
/// their owner.
pub fn check_account_access(context: &AuthContext, account_id: AccountId) -> ApiResult<()> {
    if context.account_id != account_id {
        return Err(ApiError::forbidden(
            "Authenticated account does not match the requested account",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_account_access_check() {
        let account_id = Uuid::new_v4();
        let context = AuthContext {
            account_id,
            email: None,
        };

        assert!(check_account_access(&context, account_id).is_ok());

        let err = check_account_access(&context, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Forbidden);
    }
}
