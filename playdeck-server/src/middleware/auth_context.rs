//! Authentication context extraction middleware.
//!
//! Handlers that take an [`AuthContext`] argument get token validation for
//! free: the extractor reads the bearer token from the Authorization header,
//! verifies it against the injected auth service, and exposes the decoded
//! identity. A missing token rejects with 401; a present-but-bad token
//! (invalid signature, expired) rejects with 403.

use crate::error::ApiError;
use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use playdeck_auth::{AuthService, Role};
use std::sync::Arc;
use uuid::Uuid;

/// Identity decoded from a validated session token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    /// Credential scheme that matched at login, if the token came from one.
    pub scheme: Option<String>,
}

impl AuthContext {
    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Gate for admin-only operations.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.has_role(&[Role::Admin]) {
            Ok(())
        } else {
            Err(ApiError::authorization("Admin access required"))
        }
    }

    /// Gate for operations open to moderators and admins.
    pub fn require_moderator(&self) -> Result<(), ApiError> {
        if self.has_role(&[Role::Admin, Role::Moderator]) {
            Ok(())
        } else {
            Err(ApiError::authorization("Moderator or admin access required"))
        }
    }
}

/// Extract the bearer token from the Authorization header.
fn extract_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::authentication("Access token required"))?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::authentication("Invalid Authorization header format. Expected: Bearer <token>")
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth: Arc<AuthService> = FromRef::from_ref(state);

        let token = extract_token(parts)?;
        let claims = auth.verify_session(token)?;

        Ok(AuthContext {
            user_id: claims.user_id()?,
            email: claims.email,
            role: claims.role,
            scheme: claims.scheme,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: Role) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            role,
            scheme: None,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(context(Role::Admin).require_admin().is_ok());
        assert!(context(Role::Moderator).require_admin().is_err());
        assert!(context(Role::User).require_admin().is_err());
    }

    #[test]
    fn test_require_moderator_allows_admin() {
        assert!(context(Role::Admin).require_moderator().is_ok());
        assert!(context(Role::Moderator).require_moderator().is_ok());
        assert!(context(Role::User).require_moderator().is_err());
    }
}
