//! Stateless session tokens.
//!
//! Tokens are signed JWTs (HS256) carrying the user id, email, role and the
//! credential scheme that matched at login. They are verifiable without a
//! database round trip and expire after a fixed window; there is no
//! revocation list.

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::models::Role;
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,

    /// User email
    pub email: String,

    /// Account role
    pub role: Role,

    /// Credential scheme that matched at login. Absent on tokens minted at
    /// registration, where nothing was verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    /// Issued at timestamp (seconds since epoch)
    pub iat: i64,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

impl SessionClaims {
    /// Get the user ID as a UUID.
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)
    }

    /// Check if the token is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Signs and verifies session tokens with the process-wide signing secret.
///
/// Constructed once from [`AuthConfig`] at startup and injected wherever
/// tokens are minted or checked.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
    issuer: String,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_seconds: config.token_ttl_hours * 3600,
            issuer: config.issuer.clone(),
        }
    }

    /// Mint a signed token asserting identity, role and matched scheme.
    pub fn issue(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
        scheme: Option<&str>,
    ) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            scheme: scheme.map(str::to_string),
            iat: now,
            exp: now + self.ttl_seconds,
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Jwt(e.to_string()))
    }

    /// Validate a token and decode its claims.
    ///
    /// # Errors
    ///
    /// `AuthError::TokenExpired` past the expiry window, `AuthError::InvalidToken`
    /// for anything else (bad signature, malformed token, wrong issuer).
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer_with_ttl(ttl_hours: i64) -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: ttl_hours,
            ..AuthConfig::default()
        })
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let issuer = issuer_with_ttl(1);
        let user_id = Uuid::new_v4();

        let token = issuer
            .issue(user_id, "alice@example.com", Role::Admin, Some("pattern"))
            .unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.scheme.as_deref(), Some("pattern"));
        assert_eq!(claims.iss, "playdeck");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_registration_token_has_no_scheme() {
        let issuer = issuer_with_ttl(1);
        let token = issuer
            .issue(Uuid::new_v4(), "bob@example.com", Role::User, None)
            .unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.scheme, None);
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // issued already expired, well past the default leeway
        let issuer = issuer_with_ttl(-1);
        let token = issuer
            .issue(Uuid::new_v4(), "bob@example.com", Role::User, None)
            .unwrap();

        let result = issuer.verify(&token);
        assert!(matches!(result.unwrap_err(), AuthError::TokenExpired));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = issuer_with_ttl(1)
            .issue(Uuid::new_v4(), "bob@example.com", Role::User, None)
            .unwrap();

        let other = TokenIssuer::new(&AuthConfig {
            jwt_secret: "different-secret".to_string(),
            ..AuthConfig::default()
        });

        assert!(matches!(other.verify(&token).unwrap_err(), AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let issuer = issuer_with_ttl(1);
        let token = issuer
            .issue(Uuid::new_v4(), "bob@example.com", Role::User, None)
            .unwrap();

        // flip a byte in the claims segment
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let mut payload = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert!(matches!(issuer.verify(&tampered).unwrap_err(), AuthError::InvalidToken));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let issuer = issuer_with_ttl(1);
        assert!(matches!(
            issuer.verify("not.a.token").unwrap_err(),
            AuthError::InvalidToken
        ));
    }
}
