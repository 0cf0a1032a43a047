use serde::{Deserialize, Serialize};
use std::env;

/// Development fallback, same value the deployment templates ship with.
const DEV_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// Authentication configuration, read from the environment once at startup
/// and injected into [`crate::AuthService`]. Nothing in this crate reads the
/// process environment at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for session token signing.
    pub jwt_secret: String,
    /// Session token lifetime in hours.
    pub token_ttl_hours: i64,
    /// bcrypt work factor for credential hashing.
    pub bcrypt_cost: u32,
    /// `iss` claim stamped on issued tokens.
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_hours: 24 * 7,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            issuer: "playdeck".to_string(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from `JWT_SECRET`, `TOKEN_TTL_HOURS` and
    /// `BCRYPT_COST`, falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development default");
            defaults.jwt_secret.clone()
        });

        let token_ttl_hours = env::var("TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.token_ttl_hours);

        let bcrypt_cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.bcrypt_cost);

        Self {
            jwt_secret,
            token_ttl_hours,
            bcrypt_cost,
            issuer: defaults.issuer,
        }
    }
}
