//! Account registration, credential matching and session issuance.

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::hasher::CredentialHasher;
use crate::models::{
    AuthenticatedUser, CredentialMap, CredentialUpdate, Role, StoredCredentials, User,
    UserProfile, LEGACY_SCHEME,
};
use crate::repository::UserRepository;
use crate::token::{SessionClaims, TokenIssuer};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Minimum length for any credential secret at registration.
pub const MIN_SECRET_LEN: usize = 6;

/// Registration input. `scheme` defaults to `classic` when absent.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub secret: String,
    pub scheme: Option<String>,
}

pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    hasher: CredentialHasher,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, config: &AuthConfig) -> Self {
        Self {
            repo,
            hasher: CredentialHasher::new(config.bcrypt_cost),
            tokens: TokenIssuer::new(config),
        }
    }

    /// Register a new account with one initial credential scheme.
    pub async fn register(&self, request: RegisterUser) -> Result<User> {
        if request.name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.secret.is_empty()
        {
            return Err(AuthError::validation("Name, email, and secret are required"));
        }
        if request.secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::validation(format!(
                "Secret must be at least {MIN_SECRET_LEN} characters long"
            )));
        }
        if !is_valid_email(&request.email) {
            return Err(AuthError::validation("Invalid email format"));
        }

        let scheme = request
            .scheme
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| LEGACY_SCHEME.to_string());

        // The unique index on email is the backstop for concurrent registrations.
        if self.repo.find_by_email(&request.email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let digest = self.hasher.hash(&request.secret, None)?;
        let mut credentials = CredentialMap::new();
        credentials.insert(scheme.clone(), digest.hash);

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email: request.email,
            role: Role::User,
            salt: Some(digest.salt),
            credentials: StoredCredentials::Schemes(credentials),
            created_at: now,
            updated_at: now,
        };

        let user = self.repo.create_user(&user).await?;
        info!(user_id = %user.id, %scheme, "user registered");

        Ok(user)
    }

    /// Match `secret` against every credential scheme on the account for
    /// `email`; the first scheme that verifies wins.
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidCredentials` for an unknown email and for a secret
    /// that matches no scheme; the error is the same in both cases so
    /// responses do not reveal whether the account exists.
    pub async fn authenticate(&self, email: &str, secret: &str) -> Result<AuthenticatedUser> {
        if email.is_empty() || secret.is_empty() {
            return Err(AuthError::validation("Email and secret are required"));
        }

        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let matched = match &user.credentials {
            StoredCredentials::Legacy(hash) => self
                .hasher
                .verify(secret, hash)?
                .then(|| LEGACY_SCHEME.to_string()),
            StoredCredentials::Schemes(map) => {
                // Lexicographic scheme order; stop at the first match so the
                // secret is never checked against more hashes than necessary.
                let mut matched = None;
                for (scheme, hash) in map {
                    if self.hasher.verify(secret, hash)? {
                        matched = Some(scheme.clone());
                        break;
                    }
                }
                matched
            }
        };

        let scheme = matched.ok_or(AuthError::InvalidCredentials)?;
        info!(user_id = %user.id, %scheme, "login succeeded");

        Ok(AuthenticatedUser {
            id: user.id,
            email: user.email,
            role: user.role,
            scheme,
        })
    }

    /// Add or replace the credential for one scheme on an account.
    ///
    /// Hashes with the user's existing salt (or a fresh one if the account
    /// has none yet) and writes the single map entry atomically through the
    /// repository. Reports whether the scheme was added or updated.
    pub async fn set_credential(
        &self,
        user_id: Uuid,
        scheme: &str,
        secret: &str,
    ) -> Result<CredentialUpdate> {
        if scheme.trim().is_empty() || secret.is_empty() {
            return Err(AuthError::validation("Scheme and secret are required"));
        }

        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let salt = user.salt.unwrap_or_else(CredentialHasher::generate_salt);
        let digest = self.hasher.hash(secret, Some(&salt))?;

        let existed = self
            .repo
            .upsert_credential(user_id, scheme, &digest.hash, &digest.salt)
            .await?;

        debug!(%user_id, %scheme, existed, "credential written");

        Ok(if existed {
            CredentialUpdate::Updated
        } else {
            CredentialUpdate::Added
        })
    }

    /// Profile for a user, without salt or hashes.
    pub async fn get_user(&self, user_id: Uuid) -> Result<UserProfile> {
        self.repo
            .find_by_id(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>> {
        let users = self.repo.list_users().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    pub async fn update_user(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<UserProfile> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(AuthError::validation("Name must not be empty"));
            }
        }

        let user = self.repo.update_profile(user_id, name, role).await?;
        Ok(user.into())
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        self.repo.delete_user(user_id).await?;
        info!(%user_id, "user deleted");
        Ok(())
    }

    /// Mint a session token for `user`. `scheme` is the matched scheme at
    /// login; registration passes `None`.
    pub fn issue_session(&self, user: &User, scheme: Option<&str>) -> Result<String> {
        self.tokens.issue(user.id, &user.email, user.role, scheme)
    }

    /// Mint a session token for a login result.
    pub fn issue_for(&self, identity: &AuthenticatedUser) -> Result<String> {
        self.tokens
            .issue(identity.id, &identity.email, identity.role, Some(&identity.scheme))
    }

    /// Validate an inbound session token and decode its claims.
    pub fn verify_session(&self, token: &str) -> Result<SessionClaims> {
        self.tokens.verify(token)
    }

    pub async fn storage_healthy(&self) -> bool {
        self.repo.is_healthy().await
    }
}

fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}
