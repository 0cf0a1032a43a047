//! User record storage.
//!
//! The repository is the unit of substitution for tests and local
//! development: an in-memory implementation backs the test suites and the
//! `DATABASE_URL`-less dev server, and a PostgreSQL implementation backs
//! deployments.

use crate::error::{AuthError, Result};
use crate::models::{Role, StoredCredentials, User};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

pub mod postgres;

pub use postgres::PostgresUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Atomically upsert one scheme entry in the user's credential map,
    /// upgrading a legacy single-hash row to a scheme map on the way.
    /// `salt` is persisted only if the user has none yet. Returns `true`
    /// when the scheme already existed and its hash was replaced.
    async fn upsert_credential(
        &self,
        id: Uuid,
        scheme: &str,
        hash: &str,
        salt: &str,
    ) -> Result<bool>;

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<User>;

    async fn delete_user(&self, id: Uuid) -> Result<()>;

    async fn is_healthy(&self) -> bool;
}

/// In-memory implementation for development and testing.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateEmail);
        }

        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn upsert_credential(
        &self,
        id: Uuid,
        scheme: &str,
        hash: &str,
        salt: &str,
    ) -> Result<bool> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(AuthError::UserNotFound)?;

        let mut map =
            std::mem::replace(&mut user.credentials, StoredCredentials::empty()).normalized();
        let existed = map.insert(scheme.to_string(), hash.to_string()).is_some();
        user.credentials = StoredCredentials::Schemes(map);

        if user.salt.is_none() {
            user.salt = Some(salt.to_string());
        }
        user.updated_at = Utc::now();

        Ok(existed)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(AuthError::UserNotFound)?;

        if let Some(name) = name {
            user.name = name.to_string();
        }
        if let Some(role) = role {
            user.role = role;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(AuthError::UserNotFound)
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
