//! PostgreSQL-backed user repository.
//!
//! The credential map lives in a JSONB column; legacy rows hold a bare JSON
//! string instead of an object and are upgraded in place on first write.
//! The single-key credential upsert is one statement so concurrent writes
//! to different schemes never lose each other's entries.

use crate::error::{AuthError, Result};
use crate::models::{Role, StoredCredentials, User};
use crate::repository::UserRepository;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::warn;
use uuid::Uuid;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create with connection string.
    pub async fn from_connection_string(connection_string: &str) -> Result<Self> {
        let pool = PgPool::connect(connection_string)
            .await
            .map_err(|e| AuthError::Storage(format!("Failed to connect: {e}")))?;

        Ok(Self::new(pool))
    }
}

fn storage_err(e: sqlx::Error) -> AuthError {
    AuthError::Storage(e.to_string())
}

fn map_user(row: &PgRow) -> Result<User> {
    let role_str: String = row.try_get("role").map_err(storage_err)?;
    let role: Role = role_str.parse().map_err(AuthError::Storage)?;

    let credentials: serde_json::Value = row.try_get("credentials").map_err(storage_err)?;
    let credentials: StoredCredentials = serde_json::from_value(credentials)
        .map_err(|e| AuthError::Storage(format!("Malformed credentials column: {e}")))?;

    Ok(User {
        id: row.try_get("id").map_err(storage_err)?,
        name: row.try_get("name").map_err(storage_err)?,
        email: row.try_get("email").map_err(storage_err)?,
        role,
        salt: row.try_get("salt").map_err(storage_err)?,
        credentials,
        created_at: row.try_get("created_at").map_err(storage_err)?,
        updated_at: row.try_get("updated_at").map_err(storage_err)?,
    })
}

const USER_COLUMNS: &str = "id, name, email, role, salt, credentials, created_at, updated_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, user: &User) -> Result<User> {
        let credentials = serde_json::to_value(&user.credentials)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, name, email, role, salt, credentials, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.salt)
        .bind(credentials)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::DuplicateEmail,
            other => storage_err(other),
        })?;

        map_user(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        row.as_ref().map(map_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        row.as_ref().map(map_user).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter().map(map_user).collect()
    }

    async fn upsert_credential(
        &self,
        id: Uuid,
        scheme: &str,
        hash: &str,
        salt: &str,
    ) -> Result<bool> {
        // One statement: snapshot whether the scheme key existed, then set it.
        // Legacy rows (bare JSON string) are folded into an object under
        // 'classic' before the key is written.
        let row = sqlx::query(
            r#"
            WITH prev AS (
                SELECT COALESCE(jsonb_typeof(credentials) = 'object' AND credentials ? $2, false) AS existed
                FROM users WHERE id = $1
            )
            UPDATE users
            SET credentials = jsonb_set(
                    CASE
                        WHEN credentials IS NULL THEN '{}'::jsonb
                        WHEN jsonb_typeof(credentials) = 'object' THEN credentials
                        ELSE jsonb_build_object('classic', credentials)
                    END,
                    ARRAY[$2], to_jsonb($3::text), true),
                salt = COALESCE(salt, $4),
                updated_at = NOW()
            WHERE id = $1
            RETURNING (SELECT existed FROM prev) AS existed
            "#,
        )
        .bind(id)
        .bind(scheme)
        .bind(hash)
        .bind(salt)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        match row {
            Some(row) => row.try_get("existed").map_err(storage_err),
            None => Err(AuthError::UserNotFound),
        }
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<User> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                role = COALESCE($3, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(role.map(|r| r.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        match row {
            Some(row) => map_user(&row),
            None => Err(AuthError::UserNotFound),
        }
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                warn!("User store health check failed: {e}");
                false
            }
        }
    }
}
