//! PostgreSQL-backed score repository.

use crate::error::{Result, ScoreError};
use crate::models::{GameKind, Score};
use crate::repository::ScoreRepository;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::warn;
use uuid::Uuid;

pub struct PostgresScoreRepository {
    pool: PgPool,
}

impl PostgresScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_err(e: sqlx::Error) -> ScoreError {
    ScoreError::Storage(e.to_string())
}

fn map_score(row: &PgRow) -> Result<Score> {
    let game_str: String = row.try_get("game_type").map_err(storage_err)?;
    let game_type: GameKind = game_str.parse().map_err(ScoreError::Storage)?;

    Ok(Score {
        id: row.try_get("id").map_err(storage_err)?,
        user_id: row.try_get("user_id").map_err(storage_err)?,
        game_type,
        score: row.try_get("score").map_err(storage_err)?,
        created_at: row.try_get("created_at").map_err(storage_err)?,
        updated_at: row.try_get("updated_at").map_err(storage_err)?,
    })
}

const SCORE_COLUMNS: &str = "id, user_id, game_type, score, created_at, updated_at";

#[async_trait]
impl ScoreRepository for PostgresScoreRepository {
    async fn insert(&self, score: &Score) -> Result<Score> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO scores (id, user_id, game_type, score, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(score.id)
        .bind(score.user_id)
        .bind(score.game_type.as_str())
        .bind(score.score)
        .bind(score.created_at)
        .bind(score.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_err)?;

        map_score(&row)
    }

    async fn list_all(&self) -> Result<Vec<Score>> {
        let rows = sqlx::query(&format!(
            "SELECT {SCORE_COLUMNS} FROM scores ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter().map(map_score).collect()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Score>> {
        let rows = sqlx::query(&format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE user_id = $1 ORDER BY score DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter().map(map_score).collect()
    }

    async fn is_healthy(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Score store health check failed: {e}");
                false
            }
        }
    }
}
