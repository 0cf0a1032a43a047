//! Score storage: in-memory for development/tests, PostgreSQL for deployments.

use crate::error::Result;
use crate::models::Score;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

pub mod postgres;

pub use postgres::PostgresScoreRepository;

#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn insert(&self, score: &Score) -> Result<Score>;
    async fn list_all(&self) -> Result<Vec<Score>>;
    /// Scores for one user, highest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Score>>;
    async fn is_healthy(&self) -> bool;
}

/// In-memory implementation for development and testing.
#[derive(Default)]
pub struct InMemoryScoreRepository {
    scores: RwLock<Vec<Score>>,
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    async fn insert(&self, score: &Score) -> Result<Score> {
        self.scores.write().await.push(score.clone());
        Ok(score.clone())
    }

    async fn list_all(&self) -> Result<Vec<Score>> {
        Ok(self.scores.read().await.clone())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Score>> {
        let mut scores: Vec<Score> = self
            .scores
            .read()
            .await
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(scores)
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
