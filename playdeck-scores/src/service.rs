//! Score validation and submission.

use crate::error::{Result, ScoreError};
use crate::models::{NewScore, Score};
use crate::repository::ScoreRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub struct ScoreService {
    repo: Arc<dyn ScoreRepository>,
}

impl ScoreService {
    pub fn new(repo: Arc<dyn ScoreRepository>) -> Self {
        Self { repo }
    }

    /// Record a score for a user.
    ///
    /// # Errors
    ///
    /// `ScoreError::Validation` unless `game_type` is a known game and
    /// `score` is non-negative.
    pub async fn submit(&self, user_id: Uuid, game_type: &str, score: i32) -> Result<Score> {
        let game_type = game_type
            .parse()
            .map_err(|_| ScoreError::validation("game_type must be either \"snake\" or \"laser\""))?;

        if score < 0 {
            return Err(ScoreError::validation(
                "score must be greater than or equal to 0",
            ));
        }

        let new_score = NewScore {
            user_id,
            game_type,
            score,
        };
        debug!(%user_id, game = %new_score.game_type, score, "recording score");

        let now = Utc::now();
        self.repo
            .insert(&Score {
                id: Uuid::new_v4(),
                user_id: new_score.user_id,
                game_type: new_score.game_type,
                score: new_score.score,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<Score>> {
        self.repo.list_all().await
    }

    /// A user's scores, highest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Score>> {
        self.repo.list_for_user(user_id).await
    }

    pub async fn storage_healthy(&self) -> bool {
        self.repo.is_healthy().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameKind;
    use crate::repository::InMemoryScoreRepository;

    fn service() -> ScoreService {
        ScoreService::new(Arc::new(InMemoryScoreRepository::new()))
    }

    #[tokio::test]
    async fn test_submit_and_list() {
        let service = service();
        let user = Uuid::new_v4();

        service.submit(user, "snake", 120).await.unwrap();
        service.submit(user, "laser", 300).await.unwrap();

        let all = service.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_user_scores_are_highest_first() {
        let service = service();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        service.submit(user, "snake", 50).await.unwrap();
        service.submit(user, "snake", 200).await.unwrap();
        service.submit(user, "laser", 120).await.unwrap();
        service.submit(other, "snake", 999).await.unwrap();

        let scores = service.list_for_user(user).await.unwrap();
        let values: Vec<i32> = scores.iter().map(|s| s.score).collect();
        assert_eq!(values, vec![200, 120, 50]);
        assert!(scores.iter().all(|s| s.user_id == user));
    }

    #[tokio::test]
    async fn test_submit_rejects_unknown_game() {
        let service = service();

        let result = service.submit(Uuid::new_v4(), "tetris", 10).await;
        assert!(matches!(result.unwrap_err(), ScoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_submit_rejects_negative_score() {
        let service = service();

        let result = service.submit(Uuid::new_v4(), "snake", -1).await;
        assert!(matches!(result.unwrap_err(), ScoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_zero_score_is_valid() {
        let service = service();

        let score = service.submit(Uuid::new_v4(), "laser", 0).await.unwrap();
        assert_eq!(score.score, 0);
        assert_eq!(score.game_type, GameKind::Laser);
    }
}
