//! Game score endpoints.

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::PlaydeckServer;
use crate::validation::RequestValidation;
use crate::{validate_field, validate_required};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use playdeck_scores::Score;
use serde::Deserialize;
use uuid::Uuid;

/// Score submission request
#[derive(Debug, Deserialize)]
pub struct SubmitScoreRequest {
    pub score: i32,
    pub game_type: String,
}

impl RequestValidation for SubmitScoreRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.game_type, "score and game_type are required");
        Ok(())
    }
}

/// List every recorded score.
pub async fn list_scores(
    State(server): State<PlaydeckServer>,
) -> Result<Json<ApiResponse<Vec<Score>>>, ApiError> {
    let scores = server.scores.list_all().await?;
    Ok(Json(api_success(scores)))
}

/// A user's scores, highest first.
pub async fn user_scores(
    State(server): State<PlaydeckServer>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Score>>>, ApiError> {
    let scores = server.scores.list_for_user(user_id).await?;
    Ok(Json(api_success(scores)))
}

/// Record a score for a user.
pub async fn submit_score(
    State(server): State<PlaydeckServer>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<SubmitScoreRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Score>>), ApiError> {
    request.validate()?;

    let score = server
        .scores
        .submit(user_id, &request.game_type, request.score)
        .await?;

    Ok((StatusCode::CREATED, Json(api_success(score))))
}
