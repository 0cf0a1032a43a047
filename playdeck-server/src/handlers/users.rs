//! User administration endpoints.
//!
//! Listing and reading require any authenticated account; updates are gated
//! to moderators and admins, deletion to admins only.

use crate::error::{api_success, ApiError, ApiResponse};
use crate::middleware::AuthContext;
use crate::server::PlaydeckServer;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use playdeck_auth::{Role, UserProfile};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

/// User update request; omitted fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<Role>,
}

/// List all user profiles.
pub async fn list_users(
    State(server): State<PlaydeckServer>,
    _context: AuthContext,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, ApiError> {
    let users = server.auth.list_users().await?;
    Ok(Json(api_success(users)))
}

/// Fetch one user profile.
pub async fn get_user(
    State(server): State<PlaydeckServer>,
    _context: AuthContext,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let user = server.auth.get_user(user_id).await?;
    Ok(Json(api_success(user)))
}

/// Update a user's name and/or role. Moderator or admin only.
pub async fn update_user(
    State(server): State<PlaydeckServer>,
    context: AuthContext,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    context.require_moderator()?;

    let user = server
        .auth
        .update_user(user_id, request.name.as_deref(), request.role)
        .await?;
    info!(actor = %context.user_id, %user_id, "user updated");

    Ok(Json(api_success(user)))
}

/// Delete a user. Admin only.
pub async fn delete_user(
    State(server): State<PlaydeckServer>,
    context: AuthContext,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    context.require_admin()?;

    server.auth.delete_user(user_id).await?;
    info!(actor = %context.user_id, %user_id, "user deleted");

    Ok(StatusCode::NO_CONTENT)
}
