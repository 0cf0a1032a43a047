//! Account endpoints: registration, login, logout, profile and credential
//! management.

use crate::error::{api_success, ApiError, ApiResponse};
use crate::middleware::AuthContext;
use crate::server::PlaydeckServer;
use crate::validation::RequestValidation;
use crate::{validate_email, validate_field, validate_length, validate_required};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use playdeck_auth::{RegisterUser, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Email address, used as the login identifier
    pub email: String,
    /// Initial credential secret
    pub secret: String,
    /// Credential scheme for the initial secret (defaults to `classic`)
    pub scheme: Option<String>,
}

impl RequestValidation for RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.name, "Name, email, and secret are required");
        validate_required!(self.email, "Name, email, and secret are required");
        validate_required!(self.secret, "Name, email, and secret are required");

        validate_length!(
            self.secret,
            6,
            128,
            "Secret must be between 6 and 128 characters"
        );
        validate_email!(self.email, "Invalid email format");

        Ok(())
    }
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserProfile,
    pub token: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub secret: String,
}

impl RequestValidation for LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.email, "Email and secret are required");
        validate_required!(self.secret, "Email and secret are required");
        Ok(())
    }
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserProfile,
    pub token: String,
    /// Credential scheme that verified the submitted secret
    pub matched_scheme: String,
}

/// Credential update request
#[derive(Debug, Deserialize)]
pub struct UpdateCredentialRequest {
    pub secret: String,
}

impl RequestValidation for UpdateCredentialRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.secret, "Secret is required");
        Ok(())
    }
}

/// Credential update response
#[derive(Debug, Serialize)]
pub struct UpdateCredentialResponse {
    pub message: String,
    pub scheme: String,
    /// "added" or "updated"
    pub status: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Register a new account with one initial credential scheme.
pub async fn register(
    State(server): State<PlaydeckServer>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), ApiError> {
    request.validate()?;

    let user = server
        .auth
        .register(RegisterUser {
            name: request.name,
            email: request.email,
            secret: request.secret,
            scheme: request.scheme,
        })
        .await?;

    let token = server.auth.issue_session(&user, None)?;

    Ok((
        StatusCode::CREATED,
        Json(api_success(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: user.into(),
            token,
        })),
    ))
}

/// Log in by matching the submitted secret against every credential scheme
/// on the account. Failures are a uniform 401 regardless of cause.
pub async fn login(
    State(server): State<PlaydeckServer>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    request.validate()?;

    let identity = server
        .auth
        .authenticate(&request.email, &request.secret)
        .await?;
    let token = server.auth.issue_for(&identity)?;
    let user = server.auth.get_user(identity.id).await?;

    Ok(Json(api_success(LoginResponse {
        message: "Login successful".to_string(),
        user,
        token,
        matched_scheme: identity.scheme,
    })))
}

/// Log out. Tokens are stateless, so this just records the event; the client
/// discards its copy.
pub async fn logout(context: AuthContext) -> Json<ApiResponse<LogoutResponse>> {
    info!(user_id = %context.user_id, email = %context.email, "user logged out");

    Json(api_success(LogoutResponse {
        message: "Logout successful".to_string(),
    }))
}

/// Current user's profile, without secrets.
pub async fn current_user(
    State(server): State<PlaydeckServer>,
    context: AuthContext,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let user = server.auth.get_user(context.user_id).await?;
    Ok(Json(api_success(user)))
}

/// Add or replace the credential for one scheme on the caller's account.
pub async fn update_credential(
    State(server): State<PlaydeckServer>,
    context: AuthContext,
    Path(scheme): Path<String>,
    Json(request): Json<UpdateCredentialRequest>,
) -> Result<Json<ApiResponse<UpdateCredentialResponse>>, ApiError> {
    request.validate()?;

    let status = server
        .auth
        .set_credential(context.user_id, &scheme, &request.secret)
        .await?;

    Ok(Json(api_success(UpdateCredentialResponse {
        message: format!("Credential for {scheme} {} successfully", status.as_str()),
        scheme,
        status: status.as_str().to_string(),
    })))
}
