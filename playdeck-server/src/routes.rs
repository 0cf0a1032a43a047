use crate::{
    handlers::{auth, health, scores, users},
    server::PlaydeckServer,
};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

/// Create health check routes
pub fn health_routes() -> Router<PlaydeckServer> {
    Router::new().route("/health", get(health::health_check))
}

/// Create authentication routes
pub fn auth_routes() -> Router<PlaydeckServer> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::current_user))
        .route("/credentials/:scheme", put(auth::update_credential))
}

/// Create user administration routes
pub fn user_routes() -> Router<PlaydeckServer> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user))
        .route("/users/:id", put(users::update_user))
        .route("/users/:id", delete(users::delete_user))
}

/// Create score routes
pub fn score_routes() -> Router<PlaydeckServer> {
    Router::new()
        .route("/scores", get(scores::list_scores))
        .route("/scores/:user_id", get(scores::user_scores))
        .route("/scores/:user_id", post(scores::submit_score))
}

/// Create API routes
pub fn api_routes() -> Router<PlaydeckServer> {
    Router::new()
        .nest("/auth", auth_routes())
        .merge(user_routes())
        .merge(score_routes())
}

/// Create all application routes
pub fn create_routes() -> Router<PlaydeckServer> {
    Router::new()
        // Service banner and health checks (no authentication required)
        .route("/", get(health::service_info))
        .merge(health_routes())
        // API routes
        .nest("/api", api_routes())
}
