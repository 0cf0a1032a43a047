//! Playdeck HTTP API server
//!
//! Wires the authentication and score services into an axum application:
//! - `/api/auth`: registration, multi-scheme login, credential management
//! - `/api/users`: user administration with role gates
//! - `/api/scores`: score submission and leaderboards
//! - `/health`: liveness and storage connectivity

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod validation;

pub use server::{PlaydeckServer, ServerConfig};

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the application router with all routes and middleware layers.
pub fn create_app(server: PlaydeckServer) -> Router {
    routes::create_routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(server)
}
