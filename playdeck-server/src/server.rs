use anyhow::Result;
use axum::extract::FromRef;
use chrono::{DateTime, Utc};
use playdeck_auth::{
    AuthConfig, AuthService, InMemoryUserRepository, PostgresUserRepository, UserRepository,
};
use playdeck_scores::{
    InMemoryScoreRepository, PostgresScoreRepository, ScoreRepository, ScoreService,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Main Playdeck server state
#[derive(Clone)]
pub struct PlaydeckServer {
    /// Server configuration
    pub config: ServerConfig,
    /// Authentication and account service
    pub auth: Arc<AuthService>,
    /// Game score service
    pub scores: Arc<ScoreService>,
    /// Process start time, reported by the health endpoint
    pub started_at: DateTime<Utc>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Deployment environment ("development" or "production")
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Playdeck API".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl PlaydeckServer {
    pub fn new(config: ServerConfig, auth: Arc<AuthService>, scores: Arc<ScoreService>) -> Self {
        Self {
            config,
            auth,
            scores,
            started_at: Utc::now(),
        }
    }

    /// Build the server state from the environment.
    ///
    /// With `DATABASE_URL` set a PostgreSQL pool backs both stores; without
    /// it everything lives in process memory, which is enough for local
    /// development and demos.
    pub async fn from_env() -> Result<Self> {
        let config = ServerConfig {
            environment: std::env::var("PLAYDECK_ENV")
                .unwrap_or_else(|_| "development".to_string()),
            ..ServerConfig::default()
        };
        let auth_config = AuthConfig::from_env();

        let (user_repo, score_repo): (Arc<dyn UserRepository>, Arc<dyn ScoreRepository>) =
            match std::env::var("DATABASE_URL") {
                Ok(url) => {
                    let pool = PgPoolOptions::new()
                        .max_connections(10)
                        .acquire_timeout(Duration::from_secs(30))
                        .connect(&url)
                        .await?;
                    info!("Database connection pool created successfully");

                    (
                        Arc::new(PostgresUserRepository::new(pool.clone())),
                        Arc::new(PostgresScoreRepository::new(pool)),
                    )
                }
                Err(_) => {
                    warn!("DATABASE_URL not set, using in-memory storage");
                    (
                        Arc::new(InMemoryUserRepository::new()),
                        Arc::new(InMemoryScoreRepository::new()),
                    )
                }
            };

        let auth = Arc::new(AuthService::new(user_repo, &auth_config));
        let scores = Arc::new(ScoreService::new(score_repo));

        Ok(Self::new(config, auth, scores))
    }
}

/// Lets extractors pull the auth service straight out of router state.
impl FromRef<PlaydeckServer> for Arc<AuthService> {
    fn from_ref(server: &PlaydeckServer) -> Self {
        server.auth.clone()
    }
}
