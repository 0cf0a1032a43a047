//! Game score submission and leaderboards for the Playdeck API
//!
//! Players post a score per game after each run; the per-user listing is
//! ordered highest first so the front-end can render a personal best board
//! without sorting client-side.

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{Result, ScoreError};
pub use models::{GameKind, NewScore, Score};
pub use repository::{InMemoryScoreRepository, PostgresScoreRepository, ScoreRepository};
pub use service::ScoreService;
