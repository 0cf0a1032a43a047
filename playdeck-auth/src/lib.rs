//! Multi-scheme credential matching and session tokens for the Playdeck API
//!
//! This crate provides the account and login functionality shared by the
//! Playdeck game platform:
//! - User registration with a named credential scheme per game type
//! - Login that matches a submitted secret against every scheme on record
//! - Salted bcrypt hashing with a per-user salt
//! - Stateless JWT session tokens and role-based access checks
//!
//! A user may hold several credentials at once (a classic password, a drawn
//! circle pattern, an image hash) and any of them unlocks the account. The
//! scheme that verified is reported back so clients can route the player to
//! the matching game.

pub mod config;
pub mod error;
pub mod hasher;
pub mod models;
pub mod repository;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::{AuthError, Result};
pub use hasher::{CredentialHasher, SaltedDigest};
pub use models::*;
pub use repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
pub use service::{AuthService, RegisterUser};
pub use token::{SessionClaims, TokenIssuer};
