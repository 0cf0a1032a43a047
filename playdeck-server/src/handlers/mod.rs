pub mod auth;
pub mod health;
pub mod scores;
pub mod users;
