//! Database operations for the blog `PostgreSQL` schema.
//!
//! ## Tables (schema `blog`)
//!
//! - `user` / `user_password` - Accounts and their password hashes
//! - `post` - Engagement rows keyed by content slug, created on demand
//! - `post_view` - View de-duplication ledger per (post, viewer key)
//! - `post_like` - One row per (post, user) like
//! - `comment` - Reader comments
//! - `newsletter_subscription` - Captured newsletter emails
//!
//! Session rows live in `tower_sessions.session`, owned by
//! `tower-sessions-sqlx-store`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/site/migrations/` and run via:
//! ```bash
//! cargo run -p lantern-cli -- migrate
//! ```

pub mod comments;
pub mod likes;
pub mod newsletter;
pub mod posts;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use comments::CommentRepository;
pub use likes::LikeRepository;
pub use newsletter::NewsletterRepository;
pub use posts::PostRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map unique violations to `Conflict` and foreign key violations to
    /// `NotFound`, passing every other error through.
    pub(crate) fn from_constraint(e: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflict.to_owned());
            }
            if db_err.is_foreign_key_violation() {
                return Self::NotFound;
            }
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
