//! CLI error type.

use lantern_site::content::ContentError;
use lantern_site::services::AuthError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Site migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A post file failed validation.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// No post with the given slug.
    #[error("No post with slug '{0}'")]
    PostNotFound(String),

    /// User creation failed.
    #[error("Could not create user: {0}")]
    Auth(#[from] AuthError),
}
