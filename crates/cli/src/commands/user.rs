//! Reader account commands.
//!
//! # Usage
//!
//! ```bash
//! LANTERN_NEW_USER_PASSWORD='correct horse battery' \
//!     lantern-cli user create -e ada@example.com -n "Ada"
//! ```
//!
//! # Environment Variables
//!
//! - `LANTERN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `LANTERN_NEW_USER_PASSWORD` - Password for the new account (kept off the command line)

use lantern_core::UserId;
use lantern_site::services::AuthService;
use secrecy::{ExposeSecret, SecretString};

use super::database_url;
use crate::error::CliError;

/// Create a reader account with a password.
///
/// Applies the same validation as the sign-up endpoint.
pub async fn create(email: &str, name: &str) -> Result<UserId, CliError> {
    let password: SecretString = std::env::var("LANTERN_NEW_USER_PASSWORD")
        .ok()
        .filter(|p| !p.is_empty())
        .map(SecretString::from)
        .ok_or(CliError::MissingEnvVar("LANTERN_NEW_USER_PASSWORD"))?;

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = lantern_site::db::create_pool(&database_url).await?;

    let user = AuthService::new(&pool)
        .register_with_password(name, email, password.expose_secret())
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id)
}
