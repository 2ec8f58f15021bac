//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! lantern-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `LANTERN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Site migrations live in `crates/site/migrations/` and create the `blog`
//! schema. The session table (`tower_sessions.session`) is created by the
//! session store itself.

use tower_sessions_sqlx_store::PostgresStore;

use super::database_url;
use crate::error::CliError;

/// Apply site migrations, then the session-store migration.
pub async fn run() -> Result<(), CliError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = lantern_site::db::create_pool(&database_url).await?;

    tracing::info!("Running site migrations...");
    sqlx::migrate!("../site/migrations").run(&pool).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
