//! CLI subcommands.

pub mod content;
pub mod migrate;
pub mod user;

use secrecy::SecretString;

use crate::error::CliError;

/// Database URL from `LANTERN_DATABASE_URL`, falling back to `DATABASE_URL`.
pub(crate) fn database_url() -> Result<SecretString, CliError> {
    std::env::var("LANTERN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.is_empty())
        .map(SecretString::from)
        .ok_or(CliError::MissingEnvVar("LANTERN_DATABASE_URL"))
}
