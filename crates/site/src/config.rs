//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LANTERN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `LANTERN_BASE_URL` - Public URL for the site (https enables secure cookies)
//!
//! ## Optional
//! - `LANTERN_HOST` - Bind address (default: 127.0.0.1)
//! - `LANTERN_PORT` - Listen port (default: 3000)
//! - `LANTERN_CONTENT_DIR` - Directory of `.mdx` posts (default: `crates/site/content/posts`)
//! - `LANTERN_STATIC_DIR` - Static assets directory (default: `crates/site/static`)
//! - `VIEW_DEDUPE_WINDOW_SECS` - View de-duplication window (default: 1800)
//! - `NEWSLETTER_PROVIDER_WEBHOOK_URL` - Outbound webhook notified on new subscriptions
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use chrono::TimeDelta;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Default view de-duplication window (30 minutes).
pub const DEFAULT_VIEW_DEDUPE_WINDOW_SECS: i64 = 30 * 60;

/// Post directory used when `LANTERN_CONTENT_DIR` is unset.
pub const DEFAULT_CONTENT_DIR: &str = "crates/site/content/posts";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Site application configuration.
#[derive(Clone)]
pub struct SiteConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Directory holding the `.mdx` post files
    pub content_dir: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// How long a viewer key suppresses further view increments for a post
    pub view_dedupe_window: TimeDelta,
    /// Newsletter provider webhook (may embed a token)
    pub newsletter_webhook_url: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteConfig")
            .field("database_url", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("content_dir", &self.content_dir)
            .field("static_dir", &self.static_dir)
            .field("view_dedupe_window", &self.view_dedupe_window)
            .field(
                "newsletter_webhook_url",
                &self.newsletter_webhook_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let database_url = vars
            .get("LANTERN_DATABASE_URL")
            .or_else(|| vars.get("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("LANTERN_DATABASE_URL".to_string()))?;

        let host = vars
            .get_or("LANTERN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("LANTERN_HOST".to_string(), e.to_string()))?;
        let port = vars
            .get_or("LANTERN_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("LANTERN_PORT".to_string(), e.to_string()))?;

        let base_url = vars.required("LANTERN_BASE_URL")?;
        validate_url("LANTERN_BASE_URL", &base_url)?;

        let content_dir = PathBuf::from(vars.get_or("LANTERN_CONTENT_DIR", DEFAULT_CONTENT_DIR));
        let static_dir = PathBuf::from(vars.get_or("LANTERN_STATIC_DIR", "crates/site/static"));

        let window_secs = vars
            .get("VIEW_DEDUPE_WINDOW_SECS")
            .map_or(Ok(DEFAULT_VIEW_DEDUPE_WINDOW_SECS), |raw| parse_window_secs(&raw))?;

        let newsletter_webhook_url = match vars.get("NEWSLETTER_PROVIDER_WEBHOOK_URL") {
            Some(raw) if !raw.trim().is_empty() => {
                validate_url("NEWSLETTER_PROVIDER_WEBHOOK_URL", &raw)?;
                Some(SecretString::from(raw))
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            content_dir,
            static_dir,
            view_dedupe_window: TimeDelta::seconds(window_secs),
            newsletter_webhook_url,
            sentry_dsn: vars.get("SENTRY_DSN"),
            sentry_environment: vars.get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (controls `Secure` cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Newsletter webhook URL, if configured.
    #[must_use]
    pub fn newsletter_webhook(&self) -> Option<&str> {
        self.newsletter_webhook_url
            .as_ref()
            .map(ExposeSecret::expose_secret)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Thin wrapper that treats empty values as unset.
struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.is_empty())
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }
}

/// Require an absolute http(s) URL.
fn validate_url(key: &str, raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Parse a positive number of seconds.
fn parse_window_secs(raw: &str) -> Result<i64, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("VIEW_DEDUPE_WINDOW_SECS".to_string(), msg);

    let secs = raw.parse::<i64>().map_err(|e| invalid(e.to_string()))?;
    if secs <= 0 {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(secs)
}
