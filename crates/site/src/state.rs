//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::SiteConfig;
use crate::content::ContentStore;
use crate::services::{NewsletterWebhook, ViewPolicy};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    content: ContentStore,
    view_policy: ViewPolicy,
    newsletter_webhook: Option<NewsletterWebhook>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Site configuration
    /// * `pool` - `PostgreSQL` connection pool
    /// * `content` - Posts loaded at startup
    ///
    /// # Errors
    ///
    /// Returns an error if the newsletter webhook client cannot be built.
    pub fn new(
        config: SiteConfig,
        pool: PgPool,
        content: ContentStore,
    ) -> Result<Self, reqwest::Error> {
        let newsletter_webhook = config
            .newsletter_webhook()
            .map(NewsletterWebhook::new)
            .transpose()?;
        let view_policy = ViewPolicy::new(config.view_dedupe_window);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                content,
                view_policy,
                newsletter_webhook,
            }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the posts loaded at startup.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Get the view de-duplication policy.
    #[must_use]
    pub fn view_policy(&self) -> &ViewPolicy {
        &self.inner.view_policy
    }

    /// Get the newsletter provider webhook, if configured.
    #[must_use]
    pub fn newsletter_webhook(&self) -> Option<&NewsletterWebhook> {
        self.inner.newsletter_webhook.as_ref()
    }
}
