//! Newsletter signup.
//!
//! Local persistence is authoritative. When a provider webhook is configured
//! it is notified after the row is written; delivery failures are logged and
//! never surface to the subscriber.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

use lantern_core::Email;

use crate::db::{NewsletterRepository, RepositoryError};

/// Timeout for the provider webhook call.
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when subscribing.
#[derive(Debug, Error)]
pub enum NewsletterError {
    /// Address does not look like `local@domain.tld`.
    #[error("invalid email address")]
    InvalidEmail,

    /// Address is already on the list.
    #[error("email already subscribed")]
    AlreadySubscribed,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Outbound notification to the newsletter provider.
#[derive(Clone)]
pub struct NewsletterWebhook {
    client: reqwest::Client,
    url: SecretString,
}

impl NewsletterWebhook {
    /// Create a webhook client for `url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;

        Ok(Self {
            client,
            url: SecretString::from(url),
        })
    }

    /// POST `{"email": ...}` to the provider.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, timeout, or a non-2xx status. The
    /// URL is stripped from the error since it may embed a token.
    pub async fn notify(&self, email: &Email) -> Result<(), reqwest::Error> {
        self.client
            .post(self.url.expose_secret())
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map(|_| ())
            .map_err(reqwest::Error::without_url)
    }
}

impl std::fmt::Debug for NewsletterWebhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsletterWebhook")
            .field("url", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Newsletter signup service.
pub struct NewsletterService<'a> {
    subscriptions: NewsletterRepository<'a>,
    webhook: Option<&'a NewsletterWebhook>,
}

impl<'a> NewsletterService<'a> {
    /// Create a new newsletter service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, webhook: Option<&'a NewsletterWebhook>) -> Self {
        Self {
            subscriptions: NewsletterRepository::new(pool),
            webhook,
        }
    }

    /// Normalize, validate and store a subscription, then notify the provider.
    ///
    /// # Errors
    ///
    /// Returns `NewsletterError::InvalidEmail` for malformed addresses.
    /// Returns `NewsletterError::AlreadySubscribed` if the address is already stored.
    pub async fn subscribe(&self, raw_email: &str) -> Result<Email, NewsletterError> {
        let email = parse_subscriber_email(raw_email)?;

        self.subscriptions
            .subscribe(&email)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => NewsletterError::AlreadySubscribed,
                other => NewsletterError::Repository(other),
            })?;

        tracing::info!(domain = email.domain(), "Newsletter subscription stored");

        if let Some(webhook) = self.webhook
            && let Err(e) = webhook.notify(&email).await
        {
            tracing::warn!(error = %e, "Newsletter provider webhook failed");
        }

        Ok(email)
    }
}

/// Normalize an address and require the `local@domain.tld` shape.
///
/// # Errors
///
/// Returns `NewsletterError::InvalidEmail` if the normalized address has
/// whitespace, more than one `@`, or no dot with text on both sides in the
/// domain.
pub fn parse_subscriber_email(raw: &str) -> Result<Email, NewsletterError> {
    let email = Email::normalize(raw).map_err(|_| NewsletterError::InvalidEmail)?;

    if is_valid_email(email.as_str()) {
        Ok(email)
    } else {
        Err(NewsletterError::InvalidEmail)
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }

    // A dot that is neither the first nor the last character of the domain
    let mut inner = domain.chars();
    inner.next();
    inner.next_back();
    inner.as_str().contains('.')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Json, Router, extract::State, routing::post};
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn test_parse_normalizes() {
        let email = parse_subscriber_email("  Reader@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "reader@example.com");
    }

    #[test]
    fn test_shape_validation() {
        assert!(parse_subscriber_email("a@b.co").is_ok());
        assert!(parse_subscriber_email("first.last@mail.example.org").is_ok());

        for bad in [
            "",
            "   ",
            "no-at-sign.com",
            "@example.com",
            "user@",
            "user@localhost",
            "user@.com",
            "user@example.",
            "user@@example.com",
            "a@b@example.com",
            "us er@example.com",
        ] {
            assert!(
                matches!(
                    parse_subscriber_email(bad),
                    Err(NewsletterError::InvalidEmail)
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_webhook_posts_email_json() {
        let (tx, mut rx) = mpsc::channel::<serde_json::Value>(1);
        let app = Router::new()
            .route(
                "/hook",
                post(
                    |State(tx): State<mpsc::Sender<serde_json::Value>>,
                     Json(body): Json<serde_json::Value>| async move {
                        tx.send(body).await.unwrap();
                    },
                ),
            )
            .with_state(tx);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let webhook = NewsletterWebhook::new(&format!("http://{addr}/hook")).unwrap();
        let email = Email::parse("reader@example.com").unwrap();
        webhook.notify(&email).await.unwrap();

        let body = rx.recv().await.unwrap();
        assert_eq!(body, serde_json::json!({"email": "reader@example.com"}));
    }

    #[tokio::test]
    async fn test_webhook_error_hides_url() {
        // Bind then drop to get a port nothing is listening on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let webhook = NewsletterWebhook::new(&format!("http://{addr}/secret-token")).unwrap();
        let email = Email::parse("reader@example.com").unwrap();
        let err = webhook.notify(&email).await.unwrap_err();

        assert!(!err.to_string().contains("secret-token"));
        assert!(!format!("{webhook:?}").contains("secret-token"));
    }
}
