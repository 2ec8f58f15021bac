//! Newsletter subscriptions.

use sqlx::PgPool;

use lantern_core::Email;

use super::RepositoryError;

/// Repository for newsletter subscriptions.
pub struct NewsletterRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NewsletterRepository<'a> {
    /// Create a new newsletter repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a subscription.
    ///
    /// Relies on the unique index rather than a read-then-write check, so two
    /// concurrent signups for the same address cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already subscribed.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn subscribe(&self, email: &Email) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO blog.newsletter_subscription (email) VALUES ($1)")
            .bind(email)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_constraint(e, "email already subscribed"))?;

        Ok(())
    }

    /// Whether `email` is subscribed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_subscribed(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM blog.newsletter_subscription WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }
}
