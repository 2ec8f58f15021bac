//! Post engagement rows and the view counter.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use lantern_core::{PostId, ViewerKey};

use super::RepositoryError;
use crate::models::ViewOutcome;
use crate::services::views::{ViewDecision, ViewPolicy};

/// A `blog.post` row as seen inside an engagement transaction.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub(crate) struct PostRow {
    pub id: PostId,
    pub view_count: i64,
}

/// Insert the post row for `slug` if missing and return it.
///
/// The no-op `DO UPDATE` makes `RETURNING` yield the existing row and takes
/// a row lock on it, so concurrent engagement transactions on the same slug
/// are serialized until commit.
pub(crate) async fn upsert_post(
    conn: &mut PgConnection,
    slug: &str,
) -> Result<PostRow, sqlx::Error> {
    sqlx::query_as::<_, PostRow>(
        r"
        INSERT INTO blog.post (slug)
        VALUES ($1)
        ON CONFLICT (slug) DO UPDATE SET slug = EXCLUDED.slug
        RETURNING id, view_count
        ",
    )
    .bind(slug)
    .fetch_one(conn)
    .await
}

/// Repository for post rows and view counting.
pub struct PostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Current view count for a slug, `0` if no row exists yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn view_count(&self, slug: &str) -> Result<i64, RepositoryError> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT view_count FROM blog.post WHERE slug = $1")
                .bind(slug)
                .fetch_optional(self.pool)
                .await?;

        Ok(count.unwrap_or(0))
    }

    /// Record a view of `slug` by `viewer` at `now`.
    ///
    /// Runs as one transaction: upsert the post, read the ledger row for the
    /// viewer, and apply the policy decision.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back on drop.
    pub async fn record_view(
        &self,
        slug: &str,
        viewer: &ViewerKey,
        now: DateTime<Utc>,
        policy: &ViewPolicy,
    ) -> Result<ViewOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let post = upsert_post(&mut tx, slug).await?;

        let last_viewed_at: Option<DateTime<Utc>> = sqlx::query_scalar(
            "SELECT last_viewed_at FROM blog.post_view WHERE post_id = $1 AND viewer_key = $2",
        )
        .bind(post.id)
        .bind(viewer.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let decision = policy.decide(last_viewed_at, now);
        match decision {
            ViewDecision::Duplicate => {
                tx.commit().await?;
                return Ok(ViewOutcome {
                    view_count: post.view_count,
                    incremented: false,
                });
            }
            ViewDecision::FirstView => {
                sqlx::query(
                    r"
                    INSERT INTO blog.post_view (post_id, viewer_key, last_viewed_at)
                    VALUES ($1, $2, $3)
                    ",
                )
                .bind(post.id)
                .bind(viewer.as_str())
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
            ViewDecision::Refresh => {
                sqlx::query(
                    r"
                    UPDATE blog.post_view SET last_viewed_at = $3
                    WHERE post_id = $1 AND viewer_key = $2
                    ",
                )
                .bind(post.id)
                .bind(viewer.as_str())
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }

        let view_count: i64 = sqlx::query_scalar(
            "UPDATE blog.post SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
        )
        .bind(post.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(slug, ?decision, view_count, "View recorded");

        Ok(ViewOutcome {
            view_count,
            incremented: true,
        })
    }
}
