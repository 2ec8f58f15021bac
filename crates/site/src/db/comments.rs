//! Comment storage.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use lantern_core::{CommentBody, CommentId, UserId};

use super::RepositoryError;
use super::posts::upsert_post;
use crate::models::{Comment, CommentAuthor};

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: CommentId,
    body: String,
    created_at: DateTime<Utc>,
    author_id: UserId,
    author_name: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            body: row.body,
            created_at: row.created_at,
            author: CommentAuthor {
                id: row.author_id,
                name: row.author_name,
            },
        }
    }
}

/// Repository for comment operations.
pub struct CommentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All comments on `slug`, newest first (ties broken by id, descending).
    ///
    /// Returns an empty list if the post has no row yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_slug(&self, slug: &str) -> Result<Vec<Comment>, RepositoryError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r"
            SELECT c.id, c.body, c.created_at, u.id AS author_id, u.name AS author_name
            FROM blog.comment c
            JOIN blog.post p ON p.id = c.post_id
            JOIN blog.user u ON u.id = c.user_id
            WHERE p.slug = $1
            ORDER BY c.created_at DESC, c.id DESC
            ",
        )
        .bind(slug)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    /// Create a comment on `slug`, creating the post row if needed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the author no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        slug: &str,
        user_id: UserId,
        body: &CommentBody,
    ) -> Result<Comment, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let post = upsert_post(&mut tx, slug).await?;

        let row = sqlx::query_as::<_, CommentRow>(
            r"
            WITH inserted AS (
                INSERT INTO blog.comment (post_id, user_id, body)
                VALUES ($1, $2, $3)
                RETURNING id, user_id, body, created_at
            )
            SELECT i.id, i.body, i.created_at, u.id AS author_id, u.name AS author_name
            FROM inserted i
            JOIN blog.user u ON u.id = i.user_id
            ",
        )
        .bind(post.id)
        .bind(user_id)
        .bind(body.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_constraint(e, "duplicate comment"))?;

        tx.commit().await?;

        Ok(row.into())
    }
}
