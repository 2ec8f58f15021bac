//! Post likes.
//!
//! A row's presence is the only record of "liked"; counts are always
//! computed with `COUNT(*)`.

use sqlx::PgPool;

use lantern_core::UserId;

use super::RepositoryError;
use super::posts::upsert_post;
use crate::models::LikeState;

#[derive(sqlx::FromRow)]
struct LikeStateRow {
    count: i64,
    liked_by_me: bool,
}

/// Repository for like operations.
pub struct LikeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LikeRepository<'a> {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Like count for `slug` and whether `viewer` has liked it.
    ///
    /// A slug with no post row reports [`LikeState::EMPTY`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn state(
        &self,
        slug: &str,
        viewer: Option<UserId>,
    ) -> Result<LikeState, RepositoryError> {
        // Aggregates without GROUP BY always return one row, even with no post.
        let row = sqlx::query_as::<_, LikeStateRow>(
            r"
            SELECT COUNT(l.user_id) AS count,
                   COALESCE(BOOL_OR(l.user_id = $2), FALSE) AS liked_by_me
            FROM blog.post p
            LEFT JOIN blog.post_like l ON l.post_id = p.id
            WHERE p.slug = $1
            ",
        )
        .bind(slug)
        .bind(viewer)
        .fetch_one(self.pool)
        .await?;

        Ok(LikeState {
            count: row.count,
            liked_by_me: row.liked_by_me,
        })
    }

    /// Flip `user_id`'s like on `slug` and return the new state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user no longer exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn toggle(&self, slug: &str, user_id: UserId) -> Result<LikeState, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let post = upsert_post(&mut tx, slug).await?;

        let removed = sqlx::query("DELETE FROM blog.post_like WHERE post_id = $1 AND user_id = $2")
            .bind(post.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let liked_by_me = removed == 0;
        if liked_by_me {
            sqlx::query("INSERT INTO blog.post_like (post_id, user_id) VALUES ($1, $2)")
                .bind(post.id)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::from_constraint(e, "like already exists"))?;
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog.post_like WHERE post_id = $1")
            .bind(post.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(LikeState { count, liked_by_me })
    }
}
