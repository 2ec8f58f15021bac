//! Engagement read models returned by the post API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use lantern_core::{CommentId, UserId};

/// Result of recording (or reading) a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOutcome {
    pub view_count: i64,
    /// Whether this request incremented the counter.
    pub incremented: bool,
}

/// Like count for a post plus the caller's membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub count: i64,
    pub liked_by_me: bool,
}

impl LikeState {
    /// State for a post that has never been engaged with.
    pub const EMPTY: Self = Self {
        count: 0,
        liked_by_me: false,
    };
}

/// Public projection of a comment's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentAuthor {
    pub id: UserId,
    pub name: String,
}

/// A comment joined with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub author: CommentAuthor,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_like_state_json_shape() {
        let state = LikeState {
            count: 3,
            liked_by_me: true,
        };
        assert_eq!(
            serde_json::to_value(state).unwrap(),
            json!({"count": 3, "likedByMe": true})
        );
    }

    #[test]
    fn test_comment_json_shape() {
        let comment = Comment {
            id: CommentId::new(9),
            body: "Nice".to_string(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            author: CommentAuthor {
                id: UserId::new(2),
                name: "Ada".to_string(),
            },
        };

        assert_eq!(
            serde_json::to_value(&comment).unwrap(),
            json!({
                "id": 9,
                "body": "Nice",
                "createdAt": "1970-01-01T00:00:00Z",
                "author": {"id": 2, "name": "Ada"}
            })
        );
    }
}
