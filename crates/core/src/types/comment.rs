//! Comment body type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when validating a [`CommentBody`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentBodyError {
    /// Nothing left after trimming.
    #[error("comment cannot be empty")]
    Empty,
    /// Longer than [`CommentBody::MAX_CHARS`] characters after trimming.
    #[error("comment must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length in characters.
        max: usize,
    },
}

/// A trimmed, non-empty comment body of at most 5000 characters.
///
/// Length is measured in Unicode scalar values, not bytes, so a comment
/// written entirely in multi-byte script gets the same allowance as ASCII.
///
/// ```
/// use lantern_core::{CommentBody, CommentBodyError};
///
/// let body = CommentBody::parse("  Great post!  ").unwrap();
/// assert_eq!(body.as_str(), "Great post!");
///
/// assert_eq!(CommentBody::parse("   "), Err(CommentBodyError::Empty));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CommentBody(String);

impl CommentBody {
    /// Maximum body length in characters.
    pub const MAX_CHARS: usize = 5000;

    /// Trim and validate a raw comment body.
    ///
    /// # Errors
    ///
    /// Returns [`CommentBodyError::Empty`] if nothing remains after trimming and
    /// [`CommentBodyError::TooLong`] if more than [`Self::MAX_CHARS`] characters remain.
    pub fn parse(raw: &str) -> Result<Self, CommentBodyError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(CommentBodyError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_CHARS {
            return Err(CommentBodyError::TooLong {
                max: Self::MAX_CHARS,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the body as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
