//! Display name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`DisplayName`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayNameError {
    /// Nothing left after trimming.
    #[error("name cannot be empty")]
    Empty,
    /// Longer than [`DisplayName::MAX_CHARS`] characters.
    #[error("name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length in characters.
        max: usize,
    },
}

/// The public name shown next to a user's comments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Maximum name length in characters.
    pub const MAX_CHARS: usize = 100;

    /// Trim and validate a display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed name is empty or too long.
    pub fn parse(raw: &str) -> Result<Self, DisplayNameError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(DisplayNameError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_CHARS {
            return Err(DisplayNameError::TooLong {
                max: Self::MAX_CHARS,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
