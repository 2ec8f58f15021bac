//! Anonymous viewer key.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur when accepting a [`ViewerKey`] from a cookie.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKeyError {
    /// The cookie value is empty.
    #[error("viewer key cannot be empty")]
    Empty,
    /// The cookie value exceeds [`ViewerKey::MAX_LENGTH`] bytes.
    #[error("viewer key must be at most {max} bytes")]
    TooLong {
        /// Maximum allowed length in bytes.
        max: usize,
    },
}

/// Opaque per-browser identifier used to de-duplicate view counts.
///
/// Freshly issued keys are UUIDv4 strings, but keys that come back from a
/// cookie are treated as opaque: any non-empty value up to 128 bytes is
/// accepted so that keys issued by earlier deployments keep deduplicating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ViewerKey(String);

impl ViewerKey {
    /// Maximum accepted key length in bytes.
    pub const MAX_LENGTH: usize = 128;

    /// Issue a new random key.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a key presented by the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or longer than [`Self::MAX_LENGTH`].
    pub fn parse(raw: &str) -> Result<Self, ViewerKeyError> {
        if raw.is_empty() {
            return Err(ViewerKeyError::Empty);
        }

        if raw.len() > Self::MAX_LENGTH {
            return Err(ViewerKeyError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(raw.to_owned()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_uuid() {
        let key = ViewerKey::generate();
        assert!(Uuid::parse_str(key.as_str()).is_ok());
        assert_ne!(key, ViewerKey::generate());
    }

    #[test]
    fn test_parse_accepts_opaque_values() {
        let key = ViewerKey::parse("viewer-1700000000").unwrap();
        assert_eq!(key.as_str(), "viewer-1700000000");
    }

    #[test]
    fn test_parse_rejects_empty_and_long() {
        assert_eq!(ViewerKey::parse(""), Err(ViewerKeyError::Empty));
        let long = "k".repeat(ViewerKey::MAX_LENGTH + 1);
        assert!(matches!(
            ViewerKey::parse(&long),
            Err(ViewerKeyError::TooLong { .. })
        ));
    }
}
