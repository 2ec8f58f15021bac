//! Core types for Lantern.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod comment;
pub mod email;
pub mod id;
pub mod name;
pub mod viewer;

pub use comment::{CommentBody, CommentBodyError};
pub use email::{Email, EmailError};
pub use id::*;
pub use name::{DisplayName, DisplayNameError};
pub use viewer::{ViewerKey, ViewerKeyError};
