//! Lantern Core - Shared types library.
//!
//! This crate provides common types used across all Lantern components:
//! - `site` - Public blog (pages, auth, engagement API)
//! - `cli` - Command-line tools for migrations, content checks, and users
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Validation rules that both the web and CLI surfaces
//! must agree on (email normalization, comment length, display names)
//! live here so they cannot drift apart.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, names, comment bodies,
//!   and viewer keys

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
