//! Lantern blog site library.
//!
//! This crate provides the site as a library so the binary, the CLI and the
//! integration tests share the same router, repositories and content loader.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod tests;

pub use app::build_router;
pub use state::AppState;
