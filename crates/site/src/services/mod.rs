//! Business logic services.

pub mod auth;
pub mod newsletter;
pub mod views;

pub use auth::{AuthError, AuthService};
pub use newsletter::{NewsletterError, NewsletterService, NewsletterWebhook};
pub use views::{ViewDecision, ViewPolicy};
