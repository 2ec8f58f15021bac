//! Domain models for the site.

pub mod engagement;
pub mod session;
pub mod user;

pub use engagement::{Comment, CommentAuthor, LikeState, ViewOutcome};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
