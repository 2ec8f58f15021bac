//! Anonymous viewer key cookie.
//!
//! View counting is keyed by a long-lived `viewerKey` cookie rather than the
//! session so that signed-out readers are de-duplicated too. The key is
//! issued lazily by the view endpoints and never tied to an account.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, header, request::Parts},
    response::Response,
};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

use lantern_core::ViewerKey;

/// Viewer cookie name.
pub const VIEWER_COOKIE_NAME: &str = "viewerKey";

/// Viewer cookie lifetime (30 days).
const VIEWER_COOKIE_MAX_AGE_DAYS: i64 = 30;

/// Extractor yielding the caller's viewer key, minting one if absent.
///
/// A missing, empty, or oversized cookie value is replaced with a fresh key;
/// [`ViewerCookie::attach`] then sets the cookie on the response.
#[derive(Debug, Clone)]
pub struct ViewerCookie {
    key: ViewerKey,
    issued: bool,
}

impl ViewerCookie {
    /// The viewer key for this request.
    #[must_use]
    pub const fn key(&self) -> &ViewerKey {
        &self.key
    }

    /// Whether the key was minted for this request.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.issued
    }

    /// Add `Set-Cookie` to `response` when the key was minted for this request.
    pub fn attach(&self, response: &mut Response, secure: bool) {
        if !self.issued {
            return;
        }

        let cookie = Cookie::build((VIEWER_COOKIE_NAME, self.key.to_string()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(Duration::days(VIEWER_COOKIE_MAX_AGE_DAYS))
            .secure(secure)
            .build();

        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
}

impl<S> FromRequestParts<S> for ViewerCookie
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let existing = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == VIEWER_COOKIE_NAME)
            .and_then(|cookie| ViewerKey::parse(cookie.value()).ok());

        Ok(existing.map_or_else(
            || Self {
                key: ViewerKey::generate(),
                issued: true,
            },
            |key| Self { key, issued: false },
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{body::Body, http::Request, response::IntoResponse};

    use super::*;

    async fn extract(cookie_header: Option<&str>) -> ViewerCookie {
        let mut builder = Request::builder().uri("/api/posts/x/view");
        if let Some(value) = cookie_header {
            builder = builder.header(header::COOKIE, value);
        }
        let (mut parts, _) = builder.body(Body::empty()).unwrap().into_parts();
        ViewerCookie::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_reuses_existing_key() {
        let viewer = extract(Some("theme=dark; viewerKey=abc-123")).await;
        assert_eq!(viewer.key().as_str(), "abc-123");
        assert!(!viewer.is_new());

        let mut response = ().into_response();
        viewer.attach(&mut response, false);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_issues_key_when_missing() {
        let viewer = extract(None).await;
        assert!(viewer.is_new());

        let mut response = ().into_response();
        viewer.attach(&mut response, false);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();

        assert!(set_cookie.starts_with(&format!("viewerKey={}", viewer.key())));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        assert!(set_cookie.contains("Path=/"));
        assert!(set_cookie.contains("Max-Age=2592000"));
        assert!(!set_cookie.contains("Secure"));
    }

    #[tokio::test]
    async fn test_replaces_malformed_key() {
        let long = "k".repeat(ViewerKey::MAX_LENGTH + 1);
        let viewer = extract(Some(&format!("viewerKey={long}"))).await;
        assert!(viewer.is_new());
        assert_ne!(viewer.key().as_str(), long);

        let viewer = extract(Some("viewerKey=")).await;
        assert!(viewer.is_new());
    }
}
