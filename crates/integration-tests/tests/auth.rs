//! Credential auth against a real database.

#![allow(clippy::unwrap_used)]

use lantern_integration_tests::{test_pool, unique_email};
use lantern_site::services::{AuthError, AuthService};

#[tokio::test]
#[ignore = "Requires PostgreSQL (LANTERN_TEST_DATABASE_URL)"]
async fn test_login_is_case_insensitive() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);
    let email = unique_email();

    let registered = auth
        .register_with_password("Ada", &format!("  {}  ", email.to_uppercase()), "password123")
        .await
        .unwrap();
    assert_eq!(registered.email.as_str(), email);

    let user = auth
        .login_with_password(&email.to_uppercase(), "password123")
        .await
        .unwrap();
    assert_eq!(user.id, registered.id);
    assert_eq!(user.name, "Ada");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (LANTERN_TEST_DATABASE_URL)"]
async fn test_wrong_password_is_rejected() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);
    let email = unique_email();

    auth.register_with_password("Ada", &email, "password123")
        .await
        .unwrap();

    assert!(matches!(
        auth.login_with_password(&email, "password124").await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (LANTERN_TEST_DATABASE_URL)"]
async fn test_unknown_email_is_rejected() {
    let pool = test_pool().await;

    assert!(matches!(
        AuthService::new(&pool)
            .login_with_password(&unique_email(), "password123")
            .await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (LANTERN_TEST_DATABASE_URL)"]
async fn test_duplicate_registration() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);
    let email = unique_email();

    auth.register_with_password("Ada", &email, "password123")
        .await
        .unwrap();

    assert!(matches!(
        auth.register_with_password("Ada Again", &email, "password123")
            .await,
        Err(AuthError::UserAlreadyExists)
    ));
}
