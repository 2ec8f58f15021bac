//! End-to-end tests of the JSON API over a real server and database.

#![allow(clippy::unwrap_used)]

use lantern_integration_tests::{TestSite, unique_email, unique_slug};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

const PASSWORD: &str = "correct horse battery";

async fn sign_up_and_in(site: &TestSite, client: &Client, name: &str) -> String {
    let email = unique_email();

    let response = client
        .post(site.url("/api/auth/sign-up"))
        .json(&json!({"name": name, "email": email, "password": PASSWORD}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(site.url("/api/auth/sign-in"))
        .json(&json!({"email": email.to_uppercase(), "password": PASSWORD}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    email
}

async fn json_body(response: reqwest::Response) -> Value {
    response.json().await.unwrap()
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (LANTERN_TEST_DATABASE_URL)"]
async fn test_view_is_deduplicated_by_cookie() {
    let site = TestSite::spawn().await;
    let browser = site.client();
    let slug = unique_slug("http-views");
    let view_url = site.url(&format!("/api/posts/{slug}/view"));

    let first = browser.post(&view_url).send().await.unwrap();
    assert!(first.headers().get("set-cookie").is_some());
    assert_eq!(
        json_body(first).await,
        json!({"ok": true, "viewCount": 1, "incremented": true})
    );

    let second = json_body(browser.post(&view_url).send().await.unwrap()).await;
    assert_eq!(second["viewCount"], 1);
    assert_eq!(second["incremented"], false);

    // A different browser has its own viewer key
    let other = json_body(site.client().post(&view_url).send().await.unwrap()).await;
    assert_eq!(other["viewCount"], 2);

    let read = json_body(browser.get(&view_url).send().await.unwrap()).await;
    assert_eq!(read, json!({"ok": true, "viewCount": 2, "incremented": false}));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (LANTERN_TEST_DATABASE_URL)"]
async fn test_like_toggle_requires_session() {
    let site = TestSite::spawn().await;
    let slug = unique_slug("http-likes");
    let likes_url = site.url(&format!("/api/posts/{slug}/likes"));

    let anonymous = site.client().post(&likes_url).send().await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let browser = site.client();
    sign_up_and_in(&site, &browser, "Ada").await;

    let liked = json_body(browser.post(&likes_url).send().await.unwrap()).await;
    assert_eq!(liked, json!({"ok": true, "count": 1, "likedByMe": true}));

    let unliked = json_body(browser.post(&likes_url).send().await.unwrap()).await;
    assert_eq!(unliked, json!({"ok": true, "count": 0, "likedByMe": false}));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (LANTERN_TEST_DATABASE_URL)"]
async fn test_comment_flow() {
    let site = TestSite::spawn().await;
    let slug = unique_slug("http-comments");
    let comments_url = site.url(&format!("/api/posts/{slug}/comments"));

    // Rejected before anything is written
    let anonymous = site
        .client()
        .post(&comments_url)
        .json(&json!({"body": "Hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let post_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog.post WHERE slug = $1")
        .bind(&slug)
        .fetch_one(&site.pool)
        .await
        .unwrap();
    assert_eq!(post_rows, 0);

    let browser = site.client();
    sign_up_and_in(&site, &browser, "Grace").await;

    let empty = browser
        .post(&comments_url)
        .json(&json!({"body": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(empty).await["error"], "invalid");

    let too_long = browser
        .post(&comments_url)
        .json(&json!({"body": "é".repeat(5001)}))
        .send()
        .await
        .unwrap();
    assert_eq!(too_long.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(too_long).await["error"], "too_long");

    let created = browser
        .post(&comments_url)
        .json(&json!({"body": "Great post"}))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = json_body(created).await;
    assert_eq!(created["comment"]["body"], "Great post");
    assert_eq!(created["comment"]["author"]["name"], "Grace");

    let listed = json_body(site.client().get(&comments_url).send().await.unwrap()).await;
    assert_eq!(listed["comments"].as_array().unwrap().len(), 1);
    assert_eq!(listed["comments"][0]["id"], created["comment"]["id"]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (LANTERN_TEST_DATABASE_URL)"]
async fn test_newsletter_signup_then_conflict() {
    let site = TestSite::spawn().await;
    let client = site.client();
    let email = unique_email();

    let first = client
        .post(site.url("/api/newsletter"))
        .json(&json!({"email": format!("  {}  ", email.to_uppercase())}))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let again = client
        .post(site.url("/api/newsletter"))
        .json(&json!({"email": email}))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(again).await, json!({"ok": false, "error": "exists"}));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (LANTERN_TEST_DATABASE_URL)"]
async fn test_session_lifecycle() {
    let site = TestSite::spawn().await;
    let browser = site.client();
    let email = sign_up_and_in(&site, &browser, "Ada").await;

    let session = json_body(browser.get(site.url("/api/auth/session")).send().await.unwrap()).await;
    assert_eq!(session["user"]["email"], email);
    assert_eq!(session["user"]["name"], "Ada");

    let signed_out = browser.post(site.url("/api/auth/sign-out")).send().await.unwrap();
    assert_eq!(signed_out.status(), StatusCode::OK);

    let session = json_body(browser.get(site.url("/api/auth/session")).send().await.unwrap()).await;
    assert_eq!(session, json!({"ok": true, "user": null}));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (LANTERN_TEST_DATABASE_URL)"]
async fn test_duplicate_sign_up_conflicts() {
    let site = TestSite::spawn().await;
    let client = site.client();
    let email = unique_email();
    let body = json!({"name": "Ada", "email": email, "password": PASSWORD});

    let first = client.post(site.url("/api/auth/sign-up")).json(&body).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client.post(site.url("/api/auth/sign-up")).json(&body).send().await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(second).await["error"], "exists");
}
