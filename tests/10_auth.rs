mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{token_from_cookie, TestApp};
use serde_json::json;

#[tokio::test]
async fn healthz_responds_ok() -> Result<()> {
    let app = TestApp::new();
    let res = app.request(Method::GET, "/healthz", None, None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "status": "ok" }));
    Ok(())
}

#[tokio::test]
async fn readyz_pings_storage() -> Result<()> {
    let app = TestApp::new();
    let res = app.request(Method::GET, "/readyz", None, None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["storage"], "ok");
    assert_eq!(res.body["service"]["name"], "Todo App");
    Ok(())
}

#[tokio::test]
async fn signup_returns_profile_and_cookie() -> Result<()> {
    let app = TestApp::new();
    let res = app
        .request(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({ "email": "test@example.com", "password": "testpassword123", "name": "Test User" })),
        )
        .await?;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["email"], "test@example.com");
    assert_eq!(res.body["name"], "Test User");
    assert!(res.body["id"].is_string());
    assert!(res.body.get("password_hash").is_none());

    let cookie = res.session_cookie().expect("session cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    Ok(())
}

#[tokio::test]
async fn signup_duplicate_email_is_bad_request() -> Result<()> {
    let app = TestApp::new();
    app.signup("existing@example.com", "testpassword123").await?;

    let res = app
        .request(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({ "email": "existing@example.com", "password": "otherpassword" })),
        )
        .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error_code(), "HTTP_400");
    assert!(res.body["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .contains("already registered"));
    Ok(())
}

#[tokio::test]
async fn signup_validates_input() -> Result<()> {
    let app = TestApp::new();

    let short = app
        .request(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({ "email": "a@x.com", "password": "12345" })),
        )
        .await?;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(short.error_code(), "VALIDATION_ERROR");

    let missing = app
        .request(Method::POST, "/auth/signup", None, Some(json!({ "email": "a@x.com" })))
        .await?;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.error_code(), "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn login_failures_are_uniform() -> Result<()> {
    let app = TestApp::new();
    app.signup("a@x.com", "secret1").await?;

    for (email, password) in [("a@x.com", "wrong"), ("nonexistent@example.com", "secret1")] {
        let res = app
            .request(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await?;

        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert_eq!(res.body["error"]["message"], "Incorrect email or password");
        assert_eq!(res.error_code(), "HTTP_401");
        assert!(res.session_cookie().is_none());
    }
    Ok(())
}

#[tokio::test]
async fn login_cookie_authenticates_me() -> Result<()> {
    let app = TestApp::new();
    app.signup("a@x.com", "secret1").await?;

    let login = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "a@x.com", "password": "secret1" })),
        )
        .await?;
    assert_eq!(login.status, StatusCode::OK);
    let token = token_from_cookie(&login)?;

    // cookie only, no Authorization header
    let request = Request::builder()
        .method(Method::GET)
        .uri("/auth/me")
        .header(header::COOKIE, format!("access_token={}", token))
        .body(Body::empty())?;
    let me = app.send(request).await?;

    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], "a@x.com");
    assert_eq!(me.body["id"], login.body["id"]);
    Ok(())
}

#[tokio::test]
async fn me_requires_a_valid_token() -> Result<()> {
    let app = TestApp::new();

    let anonymous = app.request(Method::GET, "/auth/me", None, None).await?;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

    let forged = app
        .request(Method::GET, "/auth/me", Some("not-a-real-token"), None)
        .await?;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert_eq!(forged.body["error"]["message"], "Could not validate credentials");
    Ok(())
}

#[tokio::test]
async fn bearer_header_takes_precedence_over_cookie() -> Result<()> {
    let app = TestApp::new();
    let alice = app.signup("alice@x.com", "secret1").await?;
    let bob = app.signup("bob@x.com", "secret1").await?;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/auth/me")
        .header(header::AUTHORIZATION, format!("Bearer {}", alice))
        .header(header::COOKIE, format!("access_token={}", bob))
        .body(Body::empty())?;
    let me = app.send(request).await?;

    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], "alice@x.com");
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie() -> Result<()> {
    let app = TestApp::new();
    let res = app.request(Method::POST, "/auth/logout", None, None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Successfully logged out");

    let cookie = res.session_cookie().expect("removal cookie");
    assert!(cookie.starts_with("access_token=;"));
    assert!(cookie.contains("Max-Age=0"));
    Ok(())
}
