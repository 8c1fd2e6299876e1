#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use axum_todo::{
    config::{AuthConfig, Config, ServerConfig, ServiceConfig, StorageBackend, StorageConfig},
    services::MemoryStore,
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            url: String::new(),
            database: "integration".into(),
        },
        auth: AuthConfig {
            jwt_secret: "integration-secret".into(),
            jwt_algorithm: "HS256".into(),
            token_ttl_minutes: 30,
            cookie_name: "access_token".into(),
            cookie_secure: false,
            bcrypt_cost: 4,
        },
        service: ServiceConfig {
            name: "Todo App".into(),
            version: "test".into(),
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Value of the session cookie set by this response, if any.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with("access_token="))
            .map(|value| value.to_string())
    }

    pub fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(test_config(), Arc::new(MemoryStore::new()))
            .expect("test state");
        Self {
            router: axum_todo::app(state.clone()),
            state,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(TestResponse { status, headers, body })
    }

    /// Signs up a fresh account and returns a bearer token for it.
    pub async fn signup(&self, email: &str, password: &str) -> Result<String> {
        let response = self
            .request(
                Method::POST,
                "/auth/signup",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await?;
        anyhow::ensure!(
            response.status == StatusCode::CREATED,
            "signup failed: {} {}",
            response.status,
            response.body
        );
        token_from_cookie(&response)
    }
}

pub fn token_from_cookie(response: &TestResponse) -> Result<String> {
    let cookie = response
        .session_cookie()
        .ok_or_else(|| anyhow::anyhow!("no session cookie on response"))?;
    let value = cookie
        .trim_start_matches("access_token=")
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string();
    Ok(value)
}
