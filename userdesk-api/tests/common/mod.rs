/// Common test utilities for integration tests
///
/// The router runs over the in-memory repository, so these tests need no
/// database. Requests go through `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use userdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use userdesk_shared::repository::InMemoryUserRepository;

/// Test context holding the application router
pub struct TestContext {
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgresql://localhost/userdesk_test".to_string()),
            _ => None,
        })
        .expect("test config");

        let state = AppState::new(Arc::new(InMemoryUserRepository::new()), config);
        Self {
            app: build_router(state),
        }
    }

    /// Sends a request and returns the status and parsed JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        locale: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(locale) = locale {
            builder = builder.header(header::ACCEPT_LANGUAGE, locale);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    /// Sends a prepared request and returns the status and parsed JSON body
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!(
                    "Expected JSON body, got {}: {}",
                    status,
                    String::from_utf8_lossy(&bytes)
                )
            })
        };

        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(Method::POST, uri, body, None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body), None).await
    }

    /// Creates a user and returns its ID and generated password
    pub async fn create_user(&self, email: &str) -> (i64, String) {
        let (status, body) = self.post("/v1/users", Some(user_payload(email))).await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", body);

        (
            body["id"].as_i64().unwrap(),
            body["password"].as_str().unwrap().to_string(),
        )
    }
}

/// A valid create/update payload
pub fn user_payload(email: &str) -> Value {
    json!({
        "name": "Ada",
        "surname": "Lovelace",
        "email": email,
        "phone": "+44 20 7946 0000"
    })
}

/// Field/code pairs of a validation error body
pub fn error_fields(body: &Value) -> Vec<(String, String)> {
    body["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .map(|d| {
                    (
                        d["field"].as_str().unwrap_or_default().to_string(),
                        d["code"].as_str().unwrap_or_default().to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}
