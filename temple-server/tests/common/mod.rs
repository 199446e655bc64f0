//! In-process test harness: fresh in-memory database per app, requests
//! driven through the full router and middleware stack.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use chrono::{Duration, NaiveDate};
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::error::ErrorCode;
use tower::ServiceExt;

use temple_server::{AppState, Config, api};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub config: Config,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::for_tests();
        let state = AppState::new(&config).await.expect("app state");
        let router = api::build_app(&state).with_state(state.clone());
        Self {
            router,
            state,
            config,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Token of the seeded super admin
    pub async fn admin_token(&self) -> String {
        let (status, body) = self
            .login(&self.config.admin_email, &self.config.admin_password)
            .await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    /// Create a user with `role` and return a token for it
    pub async fn token_for_role(&self, role: &str) -> String {
        let admin = self.admin_token().await;
        let email = format!("{role}-user@temple.local");
        let password = "correct-horse-battery";
        let (status, body) = self
            .post(
                "/api/users",
                &admin,
                json!({
                    "name": format!("Test {role}"),
                    "email": email,
                    "password": password,
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create user failed: {body}");

        let (status, body) = self.login(&email, password).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    pub async fn create_customer(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self
            .post("/api/customers", token, json!({ "name": name, "phone": "012-3456789" }))
            .await;
        assert_eq!(status, StatusCode::OK, "create customer failed: {body}");
        body["id"].as_i64().expect("customer id")
    }

    pub async fn create_hall(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/halls",
                token,
                json!({ "name": name, "capacity": 300, "base_price": 1500.0 }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create hall failed: {body}");
        body["id"].as_i64().expect("hall id")
    }

    /// Vendor plus one package; returns the package id
    pub async fn create_dinner_package(
        &self,
        token: &str,
        price_per_table: f64,
        min_tables: i32,
    ) -> i64 {
        let (status, vendor) = self
            .post("/api/catering-vendors", token, json!({ "name": "Golden Wok Catering" }))
            .await;
        assert_eq!(status, StatusCode::OK, "create vendor failed: {vendor}");

        let (status, body) = self
            .post(
                "/api/dinner-packages",
                token,
                json!({
                    "catering_vendor_id": vendor["id"],
                    "name": "Prosperity Set",
                    "price_per_table": price_per_table,
                    "min_tables": min_tables,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create package failed: {body}");
        body["id"].as_i64().expect("package id")
    }
}

pub fn days_from_today(days: i64) -> NaiveDate {
    shared::util::today() + Duration::days(days)
}

/// Assert an error response by HTTP status and numeric error code
#[track_caller]
pub fn assert_error(status: StatusCode, body: &Value, code: ErrorCode) {
    assert_eq!(status, code.http_status(), "unexpected status, body: {body}");
    assert_eq!(
        body["code"].as_u64(),
        Some(u64::from(code.code())),
        "unexpected error code, body: {body}"
    );
}
