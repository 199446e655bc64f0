mod common;

use common::{TestApp, assert_error};
use http::{Method, StatusCode};
use serde_json::json;
use shared::error::ErrorCode;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_api_requires_token() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/api/customers", None, None).await;
    assert_error(status, &body, ErrorCode::NotAuthenticated);

    let (status, body) = app
        .request(Method::GET, "/api/customers", Some("not-a-jwt"), None)
        .await;
    assert_error(status, &body, ErrorCode::TokenInvalid);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = TestApp::new().await;
    let (status, body) = app.login(&app.config.admin_email, "wrong-password").await;
    assert_error(status, &body, ErrorCode::InvalidCredentials);

    let (status, body) = app.login("nobody@temple.local", "whatever-password").await;
    assert_error(status, &body, ErrorCode::InvalidCredentials);
}

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::new().await;
    let (status, body) = app
        .login(&app.config.admin_email, &app.config.admin_password)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "super_admin");
    assert!(body["user"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap();
    let (status, me) = app.get("/api/auth/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["email"], app.config.admin_email.as_str());
    let permissions: Vec<&str> = me["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p.as_str())
        .collect();
    assert!(permissions.contains(&"bookings:manage"));
    assert!(permissions.contains(&"users:manage"));
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app.post("/api/auth/logout", &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(true));

    let (status, body) = app.get("/api/auth/me", &token).await;
    assert_error(status, &body, ErrorCode::TokenInvalid);
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/auth/change-password",
            &token,
            json!({ "current_password": "not-it", "new_password": "a-new-password" }),
        )
        .await;
    assert_error(status, &body, ErrorCode::InvalidCredentials);

    let (status, _) = app
        .post(
            "/api/auth/change-password",
            &token,
            json!({
                "current_password": app.config.admin_password,
                "new_password": "a-new-password",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.login(&app.config.admin_email, "a-new-password").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .login(&app.config.admin_email, &app.config.admin_password)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disabled_user_cannot_login() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (status, user) = app
        .post(
            "/api/users",
            &admin,
            json!({
                "name": "Former Clerk",
                "email": "clerk@temple.local",
                "password": "clerk-password",
                "role": "staff",
                "is_active": false,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["is_active"], false);

    let (status, body) = app.login("clerk@temple.local", "clerk-password").await;
    assert_error(status, &body, ErrorCode::AccountDisabled);
}
