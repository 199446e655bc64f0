mod common;

use common::{TestApp, assert_error};
use http::StatusCode;
use serde_json::json;
use shared::error::ErrorCode;

#[tokio::test]
async fn test_staff_can_view_but_not_manage_catalog() {
    let app = TestApp::new().await;
    let staff = app.token_for_role("staff").await;

    let (status, _) = app.get("/api/halls", &staff).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/bookings", &staff).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post("/api/halls", &staff, json!({ "name": "Side Hall" }))
        .await;
    assert_error(status, &body, ErrorCode::PermissionDenied);
    assert_eq!(body["details"]["required_permission"], "halls:manage");

    let (status, body) = app
        .post("/api/bookings", &staff, json!({}))
        .await;
    assert_error(status, &body, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_staff_manages_customers_and_devotees() {
    let app = TestApp::new().await;
    let staff = app.token_for_role("staff").await;
    app.create_customer(&staff, "Tan Ah Kow").await;

    let (status, body) = app
        .post("/api/devotees", &staff, json!({ "name": "Lim Mei Ling" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["devotee_code"], "DEV00001");
}

#[tokio::test]
async fn test_settings_hidden_from_staff() {
    let app = TestApp::new().await;
    let staff = app.token_for_role("staff").await;
    let (status, body) = app.get("/api/settings", &staff).await;
    assert_error(status, &body, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_manager_views_settings_but_cannot_change_them() {
    let app = TestApp::new().await;
    let manager = app.token_for_role("manager").await;

    let (status, _) = app.get("/api/settings", &manager).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .put("/api/settings/currency", &manager, json!({ "value": "SGD" }))
        .await;
    assert_error(status, &body, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_user_admin_requires_admin_role() {
    let app = TestApp::new().await;
    let manager = app.token_for_role("manager").await;
    let (status, body) = app.get("/api/users", &manager).await;
    assert_error(status, &body, ErrorCode::RoleRequired);
}

#[tokio::test]
async fn test_admin_cannot_touch_super_admin() {
    let app = TestApp::new().await;
    let root = app.admin_token().await;
    let (_, me) = app.get("/api/auth/me", &root).await;
    let root_id = me["user"]["id"].as_i64().unwrap();

    let admin = app.token_for_role("admin").await;
    let (status, body) = app
        .put(&format!("/api/users/{root_id}"), &admin, json!({ "name": "Renamed" }))
        .await;
    assert_error(status, &body, ErrorCode::CannotModifySuperAdmin);

    let (status, body) = app
        .post(
            "/api/users",
            &admin,
            json!({
                "name": "Second Root",
                "email": "root2@temple.local",
                "password": "root2-password",
                "role": "super_admin",
            }),
        )
        .await;
    assert_error(status, &body, ErrorCode::CannotModifySuperAdmin);
}

#[tokio::test]
async fn test_cannot_delete_self() {
    let app = TestApp::new().await;
    let root = app.admin_token().await;
    let (_, me) = app.get("/api/auth/me", &root).await;
    let root_id = me["user"]["id"].as_i64().unwrap();

    let (status, body) = app.delete(&format!("/api/users/{root_id}"), &root).await;
    assert_error(status, &body, ErrorCode::UserCannotDeleteSelf);
}

#[tokio::test]
async fn test_duplicate_user_email() {
    let app = TestApp::new().await;
    let root = app.admin_token().await;
    let (status, body) = app
        .post(
            "/api/users",
            &root,
            json!({
                "name": "Copy",
                "email": app.config.admin_email.to_uppercase(),
                "password": "copy-password",
                "role": "staff",
            }),
        )
        .await;
    assert_error(status, &body, ErrorCode::UserEmailExists);
}
