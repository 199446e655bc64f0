mod common;

use common::{TestApp, assert_error, days_from_today};
use http::StatusCode;
use serde_json::json;
use shared::error::ErrorCode;

#[tokio::test]
async fn test_customer_codes_and_soft_delete() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let first = app.create_customer(&token, "Tan Ah Kow").await;
    let second = app.create_customer(&token, "Wong Siew Lan").await;

    let (_, body) = app.get(&format!("/api/customers/{first}"), &token).await;
    assert_eq!(body["customer_code"], "CUST00001");
    assert_eq!(body["bookings"], json!([]));
    let (_, body) = app.get(&format!("/api/customers/{second}"), &token).await;
    assert_eq!(body["customer_code"], "CUST00002");

    let (status, body) = app.get("/api/customers?search=siew", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["items"][0]["name"], "Wong Siew Lan");

    let (status, _) = app.delete(&format!("/api/customers/{second}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.get(&format!("/api/customers/{second}"), &token).await;
    assert_error(status, &body, ErrorCode::CustomerNotFound);

    // codes are never reused
    let third = app.create_customer(&token, "Lee Chong Wei").await;
    let (_, body) = app.get(&format!("/api/customers/{third}"), &token).await;
    assert_eq!(body["customer_code"], "CUST00003");
}

#[tokio::test]
async fn test_customer_validation() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .post("/api/customers", &token, json!({ "name": "   " }))
        .await;
    assert_error(status, &body, ErrorCode::ValidationFailed);
    assert_eq!(body["details"]["field"], "name");

    let (status, body) = app
        .post(
            "/api/customers",
            &token,
            json!({ "name": "Tan", "email": "not-an-email" }),
        )
        .await;
    assert_error(status, &body, ErrorCode::ValidationFailed);
    assert_eq!(body["details"]["field"], "email");
}

#[tokio::test]
async fn test_customer_list_paginates() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    for i in 0..5 {
        app.create_customer(&token, &format!("Customer {i}")).await;
    }

    let (status, body) = app.get("/api/customers?page=2&per_page=2", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["total_pages"], 3);
}

#[tokio::test]
async fn test_page_far_past_the_end_is_empty() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    app.create_customer(&token, "Tan Ah Kow").await;

    let (status, body) = app
        .get("/api/customers?page=4294967295&per_page=100", &token)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_customer_update_clears_nullable_fields() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let id = app.create_customer(&token, "Tan Ah Kow").await;

    let (status, body) = app
        .put(
            &format!("/api/customers/{id}"),
            &token,
            json!({ "email": "tan@example.com", "notes": "Prefers WhatsApp" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["email"], "tan@example.com");

    let (status, body) = app
        .put(&format!("/api/customers/{id}"), &token, json!({ "email": null }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["email"].is_null());
    assert_eq!(body["phone"], "012-3456789");
    assert_eq!(body["notes"], "Prefers WhatsApp");
}

#[tokio::test]
async fn test_hall_names_are_unique_ignoring_case() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let hall = app.create_hall(&token, "Main Hall").await;

    let (status, body) = app
        .post("/api/halls", &token, json!({ "name": "main hall" }))
        .await;
    assert_error(status, &body, ErrorCode::HallNameExists);

    let other = app.create_hall(&token, "Side Hall").await;
    let (status, body) = app
        .put(&format!("/api/halls/{other}"), &token, json!({ "name": "MAIN HALL" }))
        .await;
    assert_error(status, &body, ErrorCode::HallNameExists);

    // a deleted hall frees its name
    let (status, _) = app.delete(&format!("/api/halls/{hall}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    app.create_hall(&token, "Main Hall").await;
}

#[tokio::test]
async fn test_hall_availability_by_slot() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let customer = app.create_customer(&token, "Tan Ah Kow").await;
    let hall = app.create_hall(&token, "Main Hall").await;
    let date = days_from_today(40);

    let (status, booking) = app
        .post(
            "/api/bookings",
            &token,
            json!({
                "customer_id": customer,
                "hall_id": hall,
                "event_date": date,
                "time_slot": "evening",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{booking}");

    let (status, body) = app
        .get(&format!("/api/halls/{hall}/availability?date={date}"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let slots = body["slots"].as_array().unwrap();
    let slot = |name: &str| {
        slots
            .iter()
            .find(|s| s["time_slot"] == name)
            .unwrap()
            .clone()
    };
    assert_eq!(slot("morning")["available"], true);
    assert_eq!(slot("afternoon")["available"], true);
    assert_eq!(slot("evening")["available"], false);
    assert_eq!(slot("evening")["booking_code"], booking["booking_code"]);
    assert_eq!(slot("full_day")["available"], false);
}

#[tokio::test]
async fn test_vendor_with_packages_cannot_be_deleted() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let package = app.create_dinner_package(&token, 888.0, 10).await;

    let (_, body) = app.get(&format!("/api/dinner-packages/{package}"), &token).await;
    let vendor = body["catering_vendor_id"].as_i64().unwrap();
    assert_eq!(body["vendor_name"], "Golden Wok Catering");

    let (status, body) = app
        .delete(&format!("/api/catering-vendors/{vendor}"), &token)
        .await;
    assert_error(status, &body, ErrorCode::CateringVendorHasPackages);

    let (status, _) = app
        .delete(&format!("/api/dinner-packages/{package}"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .delete(&format!("/api/catering-vendors/{vendor}"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_dinner_package_requires_existing_vendor() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (status, body) = app
        .post(
            "/api/dinner-packages",
            &token,
            json!({ "catering_vendor_id": 999, "name": "Orphan Set", "price_per_table": 500.0 }),
        )
        .await;
    assert_error(status, &body, ErrorCode::CateringVendorNotFound);
}

#[tokio::test]
async fn test_settings_round_trip() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app.get("/api/settings/payment_due_days", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], "14");
    assert_eq!(body["group"], "payment");

    let (status, body) = app
        .put("/api/settings/payment_due_days", &token, json!({ "value": "soon" }))
        .await;
    assert_error(status, &body, ErrorCode::ValidationFailed);

    let (status, body) = app
        .put("/api/settings/payment_due_days", &token, json!({ "value": "21" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], "21");
    assert_eq!(body["group"], "payment");

    let (status, body) = app.get("/api/settings?group=general", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().iter().all(|s| s["group"] == "general"));

    let (status, body) = app.get("/api/settings/no_such_key", &token).await;
    assert_error(status, &body, ErrorCode::SettingNotFound);
}
