mod common;

use common::{TestApp, assert_error, days_from_today};
use http::StatusCode;
use serde_json::{Value, json};
use shared::error::ErrorCode;

struct Fixture {
    app: TestApp,
    token: String,
    customer: i64,
    hall: i64,
}

async fn fixture() -> Fixture {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let customer = app.create_customer(&token, "Tan Ah Kow").await;
    let hall = app.create_hall(&token, "Main Hall").await;
    Fixture {
        app,
        token,
        customer,
        hall,
    }
}

impl Fixture {
    async fn book(&self, days_ahead: i64, slot: &str) -> (StatusCode, Value) {
        self.app
            .post(
                "/api/bookings",
                &self.token,
                json!({
                    "customer_id": self.customer,
                    "hall_id": self.hall,
                    "event_date": days_from_today(days_ahead),
                    "time_slot": slot,
                    "event_type": "Wedding dinner",
                    "guest_count": 250,
                    "items": [
                        { "description": "Hall rental", "quantity": 1, "unit_price": 2000.0 }
                    ],
                }),
            )
            .await
    }

    async fn pay(&self, booking_id: i64, amount: f64) -> (StatusCode, Value) {
        self.app
            .post(
                "/api/payments",
                &self.token,
                json!({ "booking_id": booking_id, "amount": amount, "method": "cash" }),
            )
            .await
    }

    async fn booking(&self, id: i64) -> Value {
        let (status, body) = self.app.get(&format!("/api/bookings/{id}"), &self.token).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body
    }
}

#[tokio::test]
async fn test_booking_totals_from_items_and_package() {
    let f = fixture().await;
    let package = f.app.create_dinner_package(&f.token, 888.0, 10).await;
    let (status, item) = f
        .app
        .post(
            "/api/billing-items",
            &f.token,
            json!({ "name": "Sound system", "category": "equipment", "unit_price": 120.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{item}");

    let (status, body) = f
        .app
        .post(
            "/api/bookings",
            &f.token,
            json!({
                "customer_id": f.customer,
                "hall_id": f.hall,
                "event_date": days_from_today(60),
                "time_slot": "evening",
                "items": [
                    { "billing_item_id": item["id"], "quantity": 2 },
                    { "description": "Stage decoration", "quantity": 1, "unit_price": 350.5 }
                ],
                "dinner_package": { "dinner_package_id": package, "table_count": 10 },
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    assert_eq!(body["status"], "pending");
    assert_eq!(body["subtotal"], 590.5);
    assert_eq!(body["dinner_total"], 8880.0);
    assert_eq!(body["total_amount"], 9470.5);
    assert_eq!(body["paid_amount"], 0.0);
    assert_eq!(body["balance"], 9470.5);
    assert_eq!(body["items"][0]["description"], "Sound system");
    assert_eq!(body["items"][0]["subtotal"], 240.0);
    assert_eq!(body["dinner_package"]["package_name"], "Prosperity Set");
    assert_eq!(body["payment_summary"]["payment_status"], "unpaid");

    let code = body["booking_code"].as_str().unwrap();
    assert!(code.starts_with("BK"));
    assert!(code.ends_with("0001"));
}

#[tokio::test]
async fn test_package_below_min_tables() {
    let f = fixture().await;
    let package = f.app.create_dinner_package(&f.token, 888.0, 10).await;
    let (status, body) = f
        .app
        .post(
            "/api/bookings",
            &f.token,
            json!({
                "customer_id": f.customer,
                "hall_id": f.hall,
                "event_date": days_from_today(60),
                "time_slot": "evening",
                "dinner_package": { "dinner_package_id": package, "table_count": 8 },
            }),
        )
        .await;
    assert_error(status, &body, ErrorCode::DinnerPackageBelowMinTables);
    assert_eq!(body["details"]["min_tables"], 10);
}

#[tokio::test]
async fn test_slot_conflicts() {
    let f = fixture().await;
    let (status, first) = f.book(30, "evening").await;
    assert_eq!(status, StatusCode::OK, "{first}");

    let (status, body) = f.book(30, "evening").await;
    assert_error(status, &body, ErrorCode::BookingSlotTaken);
    assert_eq!(body["details"]["booking_code"], first["booking_code"]);

    let (status, body) = f.book(30, "full_day").await;
    assert_error(status, &body, ErrorCode::BookingSlotTaken);

    let (status, _) = f.book(30, "morning").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = f.book(31, "evening").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_full_day_blocks_every_slot() {
    let f = fixture().await;
    let (status, _) = f.book(30, "full_day").await;
    assert_eq!(status, StatusCode::OK);
    for slot in ["morning", "afternoon", "evening"] {
        let (status, body) = f.book(30, slot).await;
        assert_error(status, &body, ErrorCode::BookingSlotTaken);
    }
}

#[tokio::test]
async fn test_cancelled_booking_frees_slot() {
    let f = fixture().await;
    let (_, first) = f.book(30, "evening").await;
    let id = first["id"].as_i64().unwrap();

    let (status, body) = f
        .app
        .put(&format!("/api/bookings/{id}"), &f.token, json!({ "status": "cancelled" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "cancelled");

    let (status, _) = f.book(30, "evening").await;
    assert_eq!(status, StatusCode::OK);

    // terminal bookings are frozen
    let (status, body) = f
        .app
        .put(&format!("/api/bookings/{id}"), &f.token, json!({ "status": "pending" }))
        .await;
    assert_error(status, &body, ErrorCode::BookingCancelled);

    let (status, body) = f.pay(id, 100.0).await;
    assert_error(status, &body, ErrorCode::BookingCancelled);
}

#[tokio::test]
async fn test_status_transitions() {
    let f = fixture().await;
    let (_, booking) = f.book(30, "evening").await;
    let id = booking["id"].as_i64().unwrap();
    let uri = format!("/api/bookings/{id}");

    let (status, body) = f.app.put(&uri, &f.token, json!({ "status": "completed" })).await;
    assert_error(status, &body, ErrorCode::BookingInvalidStatus);

    let (status, _) = f.app.put(&uri, &f.token, json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = f.app.put(&uri, &f.token, json!({ "status": "completed" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = f.app.put(&uri, &f.token, json!({ "notes": "late edit" })).await;
    assert_error(status, &body, ErrorCode::BookingCompleted);
}

#[tokio::test]
async fn test_past_event_date_rejected() {
    let f = fixture().await;
    let (status, body) = f.book(-1, "morning").await;
    assert_error(status, &body, ErrorCode::BookingDateInPast);
}

#[tokio::test]
async fn test_inactive_hall_cannot_be_booked() {
    let f = fixture().await;
    let (status, _) = f
        .app
        .put(&format!("/api/halls/{}", f.hall), &f.token, json!({ "is_active": false }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = f.book(30, "morning").await;
    assert_error(status, &body, ErrorCode::HallInactive);
}

#[tokio::test]
async fn test_moving_booking_onto_taken_slot() {
    let f = fixture().await;
    f.book(30, "morning").await;
    let (_, evening) = f.book(30, "evening").await;
    let id = evening["id"].as_i64().unwrap();

    let (status, body) = f
        .app
        .put(&format!("/api/bookings/{id}"), &f.token, json!({ "time_slot": "morning" }))
        .await;
    assert_error(status, &body, ErrorCode::BookingSlotTaken);

    // unchanged slot does not clash with itself
    let (status, _) = f
        .app
        .put(&format!("/api/bookings/{id}"), &f.token, json!({ "guest_count": 300 }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_payments_recompute_balance() {
    let f = fixture().await;
    let (_, booking) = f.book(30, "evening").await;
    let id = booking["id"].as_i64().unwrap();

    let (status, payment) = f.pay(id, 500.0).await;
    assert_eq!(status, StatusCode::OK, "{payment}");
    assert!(payment["payment_code"].as_str().unwrap().starts_with("PAY"));
    assert_eq!(payment["booking_code"], booking["booking_code"]);

    let detail = f.booking(id).await;
    assert_eq!(detail["paid_amount"], 500.0);
    assert_eq!(detail["balance"], 1500.0);
    assert_eq!(detail["payment_summary"]["payment_status"], "partial");
    assert_eq!(detail["payments"].as_array().unwrap().len(), 1);

    let (status, body) = f.pay(id, 1500.01).await;
    assert_error(status, &body, ErrorCode::PaymentExceedsBalance);

    let (status, body) = f.pay(id, 0.0).await;
    assert_error(status, &body, ErrorCode::PaymentInvalidAmount);

    let payment_id = payment["id"].as_i64().unwrap();
    let (status, _) = f
        .app
        .put(
            &format!("/api/payments/{payment_id}"),
            &f.token,
            json!({ "amount": 2000.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let detail = f.booking(id).await;
    assert_eq!(detail["balance"], 0.0);
    assert_eq!(detail["payment_summary"]["payment_status"], "paid");

    let (status, _) = f
        .app
        .delete(&format!("/api/payments/{payment_id}"), &f.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let detail = f.booking(id).await;
    assert_eq!(detail["paid_amount"], 0.0);
    assert_eq!(detail["balance"], 2000.0);
}

#[tokio::test]
async fn test_fractional_payments_settle_to_cents() {
    let f = fixture().await;
    let (_, booking) = f.book(30, "evening").await;
    let id = booking["id"].as_i64().unwrap();

    for amount in [0.1, 0.2] {
        let (status, body) = f.pay(id, amount).await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let detail = f.booking(id).await;
    assert_eq!(detail["paid_amount"], 0.3);
    assert_eq!(detail["balance"], 1999.7);

    let (_, dashboard) = f.app.get("/api/dashboard", &f.token).await;
    assert_eq!(dashboard["collected_this_month"], 0.3);
    assert_eq!(dashboard["outstanding_balance"], 1999.7);
}

#[tokio::test]
async fn test_update_clears_booking_and_payment_text() {
    let f = fixture().await;
    let (_, booking) = f.book(30, "evening").await;
    let id = booking["id"].as_i64().unwrap();

    let (status, body) = f
        .app
        .put(
            &format!("/api/bookings/{id}"),
            &f.token,
            json!({ "notes": "Stage on the north side" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["notes"], "Stage on the north side");

    let (status, body) = f
        .app
        .put(
            &format!("/api/bookings/{id}"),
            &f.token,
            json!({ "notes": null, "event_type": null }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["notes"].is_null());
    assert!(body["event_type"].is_null());
    assert_eq!(body["guest_count"], 250);

    let (status, payment) = f
        .app
        .post(
            "/api/payments",
            &f.token,
            json!({ "booking_id": id, "amount": 100.0, "method": "bank_transfer", "reference": "TXN-881" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{payment}");
    let payment_id = payment["id"].as_i64().unwrap();

    let (status, body) = f
        .app
        .put(
            &format!("/api/payments/{payment_id}"),
            &f.token,
            json!({ "reference": null }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["reference"].is_null());
    assert_eq!(body["method"], "bank_transfer");
}

#[tokio::test]
async fn test_total_cannot_drop_below_paid() {
    let f = fixture().await;
    let (_, booking) = f.book(30, "evening").await;
    let id = booking["id"].as_i64().unwrap();
    f.pay(id, 1500.0).await;

    let (status, body) = f
        .app
        .put(
            &format!("/api/bookings/{id}"),
            &f.token,
            json!({ "items": [
                { "description": "Hall rental", "quantity": 1, "unit_price": 1000.0 }
            ] }),
        )
        .await;
    assert_error(status, &body, ErrorCode::BookingTotalBelowPaid);

    let (status, body) = f
        .app
        .put(
            &format!("/api/bookings/{id}"),
            &f.token,
            json!({ "items": [
                { "description": "Hall rental", "quantity": 1, "unit_price": 2500.0 }
            ] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total_amount"], 2500.0);
    assert_eq!(body["balance"], 1000.0);
}

#[tokio::test]
async fn test_booking_with_payments_cannot_be_deleted() {
    let f = fixture().await;
    let (_, booking) = f.book(30, "evening").await;
    let id = booking["id"].as_i64().unwrap();
    f.pay(id, 100.0).await;

    let (status, body) = f.app.delete(&format!("/api/bookings/{id}"), &f.token).await;
    assert_error(status, &body, ErrorCode::BookingHasPayments);

    let (_, other) = f.book(31, "evening").await;
    let other = other["id"].as_i64().unwrap();
    let (status, _) = f.app.delete(&format!("/api/bookings/{other}"), &f.token).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = f.app.get(&format!("/api/bookings/{other}"), &f.token).await;
    assert_error(status, &body, ErrorCode::BookingNotFound);
}

#[tokio::test]
async fn test_payments_due_report_and_dashboard() {
    let f = fixture().await;
    // due 14 days before the event: already overdue
    let (_, soon) = f.book(5, "evening").await;
    // due in 66 days: not reported
    let (_, later) = f.book(80, "evening").await;

    let (status, body) = f.app.get("/api/payments/due", &f.token).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["booking_id"], soon["id"]);
    assert_eq!(entries[0]["summary"]["due_status"], "overdue");

    let (status, body) = f.app.get("/api/payments/due?within_days=3", &f.token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    f.pay(soon["id"].as_i64().unwrap(), 2000.0).await;
    let (_, body) = f.app.get("/api/payments/due", &f.token).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, dashboard) = f.app.get("/api/dashboard", &f.token).await;
    assert_eq!(status, StatusCode::OK, "{dashboard}");
    assert_eq!(dashboard["customer_count"], 1);
    assert_eq!(dashboard["active_hall_count"], 1);
    assert_eq!(dashboard["outstanding_balance"], 2000.0);
    assert_eq!(dashboard["collected_this_month"], 2000.0);
    let upcoming = dashboard["upcoming_bookings"].as_array().unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0]["id"], soon["id"]);
    assert_ne!(upcoming[0]["id"], later["id"]);
}
