mod helpers;

use helpers::{bookable_date, create_service, register_business, setup_test_app, TestApp,
    TestBusiness};
use uuid::Uuid;

async fn submit_booking(app: &TestApp, business: &TestBusiness, service_id: Uuid) -> Uuid {
    let response = app
        .client()
        .post(&format!("/api/v1/public/{}/bookings", business.slug))
        .json(&serde_json::json!({
            "service_id": service_id,
            "booking_date": bookable_date(),
            "booking_time": "10:00:00",
            "name": "Mario Rossi",
            "phone": "3331234567",
            "notes": "Porta laterale"
        }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<serde_json::Value>()["booking_id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap()
}

async fn change_status(
    app: &TestApp,
    business: &TestBusiness,
    booking_id: Uuid,
    status: &str,
) -> (u16, serde_json::Value) {
    let response = app
        .client()
        .put(&format!("/api/v1/bookings/{booking_id}/status"))
        .add_header("Authorization", format!("Bearer {}", business.token))
        .json(&serde_json::json!({ "status": status }))
        .await;
    let code = response.status_code().as_u16();
    (code, response.json())
}

/// pending -> confirmed -> completed, with only the status (and updated_at)
/// changing along the way.
#[tokio::test]
async fn test_full_lifecycle_to_completed() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Salone da Anna").await;
    let service_id = create_service(&app, &business, "Colore", 60, "45.00").await;
    let booking_id = submit_booking(&app, &business, service_id).await;

    let before: (String, String, Option<String>) = sqlx::query_as(
        "SELECT booking_date::text, booking_time::text, customer_notes \
         FROM bookings WHERE id = $1",
    )
    .bind(booking_id)
    .fetch_one(app.pool())
    .await
    .unwrap();

    let (code, body) = change_status(&app, &business, booking_id, "confirmed").await;
    assert_eq!(code, 200, "{body}");
    assert_eq!(body["status"], "confirmed");

    let (code, body) = change_status(&app, &business, booking_id, "completed").await;
    assert_eq!(code, 200, "{body}");
    assert_eq!(body["status"], "completed");

    let after: (String, String, String, Option<String>) = sqlx::query_as(
        "SELECT status::text, booking_date::text, booking_time::text, customer_notes \
         FROM bookings WHERE id = $1",
    )
    .bind(booking_id)
    .fetch_one(app.pool())
    .await
    .unwrap();
    assert_eq!(after.0, "completed");
    assert_eq!((after.1, after.2, after.3), before, "only status changed");
}

/// Illegal transitions are rejected server-side before any write.
#[tokio::test]
async fn test_illegal_transitions_rejected() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Barber Bros").await;
    let service_id = create_service(&app, &business, "Taglio", 30, "22.00").await;
    let booking_id = submit_booking(&app, &business, service_id).await;

    // pending cannot jump straight to completed or no_show
    for status in ["completed", "no_show"] {
        let (code, body) = change_status(&app, &business, booking_id, status).await;
        assert_eq!(code, 409, "pending -> {status}: {body}");
        assert_eq!(body["code"], "INVALID_STATUS_TRANSITION");
    }

    // cancel, then nothing else is allowed
    let (code, _) = change_status(&app, &business, booking_id, "cancelled").await;
    assert_eq!(code, 200);

    for status in ["pending", "confirmed", "completed", "no_show"] {
        let (code, body) = change_status(&app, &business, booking_id, status).await;
        assert_eq!(code, 409, "cancelled -> {status}: {body}");
    }

    let stored: String = sqlx::query_scalar("SELECT status::text FROM bookings WHERE id = $1")
        .bind(booking_id)
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(stored, "cancelled");
}

/// A confirmed appointment the customer skipped can be marked no_show.
#[tokio::test]
async fn test_confirmed_to_no_show() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Spa Serenity").await;
    let service_id = create_service(&app, &business, "Sauna", 30, "30.00").await;
    let booking_id = submit_booking(&app, &business, service_id).await;

    let (code, _) = change_status(&app, &business, booking_id, "confirmed").await;
    assert_eq!(code, 200);
    let (code, body) = change_status(&app, &business, booking_id, "no_show").await;
    assert_eq!(code, 200, "{body}");
    assert_eq!(body["status"], "no_show");
}

/// Internal notes are dashboard-only and do not touch the status.
#[tokio::test]
async fn test_internal_notes_update() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Studio Zen").await;
    let service_id = create_service(&app, &business, "Shiatsu", 30, "40.00").await;
    let booking_id = submit_booking(&app, &business, service_id).await;

    let response = app
        .client()
        .put(&format!("/api/v1/bookings/{booking_id}/notes"))
        .add_header("Authorization", format!("Bearer {}", business.token))
        .json(&serde_json::json!({"internal_notes": "Cliente abituale"}))
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());

    let body: serde_json::Value = response.json();
    assert_eq!(body["internal_notes"], "Cliente abituale");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["customer_notes"], "Porta laterale");
}
