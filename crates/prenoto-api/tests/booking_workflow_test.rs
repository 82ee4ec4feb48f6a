mod helpers;

use helpers::{bookable_date, create_service, register_business, setup_test_app};

/// End-to-end public booking: one submission creates exactly one booking row
/// with status pending, linked to exactly one customer row with the raw
/// phone string.
#[tokio::test]
async fn test_public_booking_end_to_end() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Salone da Anna").await;
    let service_id = create_service(&app, &business, "Taglio", 30, "25.00").await;

    let date = bookable_date();

    // The slot list offers 10:00 for a 30-minute service over 9-19 hours.
    let slots_response = app
        .client()
        .get(&format!(
            "/api/v1/public/{}/slots?service_id={}&date={}",
            business.slug, service_id, date
        ))
        .await;
    assert_eq!(slots_response.status_code(), 200);
    let slots: serde_json::Value = slots_response.json();
    let offered: Vec<&str> = slots["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert_eq!(offered.first().copied(), Some("09:00"));
    assert!(offered.contains(&"10:00"));
    assert!(!offered.contains(&"19:00"), "closing hour is exclusive");

    let response = app
        .client()
        .post(&format!("/api/v1/public/{}/bookings", business.slug))
        .json(&serde_json::json!({
            "service_id": service_id,
            "booking_date": date,
            "booking_time": "10:00:00",
            "name": "Mario Rossi",
            "phone": "3331234567"
        }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());

    let confirmation: serde_json::Value = response.json();
    assert_eq!(confirmation["status"], "pending");
    assert_eq!(confirmation["service_name"], "Taglio");
    assert_eq!(confirmation["business_name"], "Salone da Anna");
    assert_eq!(confirmation["customer_phone"], "3331234567");

    let (booking_count, customer_count): (i64, i64) = sqlx::query_as(
        "SELECT (SELECT COUNT(*) FROM bookings WHERE business_id = $1), \
                (SELECT COUNT(*) FROM customers WHERE business_id = $1)",
    )
    .bind(business.business_id)
    .fetch_one(app.pool())
    .await
    .unwrap();
    assert_eq!(booking_count, 1);
    assert_eq!(customer_count, 1);

    let (status, phone): (String, String) = sqlx::query_as(
        "SELECT b.status::text, c.phone FROM bookings b \
         JOIN customers c ON c.id = b.customer_id WHERE b.business_id = $1",
    )
    .bind(business.business_id)
    .fetch_one(app.pool())
    .await
    .unwrap();
    assert_eq!(status, "pending");
    assert_eq!(phone, "3331234567");
}

/// Resolving the same exact phone string twice returns the same customer
/// row; no duplicate is created.
#[tokio::test]
async fn test_same_phone_reuses_customer() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Barber Bros").await;
    let service_id = create_service(&app, &business, "Barba", 30, "15.00").await;
    let date = bookable_date();

    for time in ["10:00:00", "11:00:00"] {
        let response = app
            .client()
            .post(&format!("/api/v1/public/{}/bookings", business.slug))
            .json(&serde_json::json!({
                "service_id": service_id,
                "booking_date": date,
                "booking_time": time,
                "name": "Mario Rossi",
                "phone": "3331234567"
            }))
            .await;
        assert_eq!(response.status_code(), 201, "{}", response.text());
    }

    let customer_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE business_id = $1")
            .bind(business.business_id)
            .fetch_one(app.pool())
            .await
            .unwrap();
    assert_eq!(customer_count, 1);

    let distinct_customers: i64 =
        sqlx::query_scalar("SELECT COUNT(DISTINCT customer_id) FROM bookings WHERE business_id = $1")
            .bind(business.business_id)
            .fetch_one(app.pool())
            .await
            .unwrap();
    assert_eq!(distinct_customers, 1);
}

/// Customer identity is the exact string: punctuation variants of the same
/// number stay two distinct customers. Documented behavior, not a bug.
#[tokio::test]
async fn test_phone_punctuation_variants_stay_distinct() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Centro Estetico Luna").await;
    let service_id = create_service(&app, &business, "Manicure", 30, "20.00").await;
    let date = bookable_date();

    for (time, phone) in [("10:00:00", "333-1234567"), ("11:00:00", "3331234567")] {
        let response = app
            .client()
            .post(&format!("/api/v1/public/{}/bookings", business.slug))
            .json(&serde_json::json!({
                "service_id": service_id,
                "booking_date": date,
                "booking_time": time,
                "name": "Mario Rossi",
                "phone": phone
            }))
            .await;
        assert_eq!(response.status_code(), 201, "{}", response.text());
    }

    let customer_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE business_id = $1")
            .bind(business.business_id)
            .fetch_one(app.pool())
            .await
            .unwrap();
    assert_eq!(customer_count, 2);
}

/// A second submission for an overlapping window is rejected and writes no
/// second row.
#[tokio::test]
async fn test_overlapping_booking_rejected() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Spa Serenity").await;
    let service_id = create_service(&app, &business, "Massaggio", 60, "50.00").await;
    let date = bookable_date();

    let first = app
        .client()
        .post(&format!("/api/v1/public/{}/bookings", business.slug))
        .json(&serde_json::json!({
            "service_id": service_id,
            "booking_date": date,
            "booking_time": "10:00:00",
            "name": "Mario Rossi",
            "phone": "3331234567"
        }))
        .await;
    assert_eq!(first.status_code(), 201, "{}", first.text());

    // Identical slot, different customer.
    let second = app
        .client()
        .post(&format!("/api/v1/public/{}/bookings", business.slug))
        .json(&serde_json::json!({
            "service_id": service_id,
            "booking_date": date,
            "booking_time": "10:00:00",
            "name": "Luca Bianchi",
            "phone": "3347654321"
        }))
        .await;
    assert_eq!(second.status_code(), 409, "{}", second.text());
    let body: serde_json::Value = second.json();
    assert_eq!(body["code"], "SLOT_UNAVAILABLE");

    let booking_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE business_id = $1")
            .bind(business.business_id)
            .fetch_one(app.pool())
            .await
            .unwrap();
    assert_eq!(booking_count, 1);
}

/// Booked windows disappear from the public slot list, and cancelling the
/// booking releases them.
#[tokio::test]
async fn test_slots_exclude_booked_windows() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Nails and More").await;
    let service_id = create_service(&app, &business, "Gel", 60, "35.00").await;
    let date = bookable_date();

    let response = app
        .client()
        .post(&format!("/api/v1/public/{}/bookings", business.slug))
        .json(&serde_json::json!({
            "service_id": service_id,
            "booking_date": date,
            "booking_time": "10:00:00",
            "name": "Mario Rossi",
            "phone": "3331234567"
        }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    let booking_id = response.json::<serde_json::Value>()["booking_id"]
        .as_str()
        .unwrap()
        .to_string();

    let slots_url = format!(
        "/api/v1/public/{}/slots?service_id={}&date={}",
        business.slug, service_id, date
    );

    let slots: serde_json::Value = app.client().get(&slots_url).await.json();
    let offered: Vec<String> = slots["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap().to_string())
        .collect();
    assert!(!offered.contains(&"10:00".to_string()));
    assert!(offered.contains(&"09:00".to_string()));
    assert!(offered.contains(&"11:00".to_string()));

    // Cancel from the dashboard and the window frees up again.
    let cancel = app
        .client()
        .put(&format!("/api/v1/bookings/{booking_id}/status"))
        .add_header("Authorization", format!("Bearer {}", business.token))
        .json(&serde_json::json!({"status": "cancelled"}))
        .await;
    assert_eq!(cancel.status_code(), 200, "{}", cancel.text());

    let slots: serde_json::Value = app.client().get(&slots_url).await.json();
    let offered: Vec<String> = slots["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap().to_string())
        .collect();
    assert!(offered.contains(&"10:00".to_string()));
}

/// When the business enables auto-confirm, public bookings start confirmed
/// instead of pending.
#[tokio::test]
async fn test_auto_confirm_setting_is_honored() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Studio Zen").await;
    let service_id = create_service(&app, &business, "Shiatsu", 45, "40.00").await;

    let update = app
        .client()
        .put("/api/v1/settings")
        .add_header("Authorization", format!("Bearer {}", business.token))
        .json(&serde_json::json!({"auto_confirm_bookings": true}))
        .await;
    assert_eq!(update.status_code(), 200, "{}", update.text());

    let response = app
        .client()
        .post(&format!("/api/v1/public/{}/bookings", business.slug))
        .json(&serde_json::json!({
            "service_id": service_id,
            "booking_date": bookable_date(),
            "booking_time": "09:45:00",
            "name": "Mario Rossi",
            "phone": "3331234567"
        }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    assert_eq!(response.json::<serde_json::Value>()["status"], "confirmed");
}

/// Dates outside [today, today + advance_booking_days] are rejected for
/// both slot listing and submission.
#[tokio::test]
async fn test_booking_window_enforced() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Salone Vera").await;
    let service_id = create_service(&app, &business, "Piega", 30, "18.00").await;

    let too_far = chrono::Utc::now().date_naive() + chrono::Duration::days(45);
    let past = chrono::Utc::now().date_naive() - chrono::Duration::days(1);

    for date in [too_far, past] {
        let slots = app
            .client()
            .get(&format!(
                "/api/v1/public/{}/slots?service_id={}&date={}",
                business.slug, service_id, date
            ))
            .await;
        assert_eq!(slots.status_code(), 400, "slots for {date}");

        let submit = app
            .client()
            .post(&format!("/api/v1/public/{}/bookings", business.slug))
            .json(&serde_json::json!({
                "service_id": service_id,
                "booking_date": date,
                "booking_time": "10:00:00",
                "name": "Mario Rossi",
                "phone": "3331234567"
            }))
            .await;
        assert_eq!(submit.status_code(), 400, "submit for {date}");
    }
}

/// Required fields are enforced server-side, not only by UI widgets.
#[tokio::test]
async fn test_missing_required_fields_rejected() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Barberia Nord").await;
    let service_id = create_service(&app, &business, "Taglio", 30, "22.00").await;

    // Empty name
    let response = app
        .client()
        .post(&format!("/api/v1/public/{}/bookings", business.slug))
        .json(&serde_json::json!({
            "service_id": service_id,
            "booking_date": bookable_date(),
            "booking_time": "10:00:00",
            "name": "",
            "phone": "3331234567"
        }))
        .await;
    assert_eq!(response.status_code(), 400);

    // Nonsense phone
    let response = app
        .client()
        .post(&format!("/api/v1/public/{}/bookings", business.slug))
        .json(&serde_json::json!({
            "service_id": service_id,
            "booking_date": bookable_date(),
            "booking_time": "10:00:00",
            "name": "Mario Rossi",
            "phone": "not a phone"
        }))
        .await;
    assert_eq!(response.status_code(), 400);

    let booking_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE business_id = $1")
            .bind(business.business_id)
            .fetch_one(app.pool())
            .await
            .unwrap();
    assert_eq!(booking_count, 0);
}

/// Unknown slugs 404 on every public endpoint.
#[tokio::test]
async fn test_unknown_slug_not_found() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/v1/public/no-such-business").await;
    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "BUSINESS_NOT_FOUND");
}
