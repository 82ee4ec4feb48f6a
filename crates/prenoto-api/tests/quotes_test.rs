mod helpers;

use helpers::{register_business, setup_test_app, TestApp, TestBusiness};
use uuid::Uuid;

async fn create_customer(app: &TestApp, business: &TestBusiness, name: &str, phone: &str) -> Uuid {
    let response = app
        .client()
        .post("/api/v1/customers")
        .add_header("Authorization", format!("Bearer {}", business.token))
        .json(&serde_json::json!({ "name": name, "phone": phone }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<serde_json::Value>()["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap()
}

/// Quote creation: generated number, item ordering, totals fixed at
/// creation time.
#[tokio::test]
async fn test_create_quote_with_items() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Salone da Anna").await;
    let customer_id = create_customer(&app, &business, "Mario Rossi", "3331234567").await;

    let response = app
        .client()
        .post("/api/v1/quotes")
        .add_header("Authorization", format!("Bearer {}", business.token))
        .json(&serde_json::json!({
            "customer_id": customer_id,
            "expiry_days": 15,
            "notes": "Pacchetto sposa",
            "items": [
                { "description": "Piega", "quantity": 2, "unit_price": 18.50 },
                { "description": "Trucco", "quantity": 1, "unit_price": 60.00 }
            ]
        }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());

    let quote: serde_json::Value = response.json();
    assert_eq!(quote["status"], "draft");
    let number = quote["quote_number"].as_str().unwrap();
    assert!(number.starts_with("Q-"), "{number}");
    assert!(number.ends_with("-0001"), "{number}");

    // 2 x 18.50 + 1 x 60.00
    assert_eq!(quote["subtotal"].as_f64().unwrap(), 97.0);
    assert_eq!(quote["total"].as_f64().unwrap(), 97.0);

    let items = quote["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["description"], "Piega");
    assert_eq!(items[0]["total"].as_f64().unwrap(), 37.0);
    assert_eq!(items[1]["description"], "Trucco");

    // Second quote in the same year gets the next number.
    let response = app
        .client()
        .post("/api/v1/quotes")
        .add_header("Authorization", format!("Bearer {}", business.token))
        .json(&serde_json::json!({
            "customer_id": customer_id,
            "items": [{ "description": "Taglio", "quantity": 1, "unit_price": 25.00 }]
        }))
        .await;
    assert_eq!(response.status_code(), 201);
    let second: serde_json::Value = response.json();
    assert!(second["quote_number"].as_str().unwrap().ends_with("-0002"));
}

/// draft -> sent -> accepted; skipping or reversing steps is rejected.
#[tokio::test]
async fn test_quote_status_transitions() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Barber Bros").await;
    let customer_id = create_customer(&app, &business, "Luca Bianchi", "3347654321").await;

    let quote: serde_json::Value = app
        .client()
        .post("/api/v1/quotes")
        .add_header("Authorization", format!("Bearer {}", business.token))
        .json(&serde_json::json!({
            "customer_id": customer_id,
            "items": [{ "description": "Barba", "quantity": 1, "unit_price": 15.00 }]
        }))
        .await
        .json();
    let quote_id = quote["id"].as_str().unwrap().to_string();

    let status_url = format!("/api/v1/quotes/{quote_id}/status");

    // draft -> accepted is not allowed
    let skip = app
        .client()
        .put(&status_url)
        .add_header("Authorization", format!("Bearer {}", business.token))
        .json(&serde_json::json!({"status": "accepted"}))
        .await;
    assert_eq!(skip.status_code(), 409, "{}", skip.text());

    for status in ["sent", "accepted"] {
        let response = app
            .client()
            .put(&status_url)
            .add_header("Authorization", format!("Bearer {}", business.token))
            .json(&serde_json::json!({ "status": status }))
            .await;
        assert_eq!(response.status_code(), 200, "{}", response.text());
        assert_eq!(response.json::<serde_json::Value>()["status"], status);
    }

    // accepted is terminal
    let reverse = app
        .client()
        .put(&status_url)
        .add_header("Authorization", format!("Bearer {}", business.token))
        .json(&serde_json::json!({"status": "rejected"}))
        .await;
    assert_eq!(reverse.status_code(), 409);

    // The accepted total shows up as revenue in the statistics summary.
    let stats = app
        .client()
        .get("/api/v1/statistics")
        .add_header("Authorization", format!("Bearer {}", business.token))
        .await;
    assert_eq!(stats.status_code(), 200, "{}", stats.text());
    let summary: serde_json::Value = stats.json();
    assert_eq!(summary["customers_total"].as_i64(), Some(1));
    assert_eq!(summary["accepted_quote_revenue"].as_f64(), Some(15.0));
}

/// Only drafts can be deleted.
#[tokio::test]
async fn test_only_drafts_deletable() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Spa Serenity").await;
    let customer_id = create_customer(&app, &business, "Mario Rossi", "3331234567").await;

    async fn create_quote(
        app: &TestApp,
        business: &TestBusiness,
        customer_id: Uuid,
    ) -> serde_json::Value {
        app.client()
            .post("/api/v1/quotes")
            .add_header("Authorization", format!("Bearer {}", business.token))
            .json(&serde_json::json!({
                "customer_id": customer_id,
                "items": [{ "description": "Sauna", "quantity": 1, "unit_price": 30.00 }]
            }))
            .await
            .json::<serde_json::Value>()
    }

    let draft = create_quote(&app, &business, customer_id).await;
    let draft_id = draft["id"].as_str().unwrap();
    let deleted = app
        .client()
        .delete(&format!("/api/v1/quotes/{draft_id}"))
        .add_header("Authorization", format!("Bearer {}", business.token))
        .await;
    assert_eq!(deleted.status_code(), 204);

    let sent = create_quote(&app, &business, customer_id).await;
    let sent_id = sent["id"].as_str().unwrap();
    let response = app
        .client()
        .put(&format!("/api/v1/quotes/{sent_id}/status"))
        .add_header("Authorization", format!("Bearer {}", business.token))
        .json(&serde_json::json!({"status": "sent"}))
        .await;
    assert_eq!(response.status_code(), 200);

    let refused = app
        .client()
        .delete(&format!("/api/v1/quotes/{sent_id}"))
        .add_header("Authorization", format!("Bearer {}", business.token))
        .await;
    assert_eq!(refused.status_code(), 404);
}

/// An empty item list is rejected before any write.
#[tokio::test]
async fn test_quote_requires_items() {
    let app = setup_test_app().await;
    let business = register_business(&app, "Studio Zen").await;
    let customer_id = create_customer(&app, &business, "Mario Rossi", "3331234567").await;

    let response = app
        .client()
        .post("/api/v1/quotes")
        .add_header("Authorization", format!("Bearer {}", business.token))
        .json(&serde_json::json!({ "customer_id": customer_id, "items": [] }))
        .await;
    assert_eq!(response.status_code(), 400);

    let quote_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes WHERE business_id = $1")
        .bind(business.business_id)
        .fetch_one(app.pool())
        .await
        .unwrap();
    assert_eq!(quote_count, 0);
}
