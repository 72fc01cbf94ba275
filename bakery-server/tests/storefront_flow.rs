//! Customer and order flows through the HTTP API

mod common;

use bakery_server::services::calendar::add_business_days;
use chrono::{Datelike, TimeZone, Utc};
use common::{TestApp, cake_items};
use http::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::json;
use shared::models::{Order, OrderItem, OrderStatus};
use shared::util::now_millis;

const DAY_MS: i64 = 86_400_000;

#[tokio::test]
async fn test_registration_starts_pending() {
    let app = TestApp::new();
    let user = app.register("Ana Díaz", "3001234567").await;

    assert_eq!(user["status"], "pending");
    assert_eq!(user["approved"], false);
    assert!(user["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_duplicate_phone_is_conflict() {
    let app = TestApp::new();
    app.register("Ana Díaz", "3001234567").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/users",
            None,
            Some(json!({ "fullName": "Otra Ana", "phone": " 3001234567 " })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3002);
}

#[tokio::test]
async fn test_registration_requires_name() {
    let app = TestApp::new();
    let (status, body) = app
        .call(
            Method::POST,
            "/users",
            None,
            Some(json!({ "fullName": "  ", "phone": "3001234567" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);
}

#[tokio::test]
async fn test_unapproved_customer_cannot_order() {
    let app = TestApp::new();
    app.register("Ana Díaz", "3001234567").await;

    let (status, body) = app.place_order("3001234567", cake_items(), json!(65000)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3003);

    let (status, _) = app.place_order("3009999999", cake_items(), json!(65000)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_put_approves_customer() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let user = app.register("Ana Díaz", "3001234567").await;

    let (status, body) = app
        .call(Method::PUT, "/users", Some(&token), Some(json!({ "id": user["id"] })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");
    assert_eq!(body["approved"], true);
}

#[tokio::test]
async fn test_unknown_user_status_is_rejected() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let user = app.register("Ana Díaz", "3001234567").await;

    let (status, body) = app
        .call(
            Method::PATCH,
            "/users",
            Some(&token),
            Some(json!({ "id": user["id"], "status": "blocked" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3004);

    let (status, body) = app
        .call(Method::PATCH, "/users", Some(&token), Some(json!({ "id": user["id"] })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);
}

#[tokio::test]
async fn test_order_snapshots_customer_and_checks_total() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let customer = app
        .approved_customer(&token, "Ana Díaz", "3001234567")
        .await;

    let (status, order) = app
        .place_order("3001234567", cake_items(), json!("65000"))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["totalPrice"], 65000.0);
    assert_eq!(order["userId"], customer["id"]);
    assert_eq!(order["userName"], "Ana Díaz");
    assert_eq!(order["userAddress"], "Calle 10 #4-21");

    let (status, body) = app
        .place_order("3001234567", cake_items(), json!(60000))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);

    let (status, body) = app
        .place_order("3001234567", json!([]), json!(0))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);

    let (status, body) = app
        .place_order("3001234567", cake_items(), json!("sesenta"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);
}

#[tokio::test]
async fn test_customer_sees_only_own_orders() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    app.approved_customer(&token, "Ana Díaz", "3001234567").await;
    app.approved_customer(&token, "Luis Pérez", "3107654321").await;

    app.place_order("3001234567", cake_items(), json!(65000)).await;
    app.place_order("3107654321", cake_items(), json!(65000)).await;

    let (status, body) = app
        .call(Method::GET, "/orders?phone=3001234567", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["userPhone"], "3001234567");

    let (_, body) = app.call(Method::GET, "/orders", Some(&token), None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_admin_listings_require_token() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _) = app.call(Method::GET, "/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .call(Method::GET, "/users", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);

    let (status, _) = app
        .call(Method::PUT, "/orders", None, Some(json!({ "id": "x", "status": "processing" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_order_lifecycle_moves_one_step_at_a_time() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    app.approved_customer(&token, "Ana Díaz", "3001234567").await;
    let (_, order) = app.place_order("3001234567", cake_items(), json!(65000)).await;
    let id = order["id"].as_str().unwrap();

    let (status, body) = app.set_order_status(&token, id, "completed").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4005);

    let (status, body) = app.set_order_status(&token, id, "shipped").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4004);

    for next in ["processing", "completed", "archived"] {
        let (status, body) = app.set_order_status(&token, id, next).await;
        assert_eq!(status, StatusCode::OK, "{next}: {body}");
        assert_eq!(body["status"], next);
    }

    let (_, body) = app.call(Method::GET, "/orders", Some(&token), None).await;
    let archived = &body.as_array().unwrap()[0];
    assert_eq!(archived["status"], "archived");
    assert!(archived["archivedAt"].as_i64().is_some());

    let (status, body) = app.set_order_status(&token, "missing", "processing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

fn seeded_order(id: &str, phone: &str, status: OrderStatus, created_at: i64) -> Order {
    Order {
        id: id.into(),
        user_id: None,
        user_name: "Ana Díaz".into(),
        user_phone: phone.into(),
        user_address: "Calle 10 #4-21".into(),
        items: vec![OrderItem {
            id: "torta-chocolate".into(),
            name: "Torta de Chocolate".into(),
            price: Decimal::from(25000),
            quantity: 2,
            image: None,
        }],
        total_price: Decimal::from(50000),
        status,
        created_at,
        archived_at: None,
    }
}

#[tokio::test]
async fn test_old_archived_orders_are_hidden_but_counted() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let now = now_millis();

    // Archived well past the business-day window
    let created_at = now - 20 * DAY_MS;
    let mut stale = seeded_order("stale", "3001234567", OrderStatus::Archived, created_at);
    stale.archived_at = Some(created_at);
    app.store.seed_order(stale);

    // Archived just now
    let mut fresh = seeded_order("fresh", "3001234567", OrderStatus::Archived, now - DAY_MS);
    fresh.archived_at = Some(now);
    app.store.seed_order(fresh);

    let (status, body) = app.call(Method::GET, "/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|o| o["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["fresh"]);

    let when = Utc.timestamp_millis_opt(created_at).unwrap();
    let (status, body) = app
        .call(
            Method::GET,
            &format!("/statistics?month={}&year={}", when.month(), when.year()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let period = &body.as_array().unwrap()[0];
    assert!(period["totalOrders"].as_u64().unwrap() >= 1);
    assert!(
        period["items"]
            .as_array()
            .unwrap()
            .iter()
            .any(|item| item["orderId"] == "stale")
    );
}

#[tokio::test]
async fn test_hide_deadline_counts_business_days() {
    // Friday 2024-03-01 12:00 UTC + 3 business days = Wednesday 2024-03-06
    let friday = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let wednesday = Utc.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap();
    assert_eq!(
        add_business_days(friday.timestamp_millis(), 3),
        wednesday.timestamp_millis()
    );
}

#[tokio::test]
async fn test_statistics_exclude_open_orders() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let now = now_millis();
    app.store
        .seed_order(seeded_order("open", "3001234567", OrderStatus::Pending, now));
    app.store
        .seed_order(seeded_order("done", "3001234567", OrderStatus::Completed, now));

    let when = Utc.timestamp_millis_opt(now).unwrap();
    let (status, body) = app
        .call(
            Method::GET,
            &format!("/statistics?month={}&year={}", when.month(), when.year()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let period = &body.as_array().unwrap()[0];
    assert_eq!(period["totalOrders"], 1);
    assert_eq!(period["totalUnits"], 2);
    assert_eq!(period["totalPrice"], 50000.0);
    assert_eq!(period["id"], format!("{}-{}", when.year(), when.month()));
}

#[tokio::test]
async fn test_oversized_items_are_rejected_and_statistics_stay_readable() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    app.approved_customer(&token, "Ana Díaz", "3001234567").await;

    let (status, body) = app
        .place_order(
            "3001234567",
            json!([{ "id": "1", "name": "Torta", "price": 1e20, "quantity": 10_000_000_000i64 }]),
            json!(0),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4006);

    for _ in 0..2 {
        let (status, body) = app
            .place_order(
                "3001234567",
                json!([{ "id": "1", "name": "Torta", "price": 0, "quantity": i64::MAX }]),
                json!(0),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 4006);
    }

    let when = Utc::now();
    let (status, body) = app
        .call(
            Method::GET,
            &format!("/statistics?month={}&year={}", when.month(), when.year()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_statistics_validation_and_legacy_post() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let (status, body) = app
        .call(Method::GET, "/statistics?month=13&year=2024", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, body) = app
        .call(Method::GET, "/statistics?month=2&year=1999", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = app
        .call(Method::POST, "/statistics", Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Statistics are now calculated in real-time");
}

#[tokio::test]
async fn test_delete_without_cascade_keeps_finished_orders() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let customer = app
        .approved_customer(&token, "Ana Díaz", "3001234567")
        .await;

    let (_, done) = app.place_order("3001234567", cake_items(), json!(65000)).await;
    let done_id = done["id"].as_str().unwrap();
    app.set_order_status(&token, done_id, "processing").await;
    app.set_order_status(&token, done_id, "completed").await;
    app.place_order("3001234567", cake_items(), json!(65000)).await;

    let (status, body) = app
        .call(Method::DELETE, "/users", Some(&token), Some(json!({ "id": customer["id"] })))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["deletedUser"], "Ana Díaz");
    assert_eq!(body["cascade"], false);
    assert_eq!(body["deletedOrders"], 1);
    assert_eq!(body["detachedOrders"], 1);

    let (_, body) = app.call(Method::GET, "/orders", Some(&token), None).await;
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], done_id);
    assert!(orders[0]["userId"].is_null());
    assert_eq!(orders[0]["userName"], "Ana Díaz (usuario borrado)");

    let (status, body) = app
        .call(Method::DELETE, "/users", Some(&token), Some(json!({ "id": customer["id"] })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);
}

#[tokio::test]
async fn test_cascade_delete_removes_every_order() {
    let app = TestApp::new();
    let token = app.admin_token().await;
    let customer = app
        .approved_customer(&token, "Ana Díaz", "3001234567")
        .await;
    app.place_order("3001234567", cake_items(), json!(65000)).await;
    app.place_order("3001234567", cake_items(), json!(65000)).await;

    let (status, body) = app
        .call(
            Method::DELETE,
            "/users",
            Some(&token),
            Some(json!({ "id": customer["id"], "cascade": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedOrders"], 2);
    assert_eq!(body["detachedOrders"], 0);

    let (_, body) = app.call(Method::GET, "/orders", Some(&token), None).await;
    assert_eq!(body, json!([]));
}
