//! Integration tests for the MarVera cart service
//!
//! These tests drive the full router: catalog lookups, session-scoped cart
//! mutations, the checkout wizard, submission against simulated gateways,
//! and the notification queue.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures_util::future::join;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`

use marvera_cart::cart::AppState;
use marvera_cart::checkout::gateway::{DecliningGateway, SimulatedGateway};
use marvera_cart::router::create_app_router;

/// Test app backed by an instantly-approving gateway.
fn create_test_app() -> axum::Router {
    let state = Arc::new(AppState::with_gateway(Arc::new(SimulatedGateway::instant())));
    create_app_router(state)
}

/// Sends a JSON request with an optional session cookie.
async fn send_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    session: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header("cookie", format!("cart_session={session}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

/// Adds `quantity` of a product to the given session's cart.
async fn add_item(app: &axum::Router, session: &str, product_id: &str, quantity: u32) -> Value {
    let (status, body) = send_request(
        app,
        "POST",
        "/cart/items",
        Some(json!({ "productId": product_id, "quantity": quantity })),
        Some(session),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

/// Walks a session's checkout to the confirmation step.
async fn checkout_to_confirm(app: &axum::Router, session: &str) {
    let (status, _) = send_request(app, "POST", "/checkout", None, Some(session)).await;
    assert_eq!(status, StatusCode::OK);
    send_request(app, "POST", "/checkout/next", None, Some(session)).await;
    let (_, view) = send_request(app, "POST", "/checkout/next", None, Some(session)).await;
    assert_eq!(view["stepNumber"], 3);
}

#[tokio::test]
async fn test_catalog_listing() {
    let app = create_test_app();

    let (status, body) = send_request(&app, "GET", "/products", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let products = body.as_array().unwrap();
    assert!(products.len() >= 5);
    assert!(products.iter().all(|p| p["id"].is_string() && p["price"].is_i64()));
}

#[tokio::test]
async fn test_catalog_unknown_product() {
    let app = create_test_app();

    let (status, body) = send_request(&app, "GET", "/products/no-such-fish", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("no-such-fish"));
}

#[tokio::test]
async fn test_add_to_cart_merges_lines() {
    let app = create_test_app();

    add_item(&app, "s1", "ostion-kumamoto", 2).await;
    let cart = add_item(&app, "s1", "ostion-kumamoto", 3).await;

    let lines = cart["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 5);
    assert_eq!(cart["itemCount"], 5);
    // 5 × 25.00 = 125.00
    assert_eq!(cart["total"], 12_500);
}

#[tokio::test]
async fn test_add_unknown_product_is_rejected() {
    let app = create_test_app();

    let (status, _) = send_request(
        &app,
        "POST",
        "/cart/items",
        Some(json!({ "productId": "no-such-fish" })),
        Some("s1"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_unavailable_product_is_rejected() {
    let app = create_test_app();

    let (status, body) = send_request(
        &app,
        "POST",
        "/cart/items",
        Some(json!({ "productId": "callo-de-hacha" })),
        Some("s1"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("unavailable"));
}

#[tokio::test]
async fn test_set_quantity_zero_removes_line() {
    let app = create_test_app();

    add_item(&app, "s1", "pulpo-entero", 4).await;
    let (status, cart) = send_request(
        &app,
        "PUT",
        "/cart/items/pulpo-entero",
        Some(json!({ "quantity": 0 })),
        Some("s1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(cart["lines"].as_array().unwrap().is_empty());
    assert_eq!(cart["total"], 0);
    assert_eq!(cart["itemCount"], 0);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let app = create_test_app();

    add_item(&app, "s1", "pulpo-entero", 1).await;

    let (status1, cart1) =
        send_request(&app, "DELETE", "/cart/items/pulpo-entero", None, Some("s1")).await;
    assert_eq!(status1, StatusCode::OK);
    assert!(cart1["lines"].as_array().unwrap().is_empty());

    // Removing again is not an error and leaves the same empty cart.
    let (status2, cart2) =
        send_request(&app, "DELETE", "/cart/items/pulpo-entero", None, Some("s1")).await;
    assert_eq!(status2, StatusCode::OK);
    assert_eq!(cart1, cart2);
}

#[tokio::test]
async fn test_toggle_only_flips_visibility() {
    let app = create_test_app();

    add_item(&app, "s1", "pulpo-entero", 2).await;
    let (_, cart) = send_request(&app, "POST", "/cart/toggle", None, Some("s1")).await;

    assert_eq!(cart["isOpen"], true);
    assert_eq!(cart["itemCount"], 2);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = create_test_app();

    add_item(&app, "cliente-a", "salmon-fresco", 1).await;
    let (_, cart_b) = send_request(&app, "GET", "/cart", None, Some("cliente-b")).await;

    assert!(cart_b["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_new_session_gets_a_cookie() {
    let app = create_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/cart")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("cart_session="));
}

#[tokio::test]
async fn test_checkout_requires_a_non_empty_cart() {
    let app = create_test_app();

    let (status, body) = send_request(&app, "POST", "/checkout", None, Some("s1")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_checkout_totals_with_express_delivery() {
    let app = create_test_app();

    // 2 × 25.00 = 50.00 subtotal
    add_item(&app, "s1", "ostion-kumamoto", 2).await;
    send_request(&app, "POST", "/checkout", None, Some("s1")).await;

    let (status, view) = send_request(
        &app,
        "PUT",
        "/checkout/form",
        Some(json!({ "deliveryOption": "express" })),
        Some("s1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 50.00 + 150.00 + 16% of 50.00 = 208.00
    assert_eq!(view["totals"]["subtotal"], 5_000);
    assert_eq!(view["totals"]["deliveryFee"], 15_000);
    assert_eq!(view["totals"]["tax"], 800);
    assert_eq!(view["totals"]["finalTotal"], 20_800);
}

#[tokio::test]
async fn test_checkout_steps_clamp() {
    let app = create_test_app();

    add_item(&app, "s1", "ostion-kumamoto", 1).await;
    send_request(&app, "POST", "/checkout", None, Some("s1")).await;

    // previous at step 1 stays at step 1
    let (_, view) = send_request(&app, "POST", "/checkout/previous", None, Some("s1")).await;
    assert_eq!(view["stepNumber"], 1);

    send_request(&app, "POST", "/checkout/next", None, Some("s1")).await;
    send_request(&app, "POST", "/checkout/next", None, Some("s1")).await;
    // next at step 3 stays at step 3, no auto-submit
    let (_, view) = send_request(&app, "POST", "/checkout/next", None, Some("s1")).await;
    assert_eq!(view["stepNumber"], 3);
    assert_eq!(view["completed"], false);
}

#[tokio::test]
async fn test_submit_before_confirmation_is_rejected() {
    let app = create_test_app();

    add_item(&app, "s1", "ostion-kumamoto", 1).await;
    send_request(&app, "POST", "/checkout", None, Some("s1")).await;

    let (status, body) = send_request(&app, "POST", "/checkout/submit", None, Some("s1")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("confirmation"));
}

#[tokio::test]
async fn test_successful_submit_clears_cart_and_session() {
    let app = create_test_app();

    add_item(&app, "s1", "ostion-kumamoto", 2).await;
    checkout_to_confirm(&app, "s1").await;

    let (status, receipt) = send_request(&app, "POST", "/checkout/submit", None, Some("s1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(receipt["orderId"].is_string());
    // Standard delivery by default: 50.00 + 50.00 + 8.00
    assert_eq!(receipt["amount"], 10_800);

    // The cart was cleared exactly once.
    let (_, cart) = send_request(&app, "GET", "/cart", None, Some("s1")).await;
    assert!(cart["lines"].as_array().unwrap().is_empty());
    assert_eq!(cart["total"], 0);

    // The session is torn down after completion.
    let (status, _) = send_request(&app, "GET", "/checkout", None, Some("s1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Confirmation landed in the notification queue.
    let (_, notifications) = send_request(&app, "GET", "/notifications", None, Some("s1")).await;
    let messages: Vec<&str> = notifications
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["message"].as_str().unwrap())
        .collect();
    assert!(messages.iter().any(|m| m.contains("confirmed")));
}

#[tokio::test]
async fn test_double_submit_runs_the_charge_once() {
    let state = Arc::new(AppState::with_gateway(Arc::new(SimulatedGateway {
        latency: Duration::from_millis(200),
    })));
    let app = create_app_router(state);

    add_item(&app, "s1", "ostion-kumamoto", 2).await;
    checkout_to_confirm(&app, "s1").await;

    let first = send_request(&app, "POST", "/checkout/submit", None, Some("s1"));
    let second = send_request(&app, "POST", "/checkout/submit", None, Some("s1"));
    let ((status_a, body_a), (status_b, body_b)) = join(first, second).await;

    // Exactly one submission wins; the other is rejected by the guard.
    let outcomes = [(status_a, &body_a), (status_b, &body_b)];
    assert_eq!(
        outcomes.iter().filter(|(s, _)| *s == StatusCode::OK).count(),
        1
    );
    assert_eq!(
        outcomes
            .iter()
            .filter(|(s, _)| *s == StatusCode::CONFLICT)
            .count(),
        1
    );

    // The cart was cleared at most once and stays empty.
    let (_, cart) = send_request(&app, "GET", "/cart", None, Some("s1")).await;
    assert!(cart["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_declined_payment_leaves_cart_and_session_retryable() {
    let state = Arc::new(AppState::with_gateway(Arc::new(DecliningGateway)));
    let app = create_app_router(state);

    add_item(&app, "s1", "ostion-kumamoto", 2).await;
    checkout_to_confirm(&app, "s1").await;

    let (status, body) = send_request(&app, "POST", "/checkout/submit", None, Some("s1")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("declined"));

    // Cart untouched.
    let (_, cart) = send_request(&app, "GET", "/cart", None, Some("s1")).await;
    assert_eq!(cart["itemCount"], 2);

    // Session still at confirmation, not submitting: retry is possible.
    let (status, view) = send_request(&app, "GET", "/checkout", None, Some("s1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["stepNumber"], 3);
    assert_eq!(view["submitting"], false);
    assert_eq!(view["completed"], false);

    // Failure surfaced through the notification queue.
    let (_, notifications) = send_request(&app, "GET", "/notifications", None, Some("s1")).await;
    assert!(notifications
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["severity"] == "error"));
}

#[tokio::test]
async fn test_abandon_checkout_keeps_the_cart() {
    let app = create_test_app();

    add_item(&app, "s1", "salmon-fresco", 1).await;
    send_request(&app, "POST", "/checkout", None, Some("s1")).await;

    let (status, _) = send_request(&app, "DELETE", "/checkout", None, Some("s1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_request(&app, "GET", "/checkout", None, Some("s1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, cart) = send_request(&app, "GET", "/cart", None, Some("s1")).await;
    assert_eq!(cart["itemCount"], 1);
}

#[tokio::test]
async fn test_checkout_prefill_from_profile() {
    let app = create_test_app();

    add_item(&app, "s1", "salmon-fresco", 1).await;
    let (status, view) = send_request(
        &app,
        "POST",
        "/checkout",
        Some(json!({
            "profile": { "name": "Ana Torres", "email": "ana@example.com", "phone": "5550001111" }
        })),
        Some("s1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["stepNumber"], 1);
    // Card data never appears in checkout views.
    assert!(view.get("cardNumber").is_none());
    assert!(view.get("cvv").is_none());
}

#[tokio::test]
async fn test_notification_dismissal() {
    let app = create_test_app();

    add_item(&app, "s1", "jaiba-suave", 1).await;

    let (_, notifications) = send_request(&app, "GET", "/notifications", None, Some("s1")).await;
    let list = notifications.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["severity"], "success");
    let id = list[0]["id"].as_u64().unwrap();

    let (status, _) =
        send_request(&app, "DELETE", &format!("/notifications/{id}"), None, Some("s1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Dismissing again is a no-op, not an error.
    let (status, _) =
        send_request(&app, "DELETE", &format!("/notifications/{id}"), None, Some("s1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, notifications) = send_request(&app, "GET", "/notifications", None, Some("s1")).await;
    assert!(notifications.as_array().unwrap().is_empty());
}
