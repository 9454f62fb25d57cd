//! REST API handlers for cart operations
//!
//! Each endpoint resolves the session, applies one reducer action to that
//! session's cart and returns the resulting cart state. Mutations happen
//! under the DashMap entry guard, so a session's cart updates are atomic.

use super::helpers::{attach_session_cookie, resolve_session_id};
use super::models::{AddItemInput, CartState, SetQuantityInput};
use super::reducer::CartAction;
use super::state::SharedState;
use crate::error::ApiError;
use crate::notify::Severity;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};

/// Creates routes for cart operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/cart", get(get_cart))
        .route("/cart/items", post(add_item))
        .route("/cart/items/:product_id", put(set_quantity).delete(remove_item))
        .route("/cart/clear", post(clear_cart))
        .route("/cart/toggle", post(toggle_cart))
}

/// Applies an action to the session's cart and returns the new snapshot.
fn apply_to_cart(state: &SharedState, session_id: &str, action: CartAction) -> CartState {
    let mut cart = state.carts.entry(session_id.to_owned()).or_default();
    cart.apply(action);
    cart.clone()
}

/// Wraps a cart snapshot in a JSON response, setting the session cookie for
/// first-contact requests.
fn cart_response(snapshot: CartState, session_id: &str, is_new_session: bool) -> Response {
    let mut response = Json(snapshot).into_response();
    attach_session_cookie(&mut response, session_id, is_new_session);
    response
}

/// Endpoint: GET /cart
async fn get_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    let snapshot = state
        .carts
        .get(&session_id)
        .map(|c| c.clone())
        .unwrap_or_default();
    cart_response(snapshot, &session_id, is_new_session)
}

/// Endpoint: POST /cart/items
/// Adds a catalog product to the cart, merging with an existing line.
async fn add_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<AddItemInput>,
) -> Result<Response, ApiError> {
    let product = state
        .find_product(&payload.product_id)
        .ok_or_else(|| ApiError::ProductNotFound(payload.product_id.clone()))?;
    if !product.available {
        return Err(ApiError::ProductUnavailable(payload.product_id));
    }
    let product = product.clone();

    let (session_id, is_new_session) = resolve_session_id(&headers);
    state.notifications.push(
        &session_id,
        format!("{} added to cart", product.name),
        Severity::Success,
        4_000,
    );

    let snapshot = apply_to_cart(
        &state,
        &session_id,
        CartAction::AddItem {
            product,
            quantity: payload.quantity,
        },
    );
    Ok(cart_response(snapshot, &session_id, is_new_session))
}

/// Endpoint: PUT /cart/items/{product_id}
/// Sets the exact quantity of a line; zero or less removes it.
async fn set_quantity(
    State(state): State<SharedState>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<SetQuantityInput>,
) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    let snapshot = apply_to_cart(
        &state,
        &session_id,
        CartAction::SetQuantity {
            product_id,
            quantity: payload.quantity,
        },
    );
    cart_response(snapshot, &session_id, is_new_session)
}

/// Endpoint: DELETE /cart/items/{product_id}
/// Removes a line; silently a no-op when the line is absent.
async fn remove_item(
    State(state): State<SharedState>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    let snapshot = apply_to_cart(&state, &session_id, CartAction::RemoveItem { product_id });
    cart_response(snapshot, &session_id, is_new_session)
}

/// Endpoint: POST /cart/clear
async fn clear_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    let snapshot = apply_to_cart(&state, &session_id, CartAction::Clear);
    cart_response(snapshot, &session_id, is_new_session)
}

/// Endpoint: POST /cart/toggle
/// Flips cart panel visibility; no effect on lines or totals.
async fn toggle_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    let snapshot = apply_to_cart(&state, &session_id, CartAction::ToggleVisibility);
    cart_response(snapshot, &session_id, is_new_session)
}
