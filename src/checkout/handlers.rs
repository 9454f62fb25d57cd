//! REST API handlers for the checkout flow
//!
//! The handlers drive the session state machine and the submission. The one
//! rule that matters here: DashMap entry guards are never held across an
//! await. `submit` flips the `submitting` flag under the guard, drops the
//! guard, awaits the gateway, then relocks to settle the outcome. Lock order
//! is always checkouts before carts.

use super::gateway::{GatewayError, Order, Receipt};
use super::models::{compute_totals, CheckoutStep, CheckoutTotals, DeliveryOption, FormUpdate, UserProfile};
use super::session::CheckoutSession;
use crate::cart::helpers::{attach_session_cookie, resolve_session_id};
use crate::cart::reducer::CartAction;
use crate::cart::state::{AppState, SharedState};
use crate::error::ApiError;
use crate::money::Money;
use crate::notify::Severity;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on one gateway call; a hung gateway must not leave the
/// session stuck in `submitting`.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Creates routes for checkout operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/checkout",
            post(start_checkout).get(get_checkout).delete(abandon_checkout),
        )
        .route("/checkout/next", post(next_step))
        .route("/checkout/previous", post(previous_step))
        .route("/checkout/form", put(update_form))
        .route("/checkout/submit", post(submit_checkout))
}

/// Body of `POST /checkout`
#[derive(Debug, Default, Deserialize)]
pub struct StartCheckoutInput {
    /// Signed-in user's profile for one-time form prefill
    pub profile: Option<UserProfile>,
}

/// Session view returned by the checkout endpoints. Payment form fields are
/// intentionally absent; only the selected option and derived totals leave
/// the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub step_number: u8,
    pub submitting: bool,
    pub completed: bool,
    pub delivery_option: DeliveryOption,
    pub totals: CheckoutTotals,
}

/// Builds the view for a session, recomputing totals from the live cart.
fn session_view(state: &AppState, session_id: &str, session: &CheckoutSession) -> CheckoutView {
    let subtotal = state
        .carts
        .get(session_id)
        .map(|c| c.total)
        .unwrap_or(Money::ZERO);
    CheckoutView {
        step: session.step,
        step_number: session.step.number(),
        submitting: session.submitting,
        completed: session.completed,
        delivery_option: session.form.delivery_option,
        totals: compute_totals(subtotal, session.form.delivery_option),
    }
}

/// Endpoint: POST /checkout
/// Opens a fresh checkout session over the current cart.
async fn start_checkout(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Option<Json<StartCheckoutInput>>,
) -> Result<Response, ApiError> {
    let (session_id, is_new_session) = resolve_session_id(&headers);

    let cart_is_empty = state
        .carts
        .get(&session_id)
        .map_or(true, |c| c.lines.is_empty());
    if cart_is_empty {
        return Err(ApiError::EmptyCart);
    }

    let profile = payload.and_then(|Json(input)| input.profile);
    let view = {
        let mut entry = state.checkouts.entry(session_id.clone()).or_default();
        if entry.submitting {
            return Err(super::session::CheckoutError::SubmissionInFlight.into());
        }
        // Reopening discards any previous form state.
        *entry = CheckoutSession::open(profile.as_ref());
        session_view(&state, &session_id, &entry)
    };

    let mut response = Json(view).into_response();
    attach_session_cookie(&mut response, &session_id, is_new_session);
    Ok(response)
}

/// Endpoint: GET /checkout
async fn get_checkout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<CheckoutView>, ApiError> {
    let (session_id, _) = resolve_session_id(&headers);
    let session = state.checkouts.get(&session_id).ok_or(ApiError::NoCheckout)?;
    Ok(Json(session_view(&state, &session_id, &session)))
}

/// Endpoint: DELETE /checkout
/// Abandons the session; the cart is untouched. Rejected mid-submission.
async fn abandon_checkout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let (session_id, _) = resolve_session_id(&headers);
    if let Some(session) = state.checkouts.get(&session_id) {
        if session.submitting {
            return Err(super::session::CheckoutError::SubmissionInFlight.into());
        }
    }
    state.checkouts.remove(&session_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Applies a state-machine transition and returns the fresh view.
fn transition(
    state: &SharedState,
    headers: &HeaderMap,
    apply: impl FnOnce(&mut CheckoutSession) -> Result<(), super::session::CheckoutError>,
) -> Result<Json<CheckoutView>, ApiError> {
    let (session_id, _) = resolve_session_id(headers);
    let mut session = state
        .checkouts
        .get_mut(&session_id)
        .ok_or(ApiError::NoCheckout)?;
    apply(&mut session)?;
    Ok(Json(session_view(state, &session_id, &session)))
}

/// Endpoint: POST /checkout/next
async fn next_step(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<CheckoutView>, ApiError> {
    transition(&state, &headers, CheckoutSession::next)
}

/// Endpoint: POST /checkout/previous
async fn previous_step(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<CheckoutView>, ApiError> {
    transition(&state, &headers, CheckoutSession::previous)
}

/// Endpoint: PUT /checkout/form
async fn update_form(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(update): Json<FormUpdate>,
) -> Result<Json<CheckoutView>, ApiError> {
    transition(&state, &headers, |session| session.update_form(update))
}

/// Endpoint: POST /checkout/submit
///
/// Charges the order and, on success, clears the cart (at most once) and
/// tears the session down. On decline or timeout the session stays at the
/// confirmation step with the cart untouched, and the failure is surfaced
/// as an error notification.
async fn submit_checkout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Receipt>, ApiError> {
    let (session_id, _) = resolve_session_id(&headers);

    // Phase 1: flip the submitting flag and snapshot the order under the
    // entry guards, then release them before suspending.
    let order = {
        let mut session = state
            .checkouts
            .get_mut(&session_id)
            .ok_or(ApiError::NoCheckout)?;
        session.begin_submit()?;

        let order = state.carts.get(&session_id).and_then(|cart| {
            if cart.lines.is_empty() {
                None
            } else {
                Some(Order {
                    lines: cart.lines.clone(),
                    delivery_option: session.form.delivery_option,
                    totals: compute_totals(cart.total, session.form.delivery_option),
                })
            }
        });

        match order {
            Some(order) => order,
            None => {
                session.finish_submit(false);
                return Err(ApiError::EmptyCart);
            }
        }
    };

    // Phase 2: the only suspension point in the flow.
    let outcome = match tokio::time::timeout(SUBMIT_TIMEOUT, state.gateway.charge(&order)).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout),
    };

    // Phase 3: relock and settle.
    match outcome {
        Ok(receipt) => {
            if let Some(mut session) = state.checkouts.get_mut(&session_id) {
                session.finish_submit(true);
            }
            if let Some(mut cart) = state.carts.get_mut(&session_id) {
                cart.apply(CartAction::Clear);
            }
            // Completed sessions are torn down; a new checkout starts fresh.
            state.checkouts.remove(&session_id);
            state.notifications.push(
                &session_id,
                format!("Order {} confirmed", receipt.order_id),
                Severity::Success,
                6_000,
            );
            tracing::info!(order_id = %receipt.order_id, amount = %receipt.amount, "checkout completed");
            Ok(Json(receipt))
        }
        Err(err) => {
            if let Some(mut session) = state.checkouts.get_mut(&session_id) {
                session.finish_submit(false);
            }
            state.notifications.push(
                &session_id,
                format!("Payment failed: {err}"),
                Severity::Error,
                6_000,
            );
            tracing::warn!(error = %err, "checkout submission failed");
            Err(ApiError::Gateway(err))
        }
    }
}
