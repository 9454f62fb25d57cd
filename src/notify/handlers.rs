//! REST API handlers for notifications

use super::Notification;
use crate::cart::helpers::{attach_session_cookie, resolve_session_id};
use crate::cart::state::SharedState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};

/// Creates routes for notification operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/:id", delete(dismiss_notification))
}

/// Endpoint: GET /notifications
async fn list_notifications(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    let queue: Vec<Notification> = state.notifications.list(&session_id);

    let mut response = Json(queue).into_response();
    attach_session_cookie(&mut response, &session_id, is_new_session);
    response
}

/// Endpoint: DELETE /notifications/{id}
/// Dismissal is idempotent; an unknown id still answers 204.
async fn dismiss_notification(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> StatusCode {
    let (session_id, _) = resolve_session_id(&headers);
    state.notifications.dismiss(&session_id, id);
    StatusCode::NO_CONTENT
}
