//! API error type shared by all route handlers.

use crate::checkout::gateway::GatewayError;
use crate::checkout::session::CheckoutError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No product with the given id exists in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// The product exists but is currently not for sale.
    #[error("product unavailable: {0}")]
    ProductUnavailable(String),

    /// The session has no active checkout.
    #[error("no active checkout session")]
    NoCheckout,

    /// The cart is empty, so checkout cannot start or submit.
    #[error("cart is empty")]
    EmptyCart,

    /// A checkout state-machine guard rejected the request.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The payment gateway declined or timed out.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::ProductNotFound(_) | Self::NoCheckout => StatusCode::NOT_FOUND,
            Self::ProductUnavailable(_) | Self::EmptyCart | Self::Checkout(_) => {
                StatusCode::CONFLICT
            }
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
