//! Payment gateway seam.
//!
//! Submission is a real async boundary with explicit success and failure
//! results, not a bare timer. The default implementation still simulates the
//! gateway (there is no processor integration), but every caller already
//! handles decline and timeout the way a real integration would need.

use super::models::{CheckoutTotals, DeliveryOption};
use crate::cart::models::CartLine;
use crate::money::Money;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// The assembled order handed to the gateway: the cart line snapshot plus
/// the derived totals. Payment card fields are deliberately not part of it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Cart lines at submission time
    pub lines: Vec<CartLine>,

    /// Selected delivery option
    pub delivery_option: DeliveryOption,

    /// Derived totals; `final_total` is the amount to charge
    pub totals: CheckoutTotals,
}

/// Confirmation returned by a successful charge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Gateway-side order identifier
    pub order_id: String,

    /// Amount charged
    pub amount: Money,

    /// When the charge was confirmed
    pub created_at: DateTime<Utc>,
}

/// Ways a charge can fail. Timeouts are reported like declines: the user
/// retries by submitting again.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The gateway rejected the charge.
    #[error("payment declined: {0}")]
    Declined(String),

    /// The gateway did not answer within the submission timeout.
    #[error("payment gateway timed out")]
    Timeout,
}

/// A payment processor the checkout flow can charge an order against.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges the order, returning a receipt on success.
    async fn charge(&self, order: &Order) -> Result<Receipt, GatewayError>;
}

/// Stand-in gateway: waits a configurable latency, then approves.
pub struct SimulatedGateway {
    /// Artificial processing latency
    pub latency: Duration,
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1_500),
        }
    }
}

impl SimulatedGateway {
    /// A gateway that answers immediately; used by tests.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, order: &Order) -> Result<Receipt, GatewayError> {
        tokio::time::sleep(self.latency).await;
        Ok(Receipt {
            order_id: Uuid::new_v4().simple().to_string(),
            amount: order.totals.final_total,
            created_at: Utc::now(),
        })
    }
}

/// Gateway that declines every charge; exercises the failure branch in tests.
pub struct DecliningGateway;

#[async_trait]
impl PaymentGateway for DecliningGateway {
    async fn charge(&self, _order: &Order) -> Result<Receipt, GatewayError> {
        Err(GatewayError::Declined("card rejected".into()))
    }
}
