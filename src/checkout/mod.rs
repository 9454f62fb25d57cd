//! Checkout Domain Module
//!
//! The three-step checkout flow: delivery info, payment info, confirmation.
//! Contains the form and totals models, the session state machine, the
//! payment gateway seam and the REST handlers driving it all.

pub mod gateway;
pub mod handlers;
pub mod models;
pub mod session;

// Re-export commonly used types for convenience
pub use gateway::{GatewayError, Order, PaymentGateway, Receipt, SimulatedGateway};
pub use handlers::routes;
pub use models::{compute_totals, CheckoutForm, CheckoutStep, CheckoutTotals, DeliveryOption};
pub use session::{CheckoutError, CheckoutSession};
