//! Shared application state.

use crate::cart::models::{CartState, Product};
use crate::catalog;
use crate::checkout::gateway::{PaymentGateway, SimulatedGateway};
use crate::checkout::session::CheckoutSession;
use crate::notify::NotificationHub;
use dashmap::DashMap;
use std::sync::Arc;

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state.
///
/// Carts and checkout sessions are keyed by session id. DashMap gives each
/// entry an exclusive guard without an external Mutex; handlers never hold a
/// guard across an await.
pub struct AppState {
    /// One cart store per session
    pub carts: DashMap<String, CartState>,

    /// At most one active checkout session per session id
    pub checkouts: DashMap<String, CheckoutSession>,

    /// User-facing notification queues, one per session
    pub notifications: NotificationHub,

    /// Seeded product catalog, read-only after startup
    pub catalog: Vec<Product>,

    /// Payment gateway used by checkout submission
    pub gateway: Arc<dyn PaymentGateway>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates state with the seeded catalog and the simulated gateway.
    pub fn new() -> Self {
        Self::with_gateway(Arc::new(SimulatedGateway::default()))
    }

    /// Creates state with a specific gateway implementation. Tests use this
    /// to swap in a zero-latency or failing gateway.
    pub fn with_gateway(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            carts: DashMap::new(),
            checkouts: DashMap::new(),
            notifications: NotificationHub::default(),
            catalog: catalog::seed(),
            gateway,
        }
    }

    /// Looks up a catalog product by id.
    pub fn find_product(&self, product_id: &str) -> Option<&Product> {
        self.catalog.iter().find(|p| p.id == product_id)
    }
}
