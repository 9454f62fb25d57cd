//! Cart Domain Module
//!
//! This module contains the cart store and everything around it:
//! - Domain models (Product snapshot, CartLine, CartState)
//! - The pure reducer driving all cart mutations
//! - Session resolution helpers
//! - Shared application state
//! - REST API handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod reducer;
pub mod state;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use models::{CartLine, CartState, Product};
pub use reducer::CartAction;
pub use state::{AppState, SharedState};
