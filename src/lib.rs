//! MarVera Cart Library
//!
//! This library provides the cart and checkout core for the MarVera seafood
//! storefront: a per-session cart store with derived totals, a three-step
//! checkout flow with a pluggable payment gateway, and a queue of
//! self-expiring user notifications.

// Domain modules
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod notify;

// Shared building blocks
pub mod error;
pub mod money;

// Infrastructure
pub mod router;
