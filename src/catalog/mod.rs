//! Product Catalog Module
//!
//! Read-only seeded catalog of MarVera seafood products. The cart copies a
//! product out of here at add-time; nothing in this module ever mutates
//! after startup.

use crate::cart::models::Product;
use crate::cart::state::SharedState;
use crate::error::ApiError;
use crate::money::Money;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

/// Creates routes for catalog lookups
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
}

/// Endpoint: GET /products
async fn list_products(State(state): State<SharedState>) -> Json<Vec<Product>> {
    Json(state.catalog.clone())
}

/// Endpoint: GET /products/{id}
async fn get_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .find_product(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::ProductNotFound(id))
}

fn product(id: &str, name: &str, cents: i64, category: &str, unit: &str, available: bool) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        price: Money::from_cents(cents),
        category: category.into(),
        unit: unit.into(),
        available,
    }
}

/// The seeded product list. Prices are MXN centavos per unit.
pub fn seed() -> Vec<Product> {
    vec![
        product("camaron-u15", "Camarón U-15", 38_900, "mariscos", "kg", true),
        product("atun-aleta-azul", "Atún aleta azul", 52_500, "pescados", "kg", true),
        product("salmon-fresco", "Salmón fresco", 44_900, "pescados", "kg", true),
        product("pulpo-entero", "Pulpo entero", 31_900, "mariscos", "kg", true),
        product("ostion-kumamoto", "Ostión Kumamoto", 2_500, "mariscos", "pieza", true),
        product("robalo-filete", "Filete de robalo", 29_900, "pescados", "kg", true),
        product("jaiba-suave", "Jaiba suave", 18_500, "mariscos", "kg", true),
        // Seasonal; listed but not currently for sale.
        product("callo-de-hacha", "Callo de hacha", 58_000, "mariscos", "kg", false),
    ]
}
