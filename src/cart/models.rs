//! Cart Domain Models
//!
//! Data structures for the cart store. The cart holds a snapshot of each
//! product taken at add-time, so later catalog edits never change what a
//! customer already put in their cart.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product as the cart sees it: a point-in-time copy of the catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit price in centavos
    pub price: Money,

    /// Category the product belongs to (e.g. "pescados")
    pub category: String,

    /// Unit of measure for display (e.g. "kg", "pieza")
    pub unit: String,

    /// Whether the product can currently be added to a cart
    pub available: bool,
}

/// One line of the cart: a product snapshot and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product snapshot taken when the line was created
    pub product: Product,

    /// Quantity, always >= 1 in stored state
    pub quantity: u32,
}

impl CartLine {
    /// Price × quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}

/// The cart store. `total` and `item_count` are derivations of `lines` and
/// are recomputed by the reducer after every structural mutation; nothing
/// else may write them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Lines in insertion order (= display order)
    pub lines: Vec<CartLine>,

    /// Derived: Σ price × quantity across lines
    pub total: Money,

    /// Derived: Σ quantity across lines
    pub item_count: u32,

    /// Visibility of the cart panel; presentation only
    pub is_open: bool,
}

/// Returns the default quantity (1) for add requests
pub(crate) fn default_quantity() -> u32 {
    1
}

/// Body of `POST /cart/items`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemInput {
    /// Catalog id of the product to add
    pub product_id: String,

    /// How many to add (defaults to 1)
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Body of `PUT /cart/items/{product_id}`
#[derive(Debug, Deserialize)]
pub struct SetQuantityInput {
    /// New exact quantity; zero or negative removes the line
    pub quantity: i64,
}
