//! Pure cart reducer.
//!
//! Every cart mutation goes through [`CartState::apply`], which keeps the
//! store invariants: at most one line per product id, no stored quantity
//! below 1, and `total`/`item_count` recomputed from the line list on every
//! structural change (recomputed from scratch, never adjusted by deltas).

use super::models::{CartLine, CartState, Product};

/// A mutation of the cart store.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Merge `quantity` of `product` into the cart. An existing line for the
    /// same product id gains quantity; otherwise a new line is appended.
    AddItem { product: Product, quantity: u32 },

    /// Delete the line for `product_id`; no-op when absent.
    RemoveItem { product_id: String },

    /// Set the exact quantity of the line for `product_id`. Zero or negative
    /// behaves as `RemoveItem`, keeping the store free of dead lines.
    SetQuantity { product_id: String, quantity: i64 },

    /// Empty the cart.
    Clear,

    /// Flip the cart panel visibility. Presentation only; totals untouched.
    ToggleVisibility,
}

impl CartState {
    /// Applies an action to the store, then re-derives totals.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::AddItem { product, quantity } => {
                let quantity = quantity.max(1);
                if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
                    line.quantity += quantity;
                } else {
                    self.lines.push(CartLine { product, quantity });
                }
                self.recompute();
            }
            CartAction::RemoveItem { product_id } => {
                self.lines.retain(|l| l.product.id != product_id);
                self.recompute();
            }
            CartAction::SetQuantity { product_id, quantity } => {
                if quantity <= 0 {
                    self.lines.retain(|l| l.product.id != product_id);
                } else if let Some(line) =
                    self.lines.iter_mut().find(|l| l.product.id == product_id)
                {
                    line.quantity = quantity as u32;
                }
                self.recompute();
            }
            CartAction::Clear => {
                self.lines.clear();
                self.recompute();
            }
            CartAction::ToggleVisibility => {
                self.is_open = !self.is_open;
            }
        }
    }

    /// Re-derives `total` and `item_count` from the line list.
    fn recompute(&mut self) {
        self.item_count = self.lines.iter().map(|l| l.quantity).sum();
        self.total = self.lines.iter().map(CartLine::line_total).sum();
    }
}
