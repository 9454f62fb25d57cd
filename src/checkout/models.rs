//! Checkout Domain Models
//!
//! Steps, delivery options, the transient checkout form and the derived
//! order totals. Totals are pure functions of the cart subtotal and the
//! selected delivery option; they are computed on demand and never cached.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Tax rate applied at checkout (16% IVA), in basis points.
pub const TAX_RATE_BPS: i64 = 1_600;

/// The three steps of the checkout wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutStep {
    /// Step 1: name, contact and address
    #[default]
    DeliveryInfo,
    /// Step 2: card details
    Payment,
    /// Step 3: review and confirm
    Confirm,
}

impl CheckoutStep {
    /// 1-based step number for display.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::DeliveryInfo => 1,
            Self::Payment => 2,
            Self::Confirm => 3,
        }
    }

    /// The following step; clamped at the confirmation step.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::DeliveryInfo => Self::Payment,
            Self::Payment | Self::Confirm => Self::Confirm,
        }
    }

    /// The preceding step; clamped at the delivery step.
    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::DeliveryInfo | Self::Payment => Self::DeliveryInfo,
            Self::Confirm => Self::Payment,
        }
    }
}

/// How the order gets to the customer. Each option has a fixed fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryOption {
    /// Collect at the branch, free
    Pickup,
    /// Regular delivery
    #[default]
    Standard,
    /// Same-day delivery
    Express,
}

impl DeliveryOption {
    /// Fixed fee for this option.
    #[must_use]
    pub const fn fee(self) -> Money {
        match self {
            Self::Pickup => Money::ZERO,
            Self::Standard => Money::from_major(50),
            Self::Express => Money::from_major(150),
        }
    }
}

/// Transient form state for one checkout attempt.
///
/// Created fresh when checkout opens and discarded when it closes or
/// completes. Payment fields are held only for the lifetime of the session;
/// the struct deliberately does not derive `Serialize` so card data can
/// never end up in a response body or a log line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    // Delivery fields
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub notes: String,

    // Payment fields, never validated against a real processor
    pub card_holder: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,

    /// Selected delivery option
    pub delivery_option: DeliveryOption,
}

impl CheckoutForm {
    /// A fresh form prefilled from the signed-in user's profile. The profile
    /// is read once here, not live-bound.
    #[must_use]
    pub fn prefilled(profile: &UserProfile) -> Self {
        Self {
            full_name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            ..Self::default()
        }
    }

    /// Merges a partial update into the form.
    pub fn merge(&mut self, update: FormUpdate) {
        macro_rules! set {
            ($field:ident) => {
                if let Some(value) = update.$field {
                    self.$field = value;
                }
            };
        }
        set!(full_name);
        set!(email);
        set!(phone);
        set!(street);
        set!(city);
        set!(state);
        set!(postal_code);
        set!(notes);
        set!(card_holder);
        set!(card_number);
        set!(expiry);
        set!(cvv);
        set!(delivery_option);
    }
}

/// Prefill source for a fresh checkout form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Body of `PUT /checkout/form`: any subset of form fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub notes: Option<String>,
    pub card_holder: Option<String>,
    pub card_number: Option<String>,
    pub expiry: Option<String>,
    pub cvv: Option<String>,
    pub delivery_option: Option<DeliveryOption>,
}

/// Derived order totals for display and for the final charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTotals {
    /// Cart total before fees and tax
    pub subtotal: Money,
    /// Fee of the selected delivery option
    pub delivery_fee: Money,
    /// subtotal × 16%
    pub tax: Money,
    /// subtotal + delivery fee + tax
    pub final_total: Money,
}

/// Computes order totals from the cart subtotal and the delivery option.
#[must_use]
pub fn compute_totals(subtotal: Money, option: DeliveryOption) -> CheckoutTotals {
    let delivery_fee = option.fee();
    let tax = subtotal.percent_bps(TAX_RATE_BPS);
    CheckoutTotals {
        subtotal,
        delivery_fee,
        tax,
        final_total: subtotal + delivery_fee + tax,
    }
}
