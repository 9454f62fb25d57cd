//! Fixed-point money amounts.
//!
//! All prices and totals in the system are MXN minor units (centavos) held
//! in an `i64`. Summing `price × quantity` over cart lines is exact in this
//! representation; the only rounding happens when a percentage (the tax
//! rate) is applied, and that rounds half away from zero to the nearest
//! centavo.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// A money amount in minor units (centavos).
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates an amount from minor units (centavos).
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole pesos.
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Multiplies the amount by a line quantity.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0 * quantity as i64)
    }

    /// Applies a rate expressed in basis points (16% = 1600 bps), rounding
    /// half away from zero to the nearest centavo.
    #[must_use]
    pub const fn percent_bps(self, bps: i64) -> Self {
        let numerator = self.0 * bps;
        let half = if numerator >= 0 { 5_000 } else { -5_000 };
        Self((numerator + half) / 10_000)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
