//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  GST on a ₹130.00 cart at 18% must be ₹23.40, not ₹23.400000000000002.  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    13000 paise × 1800 bps / 10000 = 2340 paise, exactly                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kirana_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(5000); // ₹50.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // ₹100.00
//! let total = price + Money::from_paise(3000);  // ₹80.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::GstRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (the smallest rupee unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic intermediate values may go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for serialization
///
/// ## Where Money Flows
/// ```text
/// Product.price_paise ──► CartLine.unit_price ──► CartTotals.subtotal
///                                                        │
///          Flat.credit_balance ◄── Sale.total ◄── subtotal + GST
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let price = Money::from_paise(5099); // ₹50.99
    /// assert_eq!(price.paise(), 5099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let price = Money::from_rupees_paise(50, 99);
    /// assert_eq!(price.paise(), 5099);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the rupee part should be negative.
    /// `from_rupees_paise(-5, 50)` = -₹5.50, not -₹4.50
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * 100 - paise)
        } else {
            Money(rupees * 100 + paise)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates GST on this amount at the given rate.
    ///
    /// ## Implementation
    /// Integer math in basis points: `(paise × bps + 5000) / 10000`.
    /// The `+ 5000` rounds the half-paisa up rather than truncating, and
    /// i128 intermediates rule out overflow on large carts.
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::money::Money;
    /// use kirana_core::types::GstRate;
    ///
    /// let subtotal = Money::from_paise(13000);      // ₹130.00
    /// let gst = subtotal.calculate_gst(GstRate::from_bps(1800)); // 18%
    /// assert_eq!(gst.paise(), 2340);                // ₹23.40
    /// ```
    pub fn calculate_gst(&self, rate: GstRate) -> Money {
        let gst_paise = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(gst_paise as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(3000); // ₹30.00
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.paise(), 9000);     // ₹90.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is the two-decimal operator-facing rendering. Stored values
/// stay integer paise.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over line totals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
