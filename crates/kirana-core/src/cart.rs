//! # Cart
//!
//! The transient, session-local cart assembled before a sale is finalized.
//!
//! ## Cart Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Operations                                 │
//! │                                                                         │
//! │  Operator Action           Cart Change                                  │
//! │  ───────────────           ───────────                                  │
//! │                                                                         │
//! │  Click product ──────────► add_unit(&product)                           │
//! │                            • new line at qty 1, price frozen            │
//! │                            • existing line: qty + 1, capped at the      │
//! │                              last-loaded stock level                    │
//! │                                                                         │
//! │  Click remove ───────────► remove_one_unit(product_id)                 │
//! │                            • qty − 1, line dropped at zero              │
//! │                                                                         │
//! │  Totals display ─────────► totals(gst_rate)                             │
//! │                            • subtotal = Σ(price × qty)                  │
//! │                            • gst = subtotal × rate                      │
//! │                            • total = subtotal + gst                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart never touches the store: stock caps are enforced against the
//! stock level observed when the product row was handed in, and nothing is
//! persisted until checkout records the sale.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{GstRate, Product};

// =============================================================================
// Cart Line
// =============================================================================

/// One line of the cart.
///
/// ## Price Freezing
/// `name` and `unit_price_paise` are copied from the product when the line
/// is created. If the catalog row changes afterwards, the cart (and the
/// eventual sale item) keep the values the operator saw.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product this line references.
    pub product_id: i64,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price in paise at time of adding (frozen).
    pub unit_price_paise: i64,

    /// Units in the cart.
    pub quantity: i64,

    /// Stock level last observed for this product; the quantity cap.
    pub stock_available: i64,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.product_id,
            name: product.name.clone(),
            unit_price_paise: product.price_paise,
            quantity: 1,
            stock_available: product.stock_quantity,
        }
    }

    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    /// Returns the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Totals summary for the cart display and the checkout dialog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal_paise: i64,
    pub gst_paise: i64,
    pub total_paise: i64,
}

impl CartTotals {
    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_paise(self.subtotal_paise)
    }

    /// Returns the GST portion as Money.
    #[inline]
    pub fn gst(&self) -> Money {
        Money::from_paise(self.gst_paise)
    }

    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id`
/// - Every line has quantity ≥ 1 (removal drops the line at zero)
/// - A line's quantity never exceeds the stock level last observed for
///   its product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a product to the cart.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity increments only while it is
    ///   below the product's current stock level, otherwise the add is
    ///   rejected with [`CoreError::StockLimit`] and the cart is unchanged.
    /// - Product not in cart: a new line at quantity 1 with name and price
    ///   frozen. A product with no stock at all is rejected the same way.
    ///
    /// The stock level on the passed-in `Product` is whatever the caller
    /// last loaded; the cap is only as fresh as that read.
    pub fn add_unit(&mut self, product: &Product) -> CoreResult<()> {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.product_id)
        {
            if line.quantity >= product.stock_quantity {
                return Err(CoreError::StockLimit {
                    name: line.name.clone(),
                    available: product.stock_quantity,
                });
            }
            line.quantity += 1;
            line.stock_available = product.stock_quantity;
            return Ok(());
        }

        if product.stock_quantity < 1 {
            return Err(CoreError::StockLimit {
                name: product.name.clone(),
                available: product.stock_quantity,
            });
        }

        self.lines.push(CartLine::from_product(product));
        Ok(())
    }

    /// Removes one unit of a product; the line disappears at zero.
    pub fn remove_one_unit(&mut self, product_id: i64) -> CoreResult<()> {
        let index = self
            .lines
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or(CoreError::NotInCart { product_id })?;

        self.lines[index].quantity -= 1;
        if self.lines[index].quantity == 0 {
            self.lines.remove(index);
        }
        Ok(())
    }

    /// Computes subtotal, GST, and grand total at the given rate.
    pub fn totals(&self, rate: GstRate) -> CartTotals {
        let subtotal: Money = self.lines.iter().map(|l| l.line_total()).sum();
        let gst = subtotal.calculate_gst(rate);
        let total = subtotal + gst;

        CartTotals {
            subtotal_paise: subtotal.paise(),
            gst_paise: gst.paise(),
            total_paise: total.paise(),
        }
    }

    /// Returns the lines in the cart.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns the number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity of all units.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Clears all lines (sale recorded, or operator cancelled).
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
