//! # Domain Types
//!
//! Core domain types used throughout Kirana POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Product      │   │      Sale       │   │    SaleItem     │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  product_id     │   │  sale_id        │   │  sale_id (FK)   │        │
//! │  │  barcode        │   │  total_paise    │   │  product_id(FK) │        │
//! │  │  price_paise    │   │  gst_paise      │   │  quantity_sold  │        │
//! │  │  stock_quantity │   │  payment_method │   │  price_at_sale  │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │     Flat        │   │    ShopInfo     │   │  PaymentMethod  │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  flat_number    │   │  singleton row  │   │  CashCard       │        │
//! │  │  credit_balance │   │  gst_rate_bps   │   │  Credit         │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identities are the store's `i64` rowids. Monetary fields are integer
//! paise; `Money` accessors are provided on each type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// GST Rate
// =============================================================================

/// GST rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18.00% (the default GST rate in shop_info)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstRate(u32);

impl GstRate {
    /// Creates a GST rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        GstRate(bps)
    }

    /// Creates a GST rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        GstRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero GST rate.
    #[inline]
    pub const fn zero() -> Self {
        GstRate(0)
    }
}

impl Default for GstRate {
    fn default() -> Self {
        GstRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Store-assigned identifier (SQLite rowid).
    pub product_id: i64,

    /// Barcode (EAN-13, UPC-A, etc.). Optional, unique when present.
    pub barcode: Option<String>,

    /// Display name shown to the operator and on the product list.
    pub name: String,

    /// Unit price in paise.
    pub price_paise: i64,

    /// Current stock level. Never driven negative by checkout.
    pub stock_quantity: i64,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise)
    }

    /// Checks whether the product can appear in the purchasable listing.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

// =============================================================================
// Flat
// =============================================================================

/// A resident unit carrying a running store-credit balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Flat {
    pub flat_id: i64,

    /// Unique unit label, e.g. "A-101".
    pub flat_number: String,

    pub resident_name: Option<String>,

    /// Outstanding credit in paise. Incremented by credit sales,
    /// decremented by recorded payments, floored at zero by the
    /// payment pre-check (not by a constraint).
    pub credit_balance_paise: i64,
}

impl Flat {
    /// Returns the outstanding credit as Money.
    #[inline]
    pub fn credit_balance(&self) -> Money {
        Money::from_paise(self.credit_balance_paise)
    }

    /// The combo-box label the checkout dialog shows.
    pub fn display_label(&self) -> String {
        match &self.resident_name {
            Some(resident) => format!("{} ({})", self.flat_number, resident),
            None => self.flat_number.clone(),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Settled immediately in cash or on an external card terminal.
    CashCard,
    /// Charged to a flat's running credit balance.
    Credit,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub sale_id: i64,
    pub sale_date: DateTime<Utc>,
    pub total_paise: i64,
    pub gst_paise: i64,
    pub payment_method: PaymentMethod,
    /// Set iff payment_method is Credit.
    pub flat_id: Option<i64>,
}

impl Sale {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }

    /// Returns the GST portion as Money.
    #[inline]
    pub fn gst(&self) -> Money {
        Money::from_paise(self.gst_paise)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a recorded sale.
/// The unit price is snapshotted at sale time, so later catalog edits
/// never rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub sale_item_id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity_sold: i64,
    /// Unit price in paise at time of sale (frozen).
    pub price_at_sale_paise: i64,
}

impl SaleItem {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn price_at_sale(&self) -> Money {
        Money::from_paise(self.price_at_sale_paise)
    }

    /// Returns the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price_at_sale().multiply_quantity(self.quantity_sold)
    }
}

// =============================================================================
// Shop Info
// =============================================================================

/// The singleton configuration row.
///
/// Holds shop identity for receipts plus the GST rate applied to all
/// new sales. Seeded on first run, id fixed at 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ShopInfo {
    pub id: i64,
    pub shop_name: String,
    pub address: String,
    pub phone: String,
    pub gst_number: String,
    pub gst_rate_bps: u32,
}

impl ShopInfo {
    /// Returns the current GST rate.
    #[inline]
    pub fn gst_rate(&self) -> GstRate {
        GstRate::from_bps(self.gst_rate_bps)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
