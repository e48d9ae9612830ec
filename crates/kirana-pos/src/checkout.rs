//! # Checkout Session
//!
//! The sale screen's session state and the checkout flow.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Flow                                        │
//! │                                                                         │
//! │  CheckoutSession::begin(db)                                             │
//! │       │  loads the GST rate from shop_info once per session             │
//! │       ▼                                                                 │
//! │  add_product / add_product_by_query / remove_one_unit                   │
//! │       │  cart math and stock caps live in kirana-core                   │
//! │       ▼                                                                 │
//! │  totals() ──► operator confirms payment (method + flat for credit)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  checkout(db, selection)                                                │
//! │       ├── empty cart?            rejected, nothing recorded             │
//! │       ├── credit without flat?   rejected, nothing recorded             │
//! │       ├── record_sale (atomic)   failure → cart untouched               │
//! │       └── success                cart cleared, receipt returned         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is explicit state owned by the caller - one operator, one
//! cart. Nothing here is process-global.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PosError;
use kirana_core::validation::validate_search_query;
use kirana_core::{Cart, CartLine, CartTotals, CoreError, GstRate, PaymentMethod, ValidationError};
use kirana_db::{Database, SaleDraft, SaleLine};

// =============================================================================
// Payment Selection
// =============================================================================

/// The operator's choice in the payment step of checkout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSelection {
    pub method: PaymentMethod,
    /// Mandatory when `method` is credit, ignored otherwise.
    pub flat_id: Option<i64>,
}

impl PaymentSelection {
    /// Cash or external card - settled immediately.
    pub fn cash_card() -> Self {
        PaymentSelection {
            method: PaymentMethod::CashCard,
            flat_id: None,
        }
    }

    /// Charge the sale to a flat's running credit.
    pub fn credit(flat_id: i64) -> Self {
        PaymentSelection {
            method: PaymentMethod::Credit,
            flat_id: Some(flat_id),
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// One recorded line on the receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price_paise: i64,
    pub line_total_paise: i64,
}

impl From<&CartLine> for ReceiptLine {
    fn from(line: &CartLine) -> Self {
        ReceiptLine {
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price_paise: line.unit_price_paise,
            line_total_paise: line.line_total().paise(),
        }
    }
}

/// Summary of a successfully recorded sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub sale_id: i64,
    pub lines: Vec<ReceiptLine>,
    pub subtotal_paise: i64,
    pub gst_paise: i64,
    pub total_paise: i64,
    pub payment_method: PaymentMethod,
    pub flat_id: Option<i64>,
}

// =============================================================================
// Checkout Session
// =============================================================================

/// Session state for one operator's sale screen: the cart plus the GST
/// rate loaded when the session began.
#[derive(Debug)]
pub struct CheckoutSession {
    cart: Cart,
    gst_rate: GstRate,
}

impl CheckoutSession {
    /// Starts a session, reading the current GST rate from shop_info.
    ///
    /// The rate is fixed for the session; a rate edit mid-session takes
    /// effect on the next session, exactly like a fresh app launch.
    pub async fn begin(db: &Database) -> Result<Self, PosError> {
        let shop = db.shop().get().await?;
        debug!(gst_rate_bps = shop.gst_rate_bps, "Checkout session started");

        Ok(CheckoutSession {
            cart: Cart::new(),
            gst_rate: shop.gst_rate(),
        })
    }

    /// Returns the session's GST rate.
    pub fn gst_rate(&self) -> GstRate {
        self.gst_rate
    }

    /// Returns the cart for display.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Computes subtotal, GST, and grand total for the current cart.
    pub fn totals(&self) -> CartTotals {
        self.cart.totals(self.gst_rate)
    }

    /// Adds one unit of a product by id (the product-button path).
    ///
    /// Re-reads the product row so the stock cap reflects the listing
    /// the operator is looking at.
    pub async fn add_product(&mut self, db: &Database, product_id: i64) -> Result<(), PosError> {
        let product = db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| PosError::not_found("Product", product_id))?;

        self.cart.add_unit(&product)?;
        Ok(())
    }

    /// Adds one unit of a product from the search box.
    ///
    /// A query of 8-13 digits tries an exact barcode match first (a
    /// scanner "types" the whole code); otherwise the first in-stock
    /// product whose name contains the query is added.
    pub async fn add_product_by_query(
        &mut self,
        db: &Database,
        query: &str,
    ) -> Result<(), PosError> {
        let query = validate_search_query(query)?;
        if query.is_empty() {
            return Err(ValidationError::Required {
                field: "query".to_string(),
            }
            .into());
        }

        if looks_like_barcode(&query) {
            if let Some(product) = db.products().get_by_barcode(&query).await? {
                self.cart.add_unit(&product)?;
                return Ok(());
            }
            // Barcode not on file; fall through to the name search
        }

        let product = db
            .products()
            .first_in_stock_matching(&query)
            .await?
            .ok_or_else(|| {
                PosError::not_found("In-stock product matching", format!("'{}'", query))
            })?;

        self.cart.add_unit(&product)?;
        Ok(())
    }

    /// Removes one unit; the line disappears at zero.
    pub fn remove_one_unit(&mut self, product_id: i64) -> Result<(), PosError> {
        self.cart.remove_one_unit(product_id)?;
        Ok(())
    }

    /// Finalizes the sale.
    ///
    /// Validates the cart and the payment selection, then hands one
    /// atomic `record_sale` to the storage layer. On any failure the
    /// cart is left exactly as it was; on success it is cleared and the
    /// caller should refresh its purchasable listing.
    pub async fn checkout(
        &mut self,
        db: &Database,
        selection: PaymentSelection,
    ) -> Result<Receipt, PosError> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let flat_id = match selection.method {
            PaymentMethod::Credit => {
                let flat_id = selection.flat_id.ok_or(CoreError::FlatRequired)?;
                // Surface a clear message now rather than an FK failure
                // from inside the transaction
                db.flats()
                    .get_by_id(flat_id)
                    .await?
                    .ok_or_else(|| PosError::not_found("Flat", flat_id))?;
                Some(flat_id)
            }
            PaymentMethod::CashCard => None,
        };

        let totals = self.totals();
        let lines: Vec<ReceiptLine> = self.cart.lines().iter().map(ReceiptLine::from).collect();

        let draft = SaleDraft {
            total_paise: totals.total_paise,
            gst_paise: totals.gst_paise,
            payment_method: selection.method,
            flat_id,
            lines: self
                .cart
                .lines()
                .iter()
                .map(|l| SaleLine {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    price_at_sale_paise: l.unit_price_paise,
                })
                .collect(),
        };

        let sale_id = db.sales().record_sale(&draft).await?;

        self.cart.clear();
        info!(sale_id, total_paise = totals.total_paise, "Checkout complete");

        Ok(Receipt {
            sale_id,
            lines,
            subtotal_paise: totals.subtotal_paise,
            gst_paise: totals.gst_paise,
            total_paise: totals.total_paise,
            payment_method: selection.method,
            flat_id,
        })
    }
}

/// Checks if a query looks like a barcode (8-13 numeric digits:
/// EAN-8 through EAN-13 / UPC-A).
fn looks_like_barcode(query: &str) -> bool {
    (8..=13).contains(&query.len()) && query.chars().all(|c| c.is_ascii_digit())
}

// =============================================================================
// Unit Tests
// =============================================================================
