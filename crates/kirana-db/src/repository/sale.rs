//! # Sale Repository
//!
//! Database operations for sales, including the one multi-statement
//! transaction in the system.
//!
//! ## The Atomic Unit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     record_sale transaction                             │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    1. INSERT sales            (header: totals, method, flat)            │
//! │    2. INSERT sale_items × N   (one per cart line, price frozen)         │
//! │    3. UPDATE products × N     (stock − line quantity)                   │
//! │    4. UPDATE flats            (credit + grand total, credit sales only) │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure → ROLLBACK: no header, no items, no stock change,          │
//! │  no balance change. A sale header without its line items is never       │
//! │  observable.                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is decremented by delta against whatever is in the row, not
//! re-validated here: the cap was enforced against stock read at
//! cart-population time, and the system assumes a single operator.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use kirana_core::{PaymentMethod, Sale, SaleItem};

// =============================================================================
// Sale Draft
// =============================================================================

/// One cart line, frozen for recording.
#[derive(Debug, Clone)]
pub struct SaleLine {
    pub product_id: i64,
    pub quantity: i64,
    /// Unit price in paise as it was when added to the cart.
    pub price_at_sale_paise: i64,
}

/// Everything `record_sale` needs, assembled by the checkout service
/// from the cart and the confirmed payment selection.
#[derive(Debug, Clone)]
pub struct SaleDraft {
    pub total_paise: i64,
    pub gst_paise: i64,
    pub payment_method: PaymentMethod,
    /// Required iff `payment_method` is [`PaymentMethod::Credit`];
    /// enforced by the checkout service before the draft is built.
    pub flat_id: Option<i64>,
    pub lines: Vec<SaleLine>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale as a single atomic unit.
    ///
    /// ## Guarantee
    /// Either every effect is persisted (header, line items, stock
    /// decrements, optional credit increment) or none are. On error the
    /// transaction rolls back when dropped and the error propagates;
    /// the caller's cart is left untouched.
    ///
    /// ## Returns
    /// The id of the new sale.
    pub async fn record_sale(&self, draft: &SaleDraft) -> DbResult<i64> {
        debug!(
            total_paise = draft.total_paise,
            lines = draft.lines.len(),
            method = ?draft.payment_method,
            "Recording sale"
        );

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        // 1. Sale header
        let result = sqlx::query(
            r#"
            INSERT INTO sales (sale_date, total_paise, gst_paise, payment_method, flat_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(now)
        .bind(draft.total_paise)
        .bind(draft.gst_paise)
        .bind(draft.payment_method)
        .bind(draft.flat_id)
        .execute(&mut *tx)
        .await?;

        let sale_id = result.last_insert_rowid();

        for line in &draft.lines {
            // 2. Line item, price frozen from the cart
            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, product_id, quantity_sold, price_at_sale_paise)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price_at_sale_paise)
            .execute(&mut *tx)
            .await?;

            // 3. Stock decrement for the same line
            sqlx::query(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity - ?2
                WHERE product_id = ?1
                "#,
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        // 4. Credit sales charge the flat's running balance
        if draft.payment_method == PaymentMethod::Credit {
            let flat_id = draft
                .flat_id
                .ok_or_else(|| DbError::QueryFailed("credit sale without flat_id".to_string()))?;

            sqlx::query(
                r#"
                UPDATE flats
                SET credit_balance_paise = credit_balance_paise + ?2
                WHERE flat_id = ?1
                "#,
            )
            .bind(flat_id)
            .bind(draft.total_paise)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(sale_id, total_paise = draft.total_paise, "Sale recorded");
        Ok(sale_id)
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT sale_id, sale_date, total_paise, gst_paise, payment_method, flat_id
            FROM sales
            WHERE sale_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all line items for a sale.
    pub async fn items_for_sale(&self, sale_id: i64) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT sale_item_id, sale_id, product_id, quantity_sold, price_at_sale_paise
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY sale_item_id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Counts recorded sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn add_product(db: &Database, name: &str, price_paise: i64, stock: i64) -> i64 {
        db.products()
            .insert(&NewProduct {
                name: name.to_string(),
                barcode: None,
                price_paise,
                stock_quantity: stock,
            })
            .await
            .unwrap()
            .product_id
    }

    #[tokio::test]
    async fn test_record_cash_sale_decrements_stock() {
        let db = test_db().await;
        let biscuits = add_product(&db, "Parle-G 250g", 5000, 10).await;
        let tea = add_product(&db, "Red Label 500g", 3000, 5).await;

        let draft = SaleDraft {
            total_paise: 15340,
            gst_paise: 2340,
            payment_method: PaymentMethod::CashCard,
            flat_id: None,
            lines: vec![
                SaleLine {
                    product_id: biscuits,
                    quantity: 2,
                    price_at_sale_paise: 5000,
                },
                SaleLine {
                    product_id: tea,
                    quantity: 1,
                    price_at_sale_paise: 3000,
                },
            ],
        };

        let sale_id = db.sales().record_sale(&draft).await.unwrap();

        let sale = db.sales().get_by_id(sale_id).await.unwrap().unwrap();
        assert_eq!(sale.total_paise, 15340);
        assert_eq!(sale.gst_paise, 2340);
        assert_eq!(sale.payment_method, PaymentMethod::CashCard);
        assert_eq!(sale.flat_id, None);

        let items = db.sales().items_for_sale(sale_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity_sold, 2);
        assert_eq!(items[0].price_at_sale_paise, 5000);

        // Each product's stock dropped by exactly its line quantity
        let biscuits_row = db.products().get_by_id(biscuits).await.unwrap().unwrap();
        let tea_row = db.products().get_by_id(tea).await.unwrap().unwrap();
        assert_eq!(biscuits_row.stock_quantity, 8);
        assert_eq!(tea_row.stock_quantity, 4);
    }

    #[tokio::test]
    async fn test_record_credit_sale_charges_flat() {
        let db = test_db().await;
        let product = add_product(&db, "Rice 5kg", 40000, 6).await;
        let flat = db.flats().list(None).await.unwrap()[0].clone();

        let draft = SaleDraft {
            total_paise: 47200,
            gst_paise: 7200,
            payment_method: PaymentMethod::Credit,
            flat_id: Some(flat.flat_id),
            lines: vec![SaleLine {
                product_id: product,
                quantity: 1,
                price_at_sale_paise: 40000,
            }],
        };

        db.sales().record_sale(&draft).await.unwrap();

        let charged = db.flats().get_by_id(flat.flat_id).await.unwrap().unwrap();
        assert_eq!(
            charged.credit_balance_paise,
            flat.credit_balance_paise + 47200
        );
    }

    #[tokio::test]
    async fn test_cash_sale_leaves_flats_untouched() {
        let db = test_db().await;
        let product = add_product(&db, "Soap", 3500, 9).await;

        let draft = SaleDraft {
            total_paise: 4130,
            gst_paise: 630,
            payment_method: PaymentMethod::CashCard,
            flat_id: None,
            lines: vec![SaleLine {
                product_id: product,
                quantity: 1,
                price_at_sale_paise: 3500,
            }],
        };
        db.sales().record_sale(&draft).await.unwrap();

        let flats = db.flats().list(None).await.unwrap();
        assert!(flats.iter().all(|f| f.credit_balance_paise == 0));
    }

    #[tokio::test]
    async fn test_failed_sale_rolls_back_completely() {
        let db = test_db().await;
        let real = add_product(&db, "Real Product", 2000, 10).await;

        // Second line references a product that doesn't exist; the
        // foreign key fails after the header, the first item, and the
        // first stock decrement have executed.
        let draft = SaleDraft {
            total_paise: 4720,
            gst_paise: 720,
            payment_method: PaymentMethod::CashCard,
            flat_id: None,
            lines: vec![
                SaleLine {
                    product_id: real,
                    quantity: 2,
                    price_at_sale_paise: 2000,
                },
                SaleLine {
                    product_id: 99999,
                    quantity: 1,
                    price_at_sale_paise: 0,
                },
            ],
        };

        let err = db.sales().record_sale(&draft).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // No partial state is observable
        assert_eq!(db.sales().count().await.unwrap(), 0);
        let untouched = db.products().get_by_id(real).await.unwrap().unwrap();
        assert_eq!(untouched.stock_quantity, 10);
    }

    #[tokio::test]
    async fn test_price_snapshot_survives_catalog_edit() {
        let db = test_db().await;
        let product = add_product(&db, "Sugar 1kg", 4500, 10).await;

        let draft = SaleDraft {
            total_paise: 5310,
            gst_paise: 810,
            payment_method: PaymentMethod::CashCard,
            flat_id: None,
            lines: vec![SaleLine {
                product_id: product,
                quantity: 1,
                price_at_sale_paise: 4500,
            }],
        };
        let sale_id = db.sales().record_sale(&draft).await.unwrap();

        // Reprice the product after the sale
        db.products()
            .update(
                product,
                &NewProduct {
                    name: "Sugar 1kg".to_string(),
                    barcode: None,
                    price_paise: 9900,
                    stock_quantity: 9,
                },
            )
            .await
            .unwrap();

        let items = db.sales().items_for_sale(sale_id).await.unwrap();
        assert_eq!(items[0].price_at_sale_paise, 4500);
    }
}
