//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Operations                                   │
//! │                                                                         │
//! │  Inventory screen                                                       │
//! │  ├── list(filter)          name LIKE %filter%, ordered by name          │
//! │  ├── insert / update       validated form data                          │
//! │  └── delete                blocked while referenced by sale_items       │
//! │                                                                         │
//! │  Sale screen                                                            │
//! │  ├── list_in_stock()       stock_quantity > 0 (the purchasable list)    │
//! │  ├── get_by_barcode        exact scanner lookup                         │
//! │  └── first_in_stock_matching   search-box add path                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kirana_core::Product;

/// Validated catalog form data, ready to insert or apply to a product.
///
/// Construction goes through `kirana_core::validation`, so by the time a
/// value reaches this repository the name is non-empty and price/stock
/// are non-negative.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub barcode: Option<String>,
    pub price_paise: i64,
    pub stock_quantity: i64,
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let listing = repo.list(Some("milk")).await?;
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products, optionally filtered by a case-insensitive
    /// substring match on the name, ordered by name.
    pub async fn list(&self, filter: Option<&str>) -> DbResult<Vec<Product>> {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        debug!(?filter, "Listing products");

        let products = match filter {
            Some(term) => {
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT product_id, barcode, name, price_paise, stock_quantity
                    FROM products
                    WHERE name LIKE ?1
                    ORDER BY name COLLATE NOCASE
                    "#,
                )
                .bind(format!("%{}%", term))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT product_id, barcode, name, price_paise, stock_quantity
                    FROM products
                    ORDER BY name COLLATE NOCASE
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// Lists products with stock on hand - the purchasable listing shown
    /// on the sale screen. Products at zero stock drop out.
    pub async fn list_in_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, barcode, name, price_paise, stock_quantity
            FROM products
            WHERE stock_quantity > 0
            ORDER BY name COLLATE NOCASE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, barcode, name, price_paise, stock_quantity
            FROM products
            WHERE product_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its barcode (exact match).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, barcode, name, price_paise, stock_quantity
            FROM products
            WHERE barcode = ?1
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Finds the first in-stock product whose name contains the query
    /// (case-insensitive). This backs the search-box add-to-cart path.
    pub async fn first_in_stock_matching(&self, query: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, barcode, name, price_paise, stock_quantity
            FROM products
            WHERE name LIKE ?1 AND stock_quantity > 0
            ORDER BY name COLLATE NOCASE
            LIMIT 1
            "#,
        )
        .bind(format!("%{}%", query.trim()))
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product and returns it with its assigned id.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - barcode already in use
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(name = %new.name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (barcode, name, price_paise, stock_quantity)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&new.barcode)
        .bind(&new.name)
        .bind(new.price_paise)
        .bind(new.stock_quantity)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            product_id: result.last_insert_rowid(),
            barcode: new.barcode.clone(),
            name: new.name.clone(),
            price_paise: new.price_paise,
            stock_quantity: new.stock_quantity,
        })
    }

    /// Updates an existing product in place.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - product doesn't exist
    pub async fn update(&self, id: i64, changes: &NewProduct) -> DbResult<()> {
        debug!(id, name = %changes.name, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET barcode = ?2, name = ?3, price_paise = ?4, stock_quantity = ?5
            WHERE product_id = ?1
            "#,
        )
        .bind(id)
        .bind(&changes.barcode)
        .bind(&changes.name)
        .bind(changes.price_paise)
        .bind(changes.stock_quantity)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts sale line items referencing a product.
    ///
    /// The deletion guard: a product with any past sale must not be
    /// deleted, or the sale history would dangle.
    pub async fn sale_reference_count(&self, id: i64) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sale_items WHERE product_id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Deletes a product.
    ///
    /// Callers are expected to have checked [`sale_reference_count`]
    /// first; the foreign key constraint is the backstop.
    ///
    /// [`sale_reference_count`]: ProductRepository::sale_reference_count
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE product_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_product(name: &str, price_paise: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            barcode: None,
            price_paise,
            stock_quantity: stock,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;

        let product = db
            .products()
            .insert(&new_product("Parle-G 250g", 2500, 40))
            .await
            .unwrap();
        assert!(product.product_id > 0);

        let fetched = db
            .products()
            .get_by_id(product.product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.name, "Parle-G 250g");
        assert_eq!(fetched.price_paise, 2500);
        assert_eq!(fetched.stock_quantity, 40);
    }

    #[tokio::test]
    async fn test_list_with_filter() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&new_product("Amul Milk 500ml", 3000, 12)).await.unwrap();
        repo.insert(&new_product("Amul Butter 100g", 5500, 8)).await.unwrap();
        repo.insert(&new_product("Maggi Noodles", 1400, 30)).await.unwrap();

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 3);
        // Ordered by name
        assert_eq!(all[0].name, "Amul Butter 100g");

        let filtered = repo.list(Some("amul")).await.unwrap();
        assert_eq!(filtered.len(), 2);

        let none = repo.list(Some("bread")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_list_in_stock_drops_zero_stock() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&new_product("In Stock", 1000, 3)).await.unwrap();
        repo.insert(&new_product("Sold Out", 1000, 0)).await.unwrap();

        let purchasable = repo.list_in_stock().await.unwrap();
        assert_eq!(purchasable.len(), 1);
        assert_eq!(purchasable[0].name, "In Stock");
    }

    #[tokio::test]
    async fn test_get_by_barcode() {
        let db = test_db().await;

        let mut with_barcode = new_product("Tata Salt 1kg", 2800, 20);
        with_barcode.barcode = Some("8901058000290".to_string());
        db.products().insert(&with_barcode).await.unwrap();

        let found = db
            .products()
            .get_by_barcode("8901058000290")
            .await
            .unwrap();
        assert_eq!(found.unwrap().name, "Tata Salt 1kg");

        let missing = db.products().get_by_barcode("0000000000000").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_barcode_rejected() {
        let db = test_db().await;

        let mut a = new_product("First", 1000, 1);
        a.barcode = Some("8901058000290".to_string());
        db.products().insert(&a).await.unwrap();

        let mut b = new_product("Second", 1000, 1);
        b.barcode = Some("8901058000290".to_string());
        let err = db.products().insert(&b).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_first_in_stock_matching() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&new_product("Amul Milk 500ml", 3000, 0)).await.unwrap();
        repo.insert(&new_product("Nandini Milk 500ml", 2700, 5)).await.unwrap();

        // The zero-stock match is skipped
        let found = repo.first_in_stock_matching("milk").await.unwrap().unwrap();
        assert_eq!(found.name, "Nandini Milk 500ml");
    }

    #[tokio::test]
    async fn test_update() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.insert(&new_product("Maggi", 1400, 30)).await.unwrap();

        repo.update(product.product_id, &new_product("Maggi Masala", 1500, 25))
            .await
            .unwrap();

        let updated = repo.get_by_id(product.product_id).await.unwrap().unwrap();
        assert_eq!(updated.name, "Maggi Masala");
        assert_eq!(updated.price_paise, 1500);
        assert_eq!(updated.stock_quantity, 25);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let db = test_db().await;
        let err = db
            .products()
            .update(999, &new_product("Ghost", 100, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.products();

        let product = repo.insert(&new_product("Short-lived", 100, 1)).await.unwrap();
        assert_eq!(repo.sale_reference_count(product.product_id).await.unwrap(), 0);

        repo.delete(product.product_id).await.unwrap();
        assert!(repo.get_by_id(product.product_id).await.unwrap().is_none());

        let err = repo.delete(product.product_id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
