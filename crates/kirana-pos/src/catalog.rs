//! # Catalog Management
//!
//! The inventory screen's operations: list/search, add, edit, delete.
//!
//! Form fields arrive as the raw text the operator typed; all parsing
//! and validation goes through `kirana_core::validation` before anything
//! touches the store.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::PosError;
use kirana_core::validation::{parse_price, parse_stock, validate_product_name, validate_search_query};
use kirana_core::{CoreError, Product};
use kirana_db::{Database, NewProduct};

// =============================================================================
// Product Form
// =============================================================================

/// Raw operator input from the add/edit product dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: String,
    /// Price as typed, e.g. "50" or "50.99".
    pub price: String,
    /// Stock quantity as typed, e.g. "12".
    pub stock: String,
    /// Optional barcode; blank is treated as absent.
    pub barcode: Option<String>,
}

impl ProductForm {
    /// Validates the form into storage-ready data.
    ///
    /// All three required fields must be present; price must parse as a
    /// non-negative amount, stock as a non-negative integer.
    fn validate(&self) -> Result<NewProduct, PosError> {
        let name = validate_product_name(&self.name)?;
        let price = parse_price(&self.price)?;
        let stock = parse_stock(&self.stock)?;

        let barcode = self
            .barcode
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(String::from);

        Ok(NewProduct {
            name,
            barcode,
            price_paise: price.paise(),
            stock_quantity: stock,
        })
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Lists products, optionally filtered by a case-insensitive substring
/// match on the name, ordered by name.
pub async fn list_products(db: &Database, filter: Option<&str>) -> Result<Vec<Product>, PosError> {
    let filter = match filter {
        Some(f) => Some(validate_search_query(f)?),
        None => None,
    };

    Ok(db.products().list(filter.as_deref()).await?)
}

/// Lists the purchasable products (stock > 0) shown on the sale screen.
pub async fn purchasable_products(db: &Database) -> Result<Vec<Product>, PosError> {
    Ok(db.products().list_in_stock().await?)
}

/// Adds a product from validated form input.
pub async fn add_product(db: &Database, form: &ProductForm) -> Result<Product, PosError> {
    let new = form.validate()?;
    let product = db.products().insert(&new).await?;

    info!(product_id = product.product_id, name = %product.name, "Product added");
    Ok(product)
}

/// Edits a product in place from validated form input.
pub async fn edit_product(db: &Database, id: i64, form: &ProductForm) -> Result<(), PosError> {
    let changes = form.validate()?;
    db.products().update(id, &changes).await?;

    info!(product_id = id, "Product updated");
    Ok(())
}

/// Deletes a product.
///
/// Blocked when the product appears in any past sale: removing it would
/// orphan the sale history.
pub async fn delete_product(db: &Database, id: i64) -> Result<(), PosError> {
    let product = db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| PosError::not_found("Product", id))?;

    if db.products().sale_reference_count(id).await? > 0 {
        return Err(CoreError::ReferencedBySale { name: product.name }.into());
    }

    db.products().delete(id).await?;

    info!(product_id = id, "Product deleted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{CheckoutSession, PaymentSelection};
    use crate::error::ErrorCode;
    use kirana_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn form(name: &str, price: &str, stock: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            stock: stock.to_string(),
            barcode: None,
        }
    }

    #[tokio::test]
    async fn test_add_product_parses_form() {
        let db = test_db().await;

        let product = add_product(&db, &form("Parle-G 250g", "25.00", "48"))
            .await
            .unwrap();
        assert_eq!(product.price_paise, 2500);
        assert_eq!(product.stock_quantity, 48);
    }

    #[tokio::test]
    async fn test_add_product_rejects_bad_input() {
        let db = test_db().await;

        let err = add_product(&db, &form("", "25.00", "48")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_product(&db, &form("X", "abc", "48")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_product(&db, &form("X", "25.00", "-1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // Nothing was persisted
        assert!(list_products(&db, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_barcode_is_absent() {
        let db = test_db().await;

        let mut f = form("No Barcode", "10", "5");
        f.barcode = Some("   ".to_string());
        let product = add_product(&db, &f).await.unwrap();
        assert_eq!(product.barcode, None);

        // Two blank-barcode products must not collide on uniqueness
        let mut g = form("Also No Barcode", "10", "5");
        g.barcode = Some(String::new());
        add_product(&db, &g).await.unwrap();
    }

    #[tokio::test]
    async fn test_edit_product() {
        let db = test_db().await;
        let product = add_product(&db, &form("Maggi", "14", "30")).await.unwrap();

        edit_product(&db, product.product_id, &form("Maggi Masala", "15.50", "25"))
            .await
            .unwrap();

        let listed = list_products(&db, Some("maggi")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Maggi Masala");
        assert_eq!(listed[0].price_paise, 1550);
    }

    #[tokio::test]
    async fn test_delete_unsold_product() {
        let db = test_db().await;
        let product = add_product(&db, &form("Unsold", "10", "5")).await.unwrap();

        delete_product(&db, product.product_id).await.unwrap();
        assert!(list_products(&db, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_sold_product_is_blocked() {
        let db = test_db().await;
        let product = add_product(&db, &form("Sold Once", "10", "5")).await.unwrap();

        let mut session = CheckoutSession::begin(&db).await.unwrap();
        session.add_product(&db, product.product_id).await.unwrap();
        session
            .checkout(&db, PaymentSelection::cash_card())
            .await
            .unwrap();

        let err = delete_product(&db, product.product_id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessRule);
        assert!(err.message.contains("Sold Once"));

        // The product remains
        assert_eq!(list_products(&db, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let db = test_db().await;
        let err = delete_product(&db, 404).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
