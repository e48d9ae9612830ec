//! # Sales Reports
//!
//! The reports screen: a per-product, per-day aggregation over a
//! trailing window, plus the window totals shown above the chart.
//! Rendering is the shell's concern; this module returns the data.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PosError;
use kirana_core::{Money, ValidationError};
use kirana_db::{DailySales, Database};

/// Default trailing window for the reports screen.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// A product's sales over the trailing window.
///
/// `rows` is empty when the product had no sales in range; the shell
/// renders a placeholder in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub product_id: i64,
    pub window_days: i64,
    /// Per-day buckets, chronological.
    pub rows: Vec<DailySales>,
    /// Total units sold across the window.
    pub total_units: i64,
    /// Total revenue across the window, in paise.
    pub total_revenue_paise: i64,
}

impl SalesReport {
    /// Returns the window revenue as Money.
    #[inline]
    pub fn total_revenue(&self) -> Money {
        Money::from_paise(self.total_revenue_paise)
    }

    /// True when there were no sales in the window.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds the daily sales report for one product.
///
/// `window_days` defaults to [`DEFAULT_WINDOW_DAYS`] and must be
/// positive when given.
pub async fn daily_sales(
    db: &Database,
    product_id: i64,
    window_days: Option<i64>,
) -> Result<SalesReport, PosError> {
    let window_days = window_days.unwrap_or(DEFAULT_WINDOW_DAYS);
    if window_days <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "window days".to_string(),
        }
        .into());
    }

    // The combo box only offers existing products, but the API shouldn't
    // silently report zeros for an id that was never real
    db.products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| PosError::not_found("Product", product_id))?;

    let since = Utc::now() - Duration::days(window_days);
    let rows = db.reports().daily_sales(product_id, since).await?;

    let total_units = rows.iter().map(|r| r.units_sold).sum();
    let total_revenue_paise = rows.iter().map(|r| r.revenue_paise).sum();

    debug!(
        product_id,
        window_days,
        days_with_sales = rows.len(),
        total_units,
        "Report built"
    );

    Ok(SalesReport {
        product_id,
        window_days,
        rows,
        total_units,
        total_revenue_paise,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{CheckoutSession, PaymentSelection};
    use crate::error::ErrorCode;
    use kirana_db::{DbConfig, NewProduct};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn add_product(db: &Database, name: &str, price: i64, stock: i64) -> i64 {
        db.products()
            .insert(&NewProduct {
                name: name.to_string(),
                barcode: None,
                price_paise: price,
                stock_quantity: stock,
            })
            .await
            .unwrap()
            .product_id
    }

    async fn sell(db: &Database, product_id: i64, units: i64) {
        let mut session = CheckoutSession::begin(db).await.unwrap();
        for _ in 0..units {
            session.add_product(db, product_id).await.unwrap();
        }
        session
            .checkout(db, PaymentSelection::cash_card())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_report_totals() {
        let db = test_db().await;
        let product = add_product(&db, "Parle-G 250g", 2500, 50).await;
        let other = add_product(&db, "Unrelated", 9900, 50).await;

        sell(&db, product, 2).await;
        sell(&db, product, 3).await;
        sell(&db, other, 1).await;

        let report = daily_sales(&db, product, None).await.unwrap();
        assert_eq!(report.window_days, DEFAULT_WINDOW_DAYS);
        assert_eq!(report.total_units, 5);
        assert_eq!(report.total_revenue_paise, 5 * 2500);
        assert!(!report.is_empty());
        assert_eq!(report.rows.len(), 1); // all sold today
    }

    #[tokio::test]
    async fn test_report_empty_without_sales() {
        let db = test_db().await;
        let product = add_product(&db, "Unsold", 1000, 10).await;

        let report = daily_sales(&db, product, None).await.unwrap();
        assert!(report.is_empty());
        assert_eq!(report.total_units, 0);
        assert!(report.total_revenue().is_zero());
    }

    #[tokio::test]
    async fn test_report_rejects_bad_window() {
        let db = test_db().await;
        let product = add_product(&db, "Any", 1000, 10).await;

        let err = daily_sales(&db, product, Some(0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_report_unknown_product() {
        let db = test_db().await;
        let err = daily_sales(&db, 404, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_report_serializes_camel_case() {
        let db = test_db().await;
        let product = add_product(&db, "Serialized", 2500, 50).await;
        sell(&db, product, 1).await;

        let report = daily_sales(&db, product, None).await.unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalUnits"], 1);
        assert_eq!(json["rows"][0]["unitsSold"], 1);
        assert_eq!(json["rows"][0]["revenuePaise"], 2500);
    }
}
