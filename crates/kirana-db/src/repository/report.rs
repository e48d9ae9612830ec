//! # Report Repository
//!
//! The daily sales aggregation backing the reports screen.
//!
//! One query: per calendar day (UTC) inside the trailing window, the
//! units sold and revenue for a single product, computed from the frozen
//! `price_at_sale_paise` so later catalog edits never change history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kirana_core::Money;

/// One day's aggregated sales for a product.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    /// The calendar day (UTC).
    pub day: NaiveDate,
    /// Total units of the product sold that day.
    pub units_sold: i64,
    /// Total revenue (Σ quantity × price-at-sale) in paise.
    pub revenue_paise: i64,
}

impl DailySales {
    /// Returns the day's revenue as Money.
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_paise(self.revenue_paise)
    }
}

/// Repository for sales aggregation queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Aggregates a product's sales per calendar day since the cutoff,
    /// ordered chronologically. Days with no sales produce no row;
    /// no sales at all produce an empty result.
    pub async fn daily_sales(
        &self,
        product_id: i64,
        since: DateTime<Utc>,
    ) -> DbResult<Vec<DailySales>> {
        debug!(product_id, %since, "Aggregating daily sales");

        let rows = sqlx::query_as::<_, DailySales>(
            r#"
            SELECT
                date(s.sale_date) AS day,
                SUM(si.quantity_sold) AS units_sold,
                SUM(si.quantity_sold * si.price_at_sale_paise) AS revenue_paise
            FROM sales s
            JOIN sale_items si ON si.sale_id = s.sale_id
            WHERE si.product_id = ?1 AND s.sale_date >= ?2
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(product_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
