//! # Flat Repository
//!
//! Database operations for flats and the credit ledger.
//!
//! A flat's `credit_balance_paise` is only ever moved by two writers:
//! the sale-recording transaction (increment, on credit sales) and
//! `apply_payment` (decrement). The payment amount is validated against
//! the balance by the service layer before it reaches this repository.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kirana_core::Flat;

/// Repository for flat database operations.
#[derive(Debug, Clone)]
pub struct FlatRepository {
    pool: SqlitePool,
}

impl FlatRepository {
    /// Creates a new FlatRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FlatRepository { pool }
    }

    /// Lists flats, optionally filtered by a substring match on the flat
    /// number or the resident name, ordered by descending balance so the
    /// largest dues surface first.
    pub async fn list(&self, filter: Option<&str>) -> DbResult<Vec<Flat>> {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        debug!(?filter, "Listing flats");

        let flats = match filter {
            Some(term) => {
                let pattern = format!("%{}%", term);
                sqlx::query_as::<_, Flat>(
                    r#"
                    SELECT flat_id, flat_number, resident_name, credit_balance_paise
                    FROM flats
                    WHERE flat_number LIKE ?1 OR resident_name LIKE ?1
                    ORDER BY credit_balance_paise DESC
                    "#,
                )
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Flat>(
                    r#"
                    SELECT flat_id, flat_number, resident_name, credit_balance_paise
                    FROM flats
                    ORDER BY credit_balance_paise DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(flats)
    }

    /// Lists flats ordered by flat number, for the checkout dialog's
    /// flat selector.
    pub async fn list_for_selection(&self) -> DbResult<Vec<Flat>> {
        let flats = sqlx::query_as::<_, Flat>(
            r#"
            SELECT flat_id, flat_number, resident_name, credit_balance_paise
            FROM flats
            ORDER BY flat_number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(flats)
    }

    /// Gets a flat by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Flat>> {
        let flat = sqlx::query_as::<_, Flat>(
            r#"
            SELECT flat_id, flat_number, resident_name, credit_balance_paise
            FROM flats
            WHERE flat_id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(flat)
    }

    /// Decrements a flat's credit balance by a recorded payment.
    ///
    /// The amount must already be validated (positive, ≤ balance) by
    /// the caller.
    pub async fn apply_payment(&self, flat_id: i64, amount_paise: i64) -> DbResult<()> {
        debug!(flat_id, amount_paise, "Applying payment to flat");

        let result = sqlx::query(
            r#"
            UPDATE flats
            SET credit_balance_paise = credit_balance_paise - ?2
            WHERE flat_id = ?1
            "#,
        )
        .bind(flat_id)
        .bind(amount_paise)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Flat", flat_id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
