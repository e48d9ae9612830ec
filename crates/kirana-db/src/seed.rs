//! # First-Run Seeding
//!
//! Idempotent reference-data seeding applied at startup, after migrations.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Startup Seeding                                    │
//! │                                                                         │
//! │  shop_info empty? ──► insert the default singleton row (18% GST)        │
//! │  flats empty?     ──► insert sample flats A-101 … A-110                 │
//! │  anything exists  ──► touch nothing                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Seeding is a first-run convenience only; it must never overwrite data
//! that is already present.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Number of sample flats created on an empty flats table.
const SAMPLE_FLAT_COUNT: i64 = 10;

/// Ensures the default configuration row and sample flats exist.
///
/// Safe to call on every startup.
pub async fn ensure_defaults(pool: &SqlitePool) -> DbResult<()> {
    // Singleton config row; column defaults supply the shop identity
    // and the 18% GST rate.
    sqlx::query("INSERT OR IGNORE INTO shop_info (id) VALUES (1)")
        .execute(pool)
        .await?;

    let flat_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM flats")
        .fetch_one(pool)
        .await?;

    if flat_count == 0 {
        info!(count = SAMPLE_FLAT_COUNT, "Seeding sample flats");

        for i in 0..SAMPLE_FLAT_COUNT {
            sqlx::query("INSERT INTO flats (flat_number, resident_name) VALUES (?1, ?2)")
                .bind(format!("A-{}", 101 + i))
                .bind(format!("Resident {}", i + 1))
                .execute(pool)
                .await?;
        }
    }

    Ok(())
}
