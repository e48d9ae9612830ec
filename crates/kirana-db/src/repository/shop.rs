//! # Shop Repository
//!
//! Access to the singleton `shop_info` configuration row. The row is
//! seeded on first run; `get` treats its absence as a storage error
//! rather than a normal state.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kirana_core::ShopInfo;

/// Repository for the shop configuration row.
#[derive(Debug, Clone)]
pub struct ShopRepository {
    pool: SqlitePool,
}

impl ShopRepository {
    /// Creates a new ShopRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShopRepository { pool }
    }

    /// Gets the shop configuration.
    pub async fn get(&self) -> DbResult<ShopInfo> {
        let info = sqlx::query_as::<_, ShopInfo>(
            r#"
            SELECT id, shop_name, address, phone, gst_number, gst_rate_bps
            FROM shop_info
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("ShopInfo", 1))?;

        Ok(info)
    }

    /// Sets the GST rate applied to all new sales.
    pub async fn set_gst_rate(&self, gst_rate_bps: u32) -> DbResult<()> {
        debug!(gst_rate_bps, "Updating GST rate");

        let result = sqlx::query("UPDATE shop_info SET gst_rate_bps = ?1 WHERE id = 1")
            .bind(gst_rate_bps)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ShopInfo", 1));
        }

        Ok(())
    }

    /// Updates the shop identity shown on receipts.
    pub async fn update_details(
        &self,
        shop_name: &str,
        address: &str,
        phone: &str,
        gst_number: &str,
    ) -> DbResult<()> {
        debug!(shop_name, "Updating shop details");

        let result = sqlx::query(
            r#"
            UPDATE shop_info
            SET shop_name = ?1, address = ?2, phone = ?3, gst_number = ?4
            WHERE id = 1
            "#,
        )
        .bind(shop_name)
        .bind(address)
        .bind(phone)
        .bind(gst_number)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ShopInfo", 1));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_get_and_set_gst_rate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let info = db.shop().get().await.unwrap();
        assert_eq!(info.gst_rate_bps, 1800);
        assert_eq!(info.gst_rate().percentage(), 18.0);

        db.shop().set_gst_rate(1200).await.unwrap();
        assert_eq!(db.shop().get().await.unwrap().gst_rate_bps, 1200);
    }

    #[tokio::test]
    async fn test_update_details() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.shop()
            .update_details("Society StorePro", "Sector 12", "98200-00000", "27AAAAA0000A1Z5")
            .await
            .unwrap();

        let info = db.shop().get().await.unwrap();
        assert_eq!(info.shop_name, "Society StorePro");
        assert_eq!(info.gst_number, "27AAAAA0000A1Z5");
    }
}
