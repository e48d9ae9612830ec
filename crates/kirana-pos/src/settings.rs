//! # Shop Settings
//!
//! Reads and edits the singleton shop configuration: the identity
//! printed on receipts and the GST rate applied to all new sales.
//! A rate change takes effect for sessions begun after the edit.

use tracing::info;

use crate::error::PosError;
use kirana_core::validation::validate_gst_rate_bps;
use kirana_core::{GstRate, ShopInfo};
use kirana_db::Database;

/// Gets the shop configuration.
pub async fn shop_info(db: &Database) -> Result<ShopInfo, PosError> {
    Ok(db.shop().get().await?)
}

/// Sets the GST rate applied to all new sales.
pub async fn set_gst_rate(db: &Database, rate: GstRate) -> Result<(), PosError> {
    validate_gst_rate_bps(rate.bps())?;
    db.shop().set_gst_rate(rate.bps()).await?;

    info!(gst_rate_bps = rate.bps(), "GST rate updated");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::CheckoutSession;
    use crate::error::ErrorCode;
    use kirana_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_set_gst_rate_applies_to_next_session() {
        let db = test_db().await;
        assert_eq!(shop_info(&db).await.unwrap().gst_rate_bps, 1800);

        set_gst_rate(&db, GstRate::from_percentage(12.0)).await.unwrap();

        let session = CheckoutSession::begin(&db).await.unwrap();
        assert_eq!(session.gst_rate().bps(), 1200);
    }

    #[tokio::test]
    async fn test_set_gst_rate_rejects_over_100_percent() {
        let db = test_db().await;

        let err = set_gst_rate(&db, GstRate::from_bps(10001)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(shop_info(&db).await.unwrap().gst_rate_bps, 1800);
    }
}
