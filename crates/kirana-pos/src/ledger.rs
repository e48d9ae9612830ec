//! # Credit Ledger
//!
//! The flats screen: balance listing and payment recording.
//!
//! ## Payment Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_payment(flat, amount)                                           │
//! │                                                                         │
//! │  amount ≤ 0            → rejected (validation)                          │
//! │  balance ≤ 0           → rejected ("no outstanding credit")             │
//! │  amount > balance      → rejected, balance unchanged                    │
//! │  otherwise             → balance − amount                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The floor at zero is enforced by the pre-check against the balance
//! read here, not by a store constraint.

use tracing::info;

use crate::error::PosError;
use kirana_core::validation::parse_payment_amount;
use kirana_core::{CoreError, Flat, Money, ValidationError};
use kirana_db::Database;

/// Lists flats, optionally filtered by a substring match on the flat
/// number or resident name, largest dues first.
pub async fn list_flats(db: &Database, filter: Option<&str>) -> Result<Vec<Flat>, PosError> {
    Ok(db.flats().list(filter).await?)
}

/// Lists flats ordered by flat number, for the checkout dialog's
/// flat selector.
pub async fn flats_for_selection(db: &Database) -> Result<Vec<Flat>, PosError> {
    Ok(db.flats().list_for_selection().await?)
}

/// Records a payment against a flat's outstanding credit.
///
/// ## Returns
/// The flat's new balance.
pub async fn record_payment(
    db: &Database,
    flat_id: i64,
    amount: Money,
) -> Result<Money, PosError> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        }
        .into());
    }

    let flat = db
        .flats()
        .get_by_id(flat_id)
        .await?
        .ok_or_else(|| PosError::not_found("Flat", flat_id))?;

    if flat.credit_balance_paise <= 0 {
        return Err(CoreError::NothingDue {
            flat_number: flat.flat_number,
        }
        .into());
    }

    if amount.paise() > flat.credit_balance_paise {
        return Err(CoreError::PaymentExceedsBalance {
            requested: amount,
            balance: flat.credit_balance(),
        }
        .into());
    }

    db.flats().apply_payment(flat_id, amount.paise()).await?;

    let new_balance = flat.credit_balance() - amount;
    info!(
        flat_id,
        flat_number = %flat.flat_number,
        amount_paise = amount.paise(),
        new_balance_paise = new_balance.paise(),
        "Payment recorded"
    );

    Ok(new_balance)
}

/// Records a payment from the raw text the operator typed into the
/// amount dialog. Parsing rejects empty, malformed, and non-positive
/// input before [`record_payment`] applies the balance rules.
pub async fn record_payment_input(
    db: &Database,
    flat_id: i64,
    input: &str,
) -> Result<Money, PosError> {
    let amount = parse_payment_amount(input)?;
    record_payment(db, flat_id, amount).await
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

    /// Builds up a flat's balance the way it really happens: a credit sale.
    async fn charge_flat(db: &Database, flat_id: i64, price_paise: i64) -> i64 {
        let product = db
            .products()
            .insert(&NewProduct {
                name: "Charged Item".to_string(),
                barcode: None,
                price_paise,
                stock_quantity: 99,
            })
            .await
            .unwrap()
            .product_id;

        let mut session = CheckoutSession::begin(db).await.unwrap();
        session.add_product(db, product).await.unwrap();
        let receipt = session
            .checkout(db, PaymentSelection::credit(flat_id))
            .await
            .unwrap();
        receipt.total_paise
    }

    #[tokio::test]
    async fn test_payment_scenario() {
        let db = test_db().await;
        let flat_id = db.flats().list(None).await.unwrap()[0].flat_id;

        // Charge ₹200.00 to the flat (GST rate set to zero for round numbers)
        db.shop().set_gst_rate(0).await.unwrap();
        let charged = charge_flat(&db, flat_id, 20000).await;
        assert_eq!(charged, 20000);

        // ₹250.00 payment rejected, balance unchanged
        let err = record_payment(&db, flat_id, Money::from_paise(25000))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);
        let flat = db.flats().get_by_id(flat_id).await.unwrap().unwrap();
        assert_eq!(flat.credit_balance_paise, 20000);

        // ₹200.00 payment accepted, balance becomes zero
        let new_balance = record_payment(&db, flat_id, Money::from_paise(20000))
            .await
            .unwrap();
        assert!(new_balance.is_zero());
        let flat = db.flats().get_by_id(flat_id).await.unwrap().unwrap();
        assert_eq!(flat.credit_balance_paise, 0);
    }

    #[tokio::test]
    async fn test_partial_payment_decrements_exactly() {
        let db = test_db().await;
        let flat_id = db.flats().list(None).await.unwrap()[0].flat_id;

        db.shop().set_gst_rate(0).await.unwrap();
        charge_flat(&db, flat_id, 30000).await;

        record_payment(&db, flat_id, Money::from_paise(12500))
            .await
            .unwrap();

        let flat = db.flats().get_by_id(flat_id).await.unwrap().unwrap();
        assert_eq!(flat.credit_balance_paise, 17500);
    }

    #[tokio::test]
    async fn test_nothing_due_rejected() {
        let db = test_db().await;
        let flat = db.flats().list(None).await.unwrap()[0].clone();
        assert_eq!(flat.credit_balance_paise, 0);

        let err = record_payment(&db, flat.flat_id, Money::from_paise(100))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessRule);
        assert!(err.message.contains(&flat.flat_number));
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let db = test_db().await;
        let flat_id = db.flats().list(None).await.unwrap()[0].flat_id;

        let err = record_payment(&db, flat_id, Money::zero()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = record_payment(&db, flat_id, Money::from_paise(-100))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_payment_from_text_input() {
        let db = test_db().await;
        let flat_id = db.flats().list(None).await.unwrap()[0].flat_id;

        db.shop().set_gst_rate(0).await.unwrap();
        charge_flat(&db, flat_id, 20000).await;

        let err = record_payment_input(&db, flat_id, "two hundred")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let new_balance = record_payment_input(&db, flat_id, "75.50").await.unwrap();
        assert_eq!(new_balance.paise(), 20000 - 7550);
    }

    #[tokio::test]
    async fn test_unknown_flat_rejected() {
        let db = test_db().await;
        let err = record_payment(&db, 404, Money::from_paise(100))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_list_flats_filter_passthrough() {
        let db = test_db().await;
        let flats = list_flats(&db, Some("A-103")).await.unwrap();
        assert_eq!(flats.len(), 1);

        let selection = flats_for_selection(&db).await.unwrap();
        assert_eq!(selection.first().unwrap().flat_number, "A-101");
    }
}
