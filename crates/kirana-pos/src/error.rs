//! # Operator-Facing Error Type
//!
//! Unified error type for the service layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kirana POS                             │
//! │                                                                         │
//! │  Validation failure  ──► ValidationError ──┐                            │
//! │  Business rule       ──► CoreError ────────┼──► PosError { code, msg }  │
//! │  Storage failure     ──► DbError ──────────┘          │                 │
//! │                                                       ▼                 │
//! │  Validation and business-rule messages pass through verbatim;           │
//! │  storage internals are logged and flattened to a generic message.       │
//! │  Nothing is retried automatically.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use kirana_core::{CoreError, ValidationError};
use kirana_db::DbError;

/// Error returned from every service operation.
///
/// Carries a machine-readable `code` for programmatic handling and a
/// human-readable `message` the operator can be shown directly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Operator input failed validation
    ValidationError,

    /// A business rule blocked the operation
    BusinessRule,

    /// Adding to the cart would exceed available stock
    StockLimit,

    /// Payment rejected (overpayment and the like)
    PaymentError,

    /// Storage failure; details are in the log, not the message
    StorageError,
}

impl PosError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        PosError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        PosError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a business-rule error.
    pub fn business_rule(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::BusinessRule, message)
    }
}

/// Converts storage errors to operator-facing errors.
///
/// Not-found and uniqueness keep a specific message; everything else is
/// a generic storage failure with the detail logged.
impl From<DbError> for PosError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => PosError::not_found(&entity, id),
            DbError::UniqueViolation { field, value: _ } => PosError::new(
                ErrorCode::ValidationError,
                format!("{} already exists", field),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                PosError::new(ErrorCode::StorageError, "Database operation failed")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                PosError::new(ErrorCode::StorageError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                PosError::new(ErrorCode::StorageError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                PosError::new(ErrorCode::StorageError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                PosError::new(ErrorCode::StorageError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                PosError::new(ErrorCode::StorageError, "Database operation failed")
            }
        }
    }
}

/// Converts business-rule violations to operator-facing errors.
///
/// The CoreError messages are already written for the operator, so they
/// pass through verbatim; only the code is assigned here.
impl From<CoreError> for PosError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::EmptyCart => ErrorCode::BusinessRule,
            CoreError::StockLimit { .. } => ErrorCode::StockLimit,
            CoreError::NotInCart { .. } => ErrorCode::BusinessRule,
            CoreError::FlatRequired => ErrorCode::BusinessRule,
            CoreError::NothingDue { .. } => ErrorCode::BusinessRule,
            CoreError::PaymentExceedsBalance { .. } => ErrorCode::PaymentError,
            CoreError::ReferencedBySale { .. } => ErrorCode::BusinessRule,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        PosError::new(code, err.to_string())
    }
}

/// Converts input-validation failures to operator-facing errors.
impl From<ValidationError> for PosError {
    fn from(err: ValidationError) -> Self {
        PosError::validation(err.to_string())
    }
}

impl std::fmt::Display for PosError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for PosError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kirana_core::Money;

    #[test]
    fn test_core_error_message_passes_through() {
        let err: PosError = CoreError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::BusinessRule);
        assert_eq!(err.message, "Cannot checkout with an empty cart");

        let err: PosError = CoreError::PaymentExceedsBalance {
            requested: Money::from_paise(25000),
            balance: Money::from_paise(20000),
        }
        .into();
        assert_eq!(err.code, ErrorCode::PaymentError);
    }

    #[test]
    fn test_storage_detail_is_flattened() {
        let err: PosError = DbError::QueryFailed("secret table layout".to_string()).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("secret"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let err = PosError::not_found("Product", 7);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: 7");
    }
}
