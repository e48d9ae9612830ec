//! # Error Types
//!
//! Domain-specific error types for kirana-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kirana-core errors (this file)                                         │
//! │  ├── CoreError        - Business-rule violations                        │
//! │  └── ValidationError  - Operator-input failures                         │
//! │                                                                         │
//! │  kirana-db errors (separate crate)                                      │
//! │  └── DbError          - Storage operation failures                      │
//! │                                                                         │
//! │  kirana-pos errors (service layer)                                      │
//! │  └── PosError         - What the operator sees                          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → PosError → Operator      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, amounts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a specific operator-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Business-rule violations.
///
/// Every variant here aborts the operation with no state change; the
/// service layer translates them into operator-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was attempted with no lines in the cart.
    #[error("Cannot checkout with an empty cart")]
    EmptyCart,

    /// Adding one more unit would exceed the last-loaded stock level.
    ///
    /// ## User Workflow
    /// ```text
    /// Add '{name}' to cart (already {available} in cart, {available} in stock)
    ///      │
    ///      ▼
    /// StockLimit { name, available }
    ///      │
    ///      ▼
    /// UI shows: "No more 'Parle-G' in stock"
    /// ```
    #[error("No more '{name}' in stock (available: {available})")]
    StockLimit { name: String, available: i64 },

    /// The product is not in the cart.
    #[error("Product {product_id} is not in the cart")]
    NotInCart { product_id: i64 },

    /// Credit payment was confirmed without selecting a flat.
    #[error("A flat must be selected for a credit payment")]
    FlatRequired,

    /// A payment was attempted against a flat with nothing due.
    #[error("Flat {flat_number} has no outstanding credit")]
    NothingDue { flat_number: String },

    /// A payment larger than the outstanding balance was attempted.
    #[error("Payment of {requested} exceeds the outstanding credit of {balance}")]
    PaymentExceedsBalance { requested: Money, balance: Money },

    /// A product referenced by past sales cannot be deleted.
    #[error("Cannot delete '{name}' as it is part of a past sale")]
    ReferencedBySale { name: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Operator-input validation errors.
///
/// These occur when form input doesn't meet requirements. Used for early
/// validation before any business logic or storage access runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// The field did not parse as a number of the expected shape.
    #[error("{field} must be a valid number")]
    InvalidNumber { field: String },

    /// The value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// The value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
