//! # Validation Module
//!
//! Operator-input validation for Kirana POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Service layer (kirana-pos)                                    │
//! │  └── THIS MODULE: field presence, numeric parsing, ranges               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Business rules (CoreError)                                    │
//! │  └── stock caps, overpayment, empty cart, deletion guard                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  └── NOT NULL, UNIQUE, FOREIGN KEY constraints                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Product-form fields arrive as raw text from entry widgets, so the price
//! and stock validators double as parsers.

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use kirana_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Parle-G 250g").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(name.to_string())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns the unfiltered listing)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Parsers
// =============================================================================

/// Parses a price entered as text into Money.
///
/// ## Rules
/// - Must not be empty
/// - Must be a non-negative decimal number with at most two decimal places
///
/// ## Example
/// ```rust
/// use kirana_core::validation::parse_price;
///
/// assert_eq!(parse_price("50").unwrap().paise(), 5000);
/// assert_eq!(parse_price("50.5").unwrap().paise(), 5050);
/// assert_eq!(parse_price("50.99").unwrap().paise(), 5099);
/// assert!(parse_price("abc").is_err());
/// assert!(parse_price("-1").is_err());
/// ```
pub fn parse_price(input: &str) -> ValidationResult<Money> {
    parse_amount(input, "price")
}

/// Parses a payment amount entered as text into Money.
///
/// ## Rules
/// Same shape as [`parse_price`], and additionally must be strictly
/// positive: paying zero records nothing.
pub fn parse_payment_amount(input: &str) -> ValidationResult<Money> {
    let amount = parse_amount(input, "payment amount")?;

    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(amount)
}

/// Parses a two-decimal rupee amount into paise.
///
/// Done in integer arithmetic; going through f64 would corrupt amounts
/// like 0.29 before they ever reach the store.
fn parse_amount(input: &str, field: &str) -> ValidationResult<Money> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if input.starts_with('-') {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    let invalid = || ValidationError::InvalidNumber {
        field: field.to_string(),
    };

    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };

    if frac.len() > 2 || (whole.is_empty() && frac.is_empty()) {
        return Err(invalid());
    }

    let rupees: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };

    let paise: i64 = if frac.is_empty() {
        0
    } else {
        // "5" means 50 paise, "05" means 5 paise
        let padded = format!("{:0<2}", frac);
        padded.parse().map_err(|_| invalid())?
    };

    Ok(Money::from_paise(rupees * 100 + paise))
}

/// Parses a stock quantity entered as text.
///
/// ## Rules
/// - Must not be empty
/// - Must parse as a non-negative integer
///
/// ## Example
/// ```rust
/// use kirana_core::validation::parse_stock;
///
/// assert_eq!(parse_stock("12").unwrap(), 12);
/// assert!(parse_stock("12.5").is_err());
/// assert!(parse_stock("-1").is_err());
/// ```
pub fn parse_stock(input: &str) -> ValidationResult<i64> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "stock".to_string(),
        });
    }

    let stock: i64 = input.parse().map_err(|_| ValidationError::InvalidNumber {
        field: "stock".to_string(),
    })?;

    if stock < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stock".to_string(),
        });
    }

    Ok(stock)
}

/// Validates a GST rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_gst_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "gst_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert_eq!(
            validate_product_name("  Parle-G 250g ").unwrap(),
            "Parle-G 250g"
        );
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  milk ").unwrap(), "milk");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("50").unwrap().paise(), 5000);
        assert_eq!(parse_price("50.5").unwrap().paise(), 5050);
        assert_eq!(parse_price("50.05").unwrap().paise(), 5005);
        assert_eq!(parse_price(".75").unwrap().paise(), 75);
        assert_eq!(parse_price("0").unwrap().paise(), 0);

        assert!(parse_price("").is_err());
        assert!(parse_price("abc").is_err());
        assert!(parse_price("1.234").is_err());
        assert!(parse_price("-5").is_err());
        assert!(parse_price(".").is_err());
    }

    #[test]
    fn test_parse_payment_amount() {
        assert_eq!(parse_payment_amount("200").unwrap().paise(), 20000);
        assert!(parse_payment_amount("0").is_err());
        assert!(parse_payment_amount("-10").is_err());
    }

    #[test]
    fn test_parse_stock() {
        assert_eq!(parse_stock("0").unwrap(), 0);
        assert_eq!(parse_stock(" 42 ").unwrap(), 42);

        assert!(parse_stock("").is_err());
        assert!(parse_stock("12.5").is_err());
        assert!(parse_stock("-1").is_err());
        assert!(parse_stock("many").is_err());
    }

    #[test]
    fn test_validate_gst_rate_bps() {
        assert!(validate_gst_rate_bps(0).is_ok());
        assert!(validate_gst_rate_bps(1800).is_ok());
        assert!(validate_gst_rate_bps(10000).is_ok());
        assert!(validate_gst_rate_bps(10001).is_err());
    }
}
