//! # Error Types
//!
//! Domain-specific error types for techstore-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  techstore-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  techstore-api errors (separate crate)                                  │
//! │  └── ApiError         - Transport / auth / remote failures              │
//! │                                                                         │
//! │  techstore-export errors (separate crate)                               │
//! │  └── ExportError      - Document rendering failures                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → caller-facing message              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (codigo, id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations detected against the
/// in-memory snapshot, before anything reaches the network layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the local snapshot.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Client cannot be found in the local snapshot.
    #[error("Client not found: {0}")]
    ClientNotFound(i64),

    /// Sale cannot be found.
    #[error("Sale not found: {0}")]
    SaleNotFound(i64),

    /// Insufficient stock to capture a line item.
    ///
    /// The check runs against the cached product snapshot, so it can be
    /// stale relative to concurrent server-side stock changes. A known
    /// race, rejected locally anyway to save the round-trip.
    #[error("Insufficient stock for {codigo}: available {available}, requested {requested}")]
    InsufficientStock {
        codigo: String,
        available: i64,
        requested: i64,
    },

    /// A sale must carry at least one line item to be captured.
    #[error("Sale has no line items")]
    EmptySale,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet schema-level rules. Caught
/// before submission; they never reach the network layer.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email, non-numeric tax id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            codigo: "LAP-001".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for LAP-001: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "nombre".to_string(),
        };
        assert_eq!(err.to_string(), "nombre is required");

        let err = ValidationError::InvalidFormat {
            field: "dniRuc".to_string(),
            reason: "must contain only digits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "dniRuc has invalid format: must contain only digits"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "nombre".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
