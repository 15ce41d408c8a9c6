//! # Error Types
//!
//! Domain-specific error types for veriscan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  veriscan-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Manual-entry input failures                    │
//! │                                                                         │
//! │  veriscan-resolve errors (separate crate)                              │
//! │  └── ResolveError     - Provider call failures (never escape resolve)  │
//! │                                                                         │
//! │  veriscan-session errors (separate crate)                              │
//! │  └── SessionError     - Camera/channel failures                        │
//! │                                                                         │
//! │  NOTE: a malformed BARCODE is not an error anywhere in this crate.    │
//! │  Decoders misread frames constantly; malformed input surfaces as      │
//! │  is_valid=false on the validation result instead.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, reason)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for user-typed input.
///
/// These only apply to the manual-entry path, where a human typed the
/// barcode and deserves a precise message. Barcodes coming from the decoder
/// never produce errors (see module docs).
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value has the wrong length.
    #[error("{field} must be exactly {expected:?} digits long")]
    WrongLength { field: String, expected: Vec<usize> },

    /// Invalid format (non-digit characters, etc.).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
