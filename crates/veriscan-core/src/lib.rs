//! # veriscan-core: Pure Business Logic for Veriscan
//!
//! This crate is the **heart** of Veriscan. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Veriscan Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Presentation Layer (external)                    │   │
//! │  │    Camera view ──► Result card ──► Timeout warning              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ SessionSnapshot (watch channel)        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 veriscan-session (state machine)                │   │
//! │  │    sampling loop, inactivity countdown, freeze/dismiss          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 veriscan-resolve (provider pipeline)            │   │
//! │  │    database ► registry ► inference ► image search               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ veriscan-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  prefix   │  │validation │  │   types   │  │   error   │  │   │
//! │  │   │ GS1 table │  │  barcode  │  │  Product  │  │  checked  │  │   │
//! │  │   │  lookup   │  │  checks   │  │  Verdict  │  │  failures │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`prefix`] - The static GS1 prefix table and first-match lookup
//! - [`validation`] - Barcode and manual-entry validation
//! - [`types`] - Domain types (Product, BarcodeValidation, Verdict)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **No I/O**: network, timers and hardware live in the crates above
//! 3. **Malformed barcodes are data, not errors**: the decoder misreads
//!    frames constantly; `is_valid=false` is the answer, not a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use veriscan_core::validation::validate_barcode;
//!
//! let v = validate_barcode("4006381333931");
//! assert!(v.is_valid);
//! assert_eq!(v.country_code, "DE");
//!
//! // Malformed input never errors:
//! assert!(!validate_barcode("not a barcode").is_valid);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod prefix;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use veriscan_core::Product` instead of
// `use veriscan_core::types::Product`.

pub use error::{CoreError, CoreResult, ValidationError};
pub use prefix::{PrefixEntry, GS1_PREFIXES};
pub use types::{
    BarcodeValidation, Product, Verdict, REFER_TO_PACKAGING, UNKNOWN_ALLERGENS,
    UNKNOWN_MANUFACTURER, UNKNOWN_PRODUCT,
};
pub use validation::{validate_barcode, validate_manual_entry};
