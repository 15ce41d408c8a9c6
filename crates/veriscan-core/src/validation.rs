//! # Barcode Validation
//!
//! GS1 prefix validation and manual-entry input checks.
//!
//! ## Two Very Different Callers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Entry Points                            │
//! │                                                                         │
//! │  Decoder output (camera)                                               │
//! │  ├── Arrives constantly, often garbled                                 │
//! │  └── validate_barcode() ── NEVER errors, yields is_valid=false         │
//! │                                                                         │
//! │  Manual entry (human typed it)                                         │
//! │  ├── One-shot, user is waiting for feedback                            │
//! │  └── validate_manual_entry() ── Result with a precise message          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm
//! Accept only pure ASCII-digit strings of length exactly 8 (EAN-8) or 13
//! (EAN-13); take the leading 3 digits as the prefix candidate; walk the
//! GS1 table in declaration order; first match wins.

use crate::error::ValidationError;
use crate::prefix::{self, PrefixEntry, GS1_PREFIXES};
use crate::types::BarcodeValidation;

/// Result type for manual-entry validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Accepted barcode lengths: EAN-8 and EAN-13.
pub const ACCEPTED_LENGTHS: [usize; 2] = [8, 13];

// =============================================================================
// GS1 Prefix Validation
// =============================================================================

/// Classifies a barcode against the built-in GS1 prefix table.
///
/// Pure and deterministic: no I/O, no side effects. Malformed input is a
/// policy outcome (`is_valid == false`), never an error — the decoder feeds
/// this function imperfect strings all day.
///
/// ## Example
/// ```rust
/// use veriscan_core::validation::validate_barcode;
///
/// let v = validate_barcode("4006381333931");
/// assert!(v.is_valid);
/// assert_eq!(v.country_code, "DE");
/// assert_eq!(v.country_name, "Germany");
/// ```
pub fn validate_barcode(barcode: &str) -> BarcodeValidation {
    validate_against(GS1_PREFIXES, barcode)
}

/// Same as [`validate_barcode`] but against a caller-supplied table.
///
/// Exists so ordering-sensitivity can be tested with crafted tables.
pub fn validate_against(table: &[PrefixEntry], barcode: &str) -> BarcodeValidation {
    if !is_well_formed(barcode) {
        return BarcodeValidation::invalid();
    }

    // Length check guarantees at least 8 digits, so the slice is safe.
    let candidate = &barcode[..3];

    match prefix::lookup(table, candidate) {
        Some(entry) => BarcodeValidation {
            is_valid: true,
            country_code: entry.country_code.to_string(),
            country_name: entry.country_name.to_string(),
        },
        None => BarcodeValidation::invalid(),
    }
}

/// True iff the string is pure ASCII digits of an accepted length.
fn is_well_formed(barcode: &str) -> bool {
    ACCEPTED_LENGTHS.contains(&barcode.len())
        && barcode.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// Manual Entry Validation
// =============================================================================

/// Validates a hand-typed barcode and returns the normalized string.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must contain only digits
/// - Must be exactly 8 or 13 digits long
pub fn validate_manual_entry(input: &str) -> ValidationResult<String> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if !ACCEPTED_LENGTHS.contains(&input.len()) {
        return Err(ValidationError::WrongLength {
            field: "barcode".to_string(),
            expected: ACCEPTED_LENGTHS.to_vec(),
        });
    }

    Ok(input.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::PrefixEntry;

    #[test]
    fn test_known_german_prefix() {
        let v = validate_barcode("4006381333931");
        assert!(v.is_valid);
        assert_eq!(v.country_code, "DE");
        assert_eq!(v.country_name, "Germany");
    }

    #[test]
    fn test_ean8_zero_prefix_is_usa_and_canada() {
        let v = validate_barcode("00000000");
        assert!(v.is_valid);
        assert_eq!(v.country_code, "US");
        assert_eq!(v.country_name, "USA and Canada");
    }

    #[test]
    fn test_unallocated_prefix_is_invalid() {
        let v = validate_barcode("99999999");
        assert!(!v.is_valid);
        assert!(v.country_code.is_empty());
        assert!(v.country_name.is_empty());
    }

    #[test]
    fn test_wrong_lengths_are_invalid_not_errors() {
        for bad in ["", "0", "1234567", "123456789", "123456789012", "12345678901234"] {
            let v = validate_barcode(bad);
            assert!(!v.is_valid, "length {} should be invalid", bad.len());
            assert!(v.country_code.is_empty());
            assert!(v.country_name.is_empty());
        }
    }

    #[test]
    fn test_non_digit_input_is_invalid() {
        assert!(!validate_barcode("4006A81333931").is_valid);
        assert!(!validate_barcode("４００６３８１３").is_valid); // full-width digits
        assert!(!validate_barcode("4006-381333931").is_valid);
    }

    #[test]
    fn test_china_range_spot_check() {
        let v = validate_barcode("6901234567892");
        assert!(v.is_valid);
        assert_eq!(v.country_code, "CN");
    }

    #[test]
    fn test_ambiguous_table_earlier_declaration_wins() {
        // A single-digit entry and a three-digit range both match "690…";
        // whichever is declared first must win.
        let broad_first = [
            PrefixEntry {
                start: "6",
                end: None,
                country_code: "AA",
                country_name: "Broad",
            },
            PrefixEntry {
                start: "690",
                end: Some("695"),
                country_code: "CN",
                country_name: "China",
            },
        ];
        let v = validate_against(&broad_first, "6901234567892");
        assert_eq!(v.country_code, "AA");

        let narrow_first = [
            PrefixEntry {
                start: "690",
                end: Some("695"),
                country_code: "CN",
                country_name: "China",
            },
            PrefixEntry {
                start: "6",
                end: None,
                country_code: "AA",
                country_name: "Broad",
            },
        ];
        let v = validate_against(&narrow_first, "6901234567892");
        assert_eq!(v.country_code, "CN");
    }

    #[test]
    fn test_validate_manual_entry() {
        assert_eq!(
            validate_manual_entry(" 4006381333931 ").unwrap(),
            "4006381333931"
        );
        assert_eq!(validate_manual_entry("00000000").unwrap(), "00000000");

        assert!(matches!(
            validate_manual_entry(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_manual_entry("12ab5678"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_manual_entry("12345"),
            Err(ValidationError::WrongLength { .. })
        ));
    }
}
