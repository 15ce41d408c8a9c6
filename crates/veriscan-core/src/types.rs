//! # Domain Types
//!
//! Core domain types used throughout Veriscan.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────────────┐   ┌───────────────────┐   ┌─────────────────┐  │
//! │  │ BarcodeValidation │   │      Product      │   │     Verdict     │  │
//! │  │  ───────────────  │   │  ───────────────  │   │  ─────────────  │  │
//! │  │  is_valid         │   │  name             │   │  Safe           │  │
//! │  │  country_code     │   │  manufacturer     │   │  CounterfeitRisk│  │
//! │  │  country_name     │   │  allergens?       │   │  ParallelImport │  │
//! │  └───────────────────┘   │  image?           │   │  Unverified     │  │
//! │                          │  is_valid / found │   └─────────────────┘  │
//! │                          │  is_food?         │                         │
//! │                          └───────────────────┘                         │
//! │                                                                         │
//! │  is_valid and found are ORTHOGONAL and both always surfaced:           │
//! │  • found    = some provider positively identified the barcode          │
//! │  • is_valid = the GS1 prefix is a legitimate country allocation        │
//! │  A found-but-invalid product signals parallel import / repackaging.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Fallback Strings
// =============================================================================

/// Product name used when no provider knew the barcode.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Manufacturer used when neither the database nor inference produced one.
pub const UNKNOWN_MANUFACTURER: &str = "Unknown Manufacturer";

/// Allergen text used when the database carried no allergen data.
pub const UNKNOWN_ALLERGENS: &str = "Unknown Allergens";

/// Name/manufacturer used when the whole resolution orchestration failed.
pub const REFER_TO_PACKAGING: &str = "Refer to product packaging";

// =============================================================================
// Barcode Validation Result
// =============================================================================

/// Outcome of GS1 prefix validation for one barcode.
///
/// An unmatched or malformed barcode yields `is_valid == false` with empty
/// country fields; it is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeValidation {
    /// True iff a prefix-table entry matched.
    pub is_valid: bool,

    /// ISO 3166-1 alpha-2 code of the issuing country ("" if unmatched).
    pub country_code: String,

    /// Human-readable country name ("" if unmatched).
    pub country_name: String,
}

impl BarcodeValidation {
    /// The result for any barcode that matched nothing.
    pub fn invalid() -> Self {
        BarcodeValidation {
            is_valid: false,
            country_code: String::new(),
            country_name: String::new(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Best-effort product record assembled by the resolution pipeline.
///
/// Every field is always populated with *something* — the pipeline degrades
/// to the fallback strings above rather than ever omitting data or failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product display name.
    pub name: String,

    /// Manufacturer / brand owner.
    pub manufacturer: String,

    /// Allergen summary from the primary database, if any.
    pub allergens: Option<String>,

    /// Product image URL, if any provider produced one.
    pub image: Option<String>,

    /// Issuing country code from GS1 prefix validation ("" if unmatched).
    pub country_code: String,

    /// Issuing country name from GS1 prefix validation ("" if unmatched).
    pub country_name: String,

    /// Whether the GS1 prefix is a legitimate country allocation.
    pub is_valid: bool,

    /// Whether any provider positively identified the barcode.
    pub found: bool,

    /// Food vs. non-food classification from the inference provider.
    /// `None` means the inference stage never produced an answer.
    pub is_food: Option<bool>,

    /// The barcode this record was resolved from.
    pub barcode: String,

    /// When the scan was resolved.
    pub scanned_at: DateTime<Utc>,
}

impl Product {
    /// Derives the display verdict from the validity/found combination.
    pub fn verdict(&self) -> Verdict {
        match (self.is_valid, self.found) {
            (true, true) => Verdict::Safe,
            (false, false) => Verdict::CounterfeitRisk,
            (false, true) => Verdict::ParallelImport,
            (true, false) => Verdict::Unverified,
        }
    }

    /// The global fallback record returned only when the entire resolution
    /// orchestration failed.
    pub fn refer_to_packaging(barcode: &str, validation: BarcodeValidation) -> Self {
        Product {
            name: REFER_TO_PACKAGING.to_string(),
            manufacturer: REFER_TO_PACKAGING.to_string(),
            allergens: None,
            image: None,
            country_code: validation.country_code,
            country_name: validation.country_name,
            is_valid: validation.is_valid,
            found: false,
            is_food: None,
            barcode: barcode.to_string(),
            scanned_at: Utc::now(),
        }
    }
}

// =============================================================================
// Verdict
// =============================================================================

/// User-facing safety verdict derived from a resolved product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Prefix valid and product found: genuine as far as we can tell.
    Safe,
    /// Prefix invalid and product unknown: barcode matches no GS1 records.
    CounterfeitRisk,
    /// Product found but prefix invalid: likely parallel import or
    /// repackaged goods.
    ParallelImport,
    /// Prefix valid but no provider knew the product.
    Unverified,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Safe => write!(f, "safe"),
            Verdict::CounterfeitRisk => write!(f, "counterfeit_risk"),
            Verdict::ParallelImport => write!(f, "parallel_import"),
            Verdict::Unverified => write!(f, "unverified"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
