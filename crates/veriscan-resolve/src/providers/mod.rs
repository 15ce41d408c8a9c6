//! # Provider Seams
//!
//! Trait definitions for the four external metadata sources the pipeline
//! consults. Each trait has one async operation with a crisp found/not-found
//! contract, so the resolver never has to second-guess what a provider
//! answered.
//!
//! ## Provider Contract Matrix
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Trait             Operation          Hit            Miss      Failure │
//! │  ───────────────   ────────────────   ────────────   ───────   ─────── │
//! │  ProductDatabase   lookup(barcode)    Some(record)   None      Err     │
//! │  NameRegistry      product_title      Some(title)    None      Err     │
//! │  InferenceProvider infer(name)        Inference      (always)  Err     │
//! │  ImageSearch       first_image(query) Some(url)      None      Err     │
//! │                                                                         │
//! │  "Miss" and "Failure" are DIFFERENT answers: a miss is the provider    │
//! │  confidently saying "I don't know this barcode"; a failure is the      │
//! │  provider being unreachable or unintelligible. The pipeline treats     │
//! │  both as degradation, but logs them differently.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Default HTTP implementations live in [`http`]. Tests inject in-memory
//! fakes instead.

use async_trait::async_trait;

use crate::error::ResolveResult;

pub mod http;

pub use http::{HttpImageSearch, HttpInferenceProvider, HttpNameRegistry, HttpProductDatabase};

// =============================================================================
// Record Types
// =============================================================================

/// Structured record from the primary product database.
///
/// Every field is optional: real-world database entries are sparse and a
/// record with only a name is still a hit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseRecord {
    /// Product display name.
    pub name: Option<String>,

    /// Brand or brand owner.
    pub brand: Option<String>,

    /// Product image URL.
    pub image: Option<String>,

    /// Allergen summary text.
    pub allergens: Option<String>,
}

/// Answer from the inference provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inference {
    /// Best-guess manufacturer, if the provider dared one.
    pub manufacturer: Option<String>,

    /// Food vs. non-food classification.
    pub is_food: bool,
}

impl Inference {
    /// The answer used when the inference provider is unreachable.
    pub fn unknown() -> Self {
        Inference {
            manufacturer: None,
            is_food: false,
        }
    }
}

// =============================================================================
// Provider Traits
// =============================================================================

/// Structured open product database, queried by barcode.
#[async_trait]
pub trait ProductDatabase: Send + Sync {
    /// Looks the barcode up. `Ok(None)` means the database answered and
    /// does not know this barcode.
    async fn lookup(&self, barcode: &str) -> ResolveResult<Option<DatabaseRecord>>;
}

/// Secondary, less-structured registry that can map a barcode to a
/// human-readable product title.
///
/// Implementations own whatever heuristics they need to distinguish a real
/// product page from a "no results" placeholder; callers only ever see
/// `Some(title)` or `None`.
#[async_trait]
pub trait NameRegistry: Send + Sync {
    async fn product_title(&self, barcode: &str) -> ResolveResult<Option<String>>;
}

/// Inference provider guessing a manufacturer and food/non-food class from
/// a (possibly empty) product name.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    async fn infer(&self, name: &str) -> ResolveResult<Inference>;
}

/// Image search used only when the database had no product photo.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn first_image(&self, query: &str) -> ResolveResult<Option<String>>;
}
