//! # Product Resolver
//!
//! Orchestrates the provider chain into a single best-effort `Product`.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Resolution Pipeline                                │
//! │                                                                         │
//! │  barcode                                                                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  1. ProductDatabase.lookup ──hit──► name/brand/image/allergens, found  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  2. NameRegistry.product_title ──hit──► name (overrides), found        │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  3. InferenceProvider.infer(name) ── ALWAYS answers ──► is_food,       │
//! │     │                                    fallback manufacturer          │
//! │     ▼                                                                   │
//! │  4. manufacturer := db brand > inference guess > "Unknown Manufacturer"│
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  5. ImageSearch.first_image ── only if no image AND usable name        │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  6. assemble Product (+ GS1 validation from veriscan-core)             │
//! │                                                                         │
//! │  EVERY stage is independently guarded. A dead provider degrades one    │
//! │  field and the pipeline keeps walking; resolve() itself cannot fail.   │
//! │                                                                         │
//! │  Stages 1-3 are sequential BY DESIGN: stage 3 needs the name that      │
//! │  stages 1-2 produce, and stage 5 needs to know stage 1 found no image. │
//! │  One local draft per call; nothing shared, nothing locked.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use veriscan_core::{
    validate_barcode, BarcodeValidation, Product, UNKNOWN_ALLERGENS, UNKNOWN_MANUFACTURER,
    UNKNOWN_PRODUCT,
};

use crate::config::ResolverConfig;
use crate::error::ResolveResult;
use crate::providers::{
    HttpImageSearch, HttpInferenceProvider, HttpNameRegistry, HttpProductDatabase, ImageSearch,
    Inference, InferenceProvider, NameRegistry, ProductDatabase,
};

// =============================================================================
// Draft Accumulator
// =============================================================================

/// Per-call accumulator the stages enrich left to right.
///
/// Deliberately not the public `Product`: the draft keeps the database
/// brand and the inference guess apart until the merge stage decides.
#[derive(Debug, Default)]
struct ProductDraft {
    name: Option<String>,
    db_brand: Option<String>,
    inferred_manufacturer: Option<String>,
    image: Option<String>,
    allergens: Option<String>,
    is_food: Option<bool>,
    found: bool,
}

impl ProductDraft {
    /// A name is usable when some provider actually produced one.
    fn usable_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

// =============================================================================
// Product Resolver
// =============================================================================

/// Orchestrates the four providers into one best-effort `Product`.
///
/// Providers are injected trait objects, so the whole pipeline runs in
/// tests with in-memory fakes and zero network.
pub struct ProductResolver {
    database: Arc<dyn ProductDatabase>,
    registry: Arc<dyn NameRegistry>,
    inference: Arc<dyn InferenceProvider>,
    image_search: Arc<dyn ImageSearch>,
}

impl ProductResolver {
    /// Creates a resolver from explicit providers.
    pub fn new(
        database: Arc<dyn ProductDatabase>,
        registry: Arc<dyn NameRegistry>,
        inference: Arc<dyn InferenceProvider>,
        image_search: Arc<dyn ImageSearch>,
    ) -> Self {
        ProductResolver {
            database,
            registry,
            inference,
            image_search,
        }
    }

    /// Creates a resolver with the default HTTP providers.
    pub fn from_config(config: &ResolverConfig) -> ResolveResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("veriscan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ProductResolver {
            database: Arc::new(HttpProductDatabase::new(client.clone(), config)),
            registry: Arc::new(HttpNameRegistry::new(client.clone(), config)),
            inference: Arc::new(HttpInferenceProvider::new(client.clone(), config)),
            image_search: Arc::new(HttpImageSearch::new(client, config)),
        })
    }

    /// Resolves a barcode into a best-effort `Product`.
    ///
    /// Never fails: provider failures degrade individual fields, and even a
    /// catastrophic orchestration failure yields the "Refer to product
    /// packaging" record rather than an error.
    pub async fn resolve(&self, barcode: &str) -> Product {
        let validation = validate_barcode(barcode);

        match self.run_pipeline(barcode, &validation).await {
            Ok(product) => product,
            Err(e) => {
                // Not expected in practice: every stage guards itself.
                warn!(?e, %barcode, "Resolution orchestration failed");
                Product::refer_to_packaging(barcode, validation)
            }
        }
    }

    async fn run_pipeline(
        &self,
        barcode: &str,
        validation: &BarcodeValidation,
    ) -> ResolveResult<Product> {
        let mut draft = ProductDraft::default();

        self.stage_database(barcode, &mut draft).await;
        self.stage_registry(barcode, &mut draft).await;
        self.stage_inference(&mut draft).await;
        let manufacturer = Self::merge_manufacturer(&draft);
        self.stage_image_fallback(&mut draft).await;

        info!(
            %barcode,
            found = draft.found,
            is_valid = validation.is_valid,
            "Resolution complete"
        );

        Ok(Product {
            name: draft
                .name
                .take()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            manufacturer,
            allergens: Some(
                draft
                    .allergens
                    .take()
                    .unwrap_or_else(|| UNKNOWN_ALLERGENS.to_string()),
            ),
            image: draft.image.take(),
            country_code: validation.country_code.clone(),
            country_name: validation.country_name.clone(),
            is_valid: validation.is_valid,
            found: draft.found,
            is_food: draft.is_food,
            barcode: barcode.to_string(),
            scanned_at: Utc::now(),
        })
    }

    // =========================================================================
    // Stages
    // =========================================================================

    /// Stage 1: structured database lookup.
    async fn stage_database(&self, barcode: &str, draft: &mut ProductDraft) {
        match self.database.lookup(barcode).await {
            Ok(Some(record)) => {
                debug!(%barcode, "Primary database hit");
                draft.found = true;
                draft.name = record.name;
                draft.db_brand = record.brand;
                draft.image = record.image;
                draft.allergens = record.allergens;
            }
            Ok(None) => {
                debug!(%barcode, "Primary database miss");
            }
            Err(e) => {
                warn!(?e, %barcode, "Primary database unavailable, continuing");
            }
        }
    }

    /// Stage 2: secondary name registry.
    ///
    /// A usable title overrides the database name and independently marks
    /// the product as found, since this source can succeed where the
    /// primary fails.
    async fn stage_registry(&self, barcode: &str, draft: &mut ProductDraft) {
        match self.registry.product_title(barcode).await {
            Ok(Some(title)) => {
                debug!(%barcode, %title, "Registry hit");
                draft.name = Some(title);
                draft.found = true;
            }
            Ok(None) => {
                debug!(%barcode, "Registry miss");
            }
            Err(e) => {
                warn!(?e, %barcode, "Registry unavailable, continuing");
            }
        }
    }

    /// Stage 3: inference. Always runs, always leaves an answer.
    ///
    /// Sole source of `is_food`; lowest-priority source of `manufacturer`.
    async fn stage_inference(&self, draft: &mut ProductDraft) {
        let name = draft.usable_name().unwrap_or_default().to_string();

        let inference = match self.inference.infer(&name).await {
            Ok(inference) => inference,
            Err(e) => {
                warn!(?e, "Inference provider unavailable, assuming unknown");
                Inference::unknown()
            }
        };

        draft.inferred_manufacturer = inference.manufacturer;
        draft.is_food = Some(inference.is_food);
    }

    /// Stage 4: first non-empty wins, left to right.
    fn merge_manufacturer(draft: &ProductDraft) -> String {
        draft
            .db_brand
            .clone()
            .filter(|b| !b.trim().is_empty())
            .or_else(|| {
                draft
                    .inferred_manufacturer
                    .clone()
                    .filter(|m| !m.trim().is_empty())
            })
            .unwrap_or_else(|| UNKNOWN_MANUFACTURER.to_string())
    }

    /// Stage 5: image fallback. Only when the database produced no image
    /// and a usable name exists; failure is silent.
    async fn stage_image_fallback(&self, draft: &mut ProductDraft) {
        if draft.image.is_some() {
            return;
        }
        let Some(name) = draft.usable_name().map(str::to_string) else {
            return;
        };

        match self.image_search.first_image(&name).await {
            Ok(Some(url)) => {
                debug!(%name, %url, "Image fallback hit");
                draft.image = Some(url);
            }
            Ok(None) => {}
            Err(e) => {
                debug!(?e, %name, "Image search unavailable, skipping");
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::ResolveError;
    use crate::providers::DatabaseRecord;

    // Fakes: each provider either answers with a canned value or fails.

    struct FakeDb(Option<DatabaseRecord>);

    #[async_trait]
    impl ProductDatabase for FakeDb {
        async fn lookup(&self, _barcode: &str) -> ResolveResult<Option<DatabaseRecord>> {
            Ok(self.0.clone())
        }
    }

    struct FailingDb;

    #[async_trait]
    impl ProductDatabase for FailingDb {
        async fn lookup(&self, _barcode: &str) -> ResolveResult<Option<DatabaseRecord>> {
            Err(ResolveError::HttpStatus {
                provider: "product-db",
                status: 503,
            })
        }
    }

    struct FakeRegistry(Option<String>);

    #[async_trait]
    impl NameRegistry for FakeRegistry {
        async fn product_title(&self, _barcode: &str) -> ResolveResult<Option<String>> {
            Ok(self.0.clone())
        }
    }

    struct FailingRegistry;

    #[async_trait]
    impl NameRegistry for FailingRegistry {
        async fn product_title(&self, _barcode: &str) -> ResolveResult<Option<String>> {
            Err(ResolveError::HttpStatus {
                provider: "registry",
                status: 500,
            })
        }
    }

    struct FakeInference(Inference);

    #[async_trait]
    impl InferenceProvider for FakeInference {
        async fn infer(&self, _name: &str) -> ResolveResult<Inference> {
            Ok(self.0.clone())
        }
    }

    struct FailingInference;

    #[async_trait]
    impl InferenceProvider for FailingInference {
        async fn infer(&self, _name: &str) -> ResolveResult<Inference> {
            Err(ResolveError::HttpStatus {
                provider: "inference",
                status: 500,
            })
        }
    }

    /// Image search that counts calls, so gating can be asserted.
    struct CountingImageSearch {
        calls: AtomicUsize,
        result: Option<String>,
    }

    impl CountingImageSearch {
        fn some(url: &str) -> Arc<Self> {
            Arc::new(CountingImageSearch {
                calls: AtomicUsize::new(0),
                result: Some(url.to_string()),
            })
        }

        fn none() -> Arc<Self> {
            Arc::new(CountingImageSearch {
                calls: AtomicUsize::new(0),
                result: None,
            })
        }
    }

    #[async_trait]
    impl ImageSearch for CountingImageSearch {
        async fn first_image(&self, _query: &str) -> ResolveResult<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    fn resolver(
        db: Arc<dyn ProductDatabase>,
        registry: Arc<dyn NameRegistry>,
        inference: Arc<dyn InferenceProvider>,
        images: Arc<dyn ImageSearch>,
    ) -> ProductResolver {
        ProductResolver::new(db, registry, inference, images)
    }

    const GERMAN_BARCODE: &str = "4006381333931";

    #[tokio::test]
    async fn test_primary_hit_populates_all_fields() {
        let r = resolver(
            Arc::new(FakeDb(Some(DatabaseRecord {
                name: Some("Nutella".into()),
                brand: Some("Ferrero".into()),
                image: Some("https://img.example/n.jpg".into()),
                allergens: Some("hazelnuts, milk".into()),
            }))),
            Arc::new(FakeRegistry(None)),
            Arc::new(FakeInference(Inference {
                manufacturer: Some("Wrong Guess".into()),
                is_food: true,
            })),
            CountingImageSearch::none(),
        );

        let product = r.resolve(GERMAN_BARCODE).await;
        assert!(product.found);
        assert!(product.is_valid);
        assert_eq!(product.name, "Nutella");
        // Database brand beats the inference guess.
        assert_eq!(product.manufacturer, "Ferrero");
        assert_eq!(product.image.as_deref(), Some("https://img.example/n.jpg"));
        assert_eq!(product.allergens.as_deref(), Some("hazelnuts, milk"));
        assert_eq!(product.is_food, Some(true));
        assert_eq!(product.country_code, "DE");
    }

    #[tokio::test]
    async fn test_secondary_title_rescues_primary_failure() {
        let r = resolver(
            Arc::new(FailingDb),
            Arc::new(FakeRegistry(Some("Nutella 400g".into()))),
            Arc::new(FakeInference(Inference {
                manufacturer: Some("Ferrero".into()),
                is_food: true,
            })),
            CountingImageSearch::none(),
        );

        let product = r.resolve(GERMAN_BARCODE).await;
        assert!(product.found);
        assert_eq!(product.name, "Nutella 400g");
        // No database brand, so the inference guess wins the merge.
        assert_eq!(product.manufacturer, "Ferrero");
    }

    #[tokio::test]
    async fn test_registry_overrides_database_name() {
        let r = resolver(
            Arc::new(FakeDb(Some(DatabaseRecord {
                name: Some("nutella-400g-pack".into()),
                brand: Some("Ferrero".into()),
                ..Default::default()
            }))),
            Arc::new(FakeRegistry(Some("Nutella Hazelnut Spread".into()))),
            Arc::new(FakeInference(Inference::unknown())),
            CountingImageSearch::none(),
        );

        let product = r.resolve(GERMAN_BARCODE).await;
        assert_eq!(product.name, "Nutella Hazelnut Spread");
    }

    #[tokio::test]
    async fn test_every_stage_failing_still_returns_defaults() {
        let r = resolver(
            Arc::new(FailingDb),
            Arc::new(FailingRegistry),
            Arc::new(FailingInference),
            CountingImageSearch::none(),
        );

        let product = r.resolve(GERMAN_BARCODE).await;
        assert!(!product.found);
        assert_eq!(product.name, UNKNOWN_PRODUCT);
        assert_eq!(product.manufacturer, UNKNOWN_MANUFACTURER);
        assert_eq!(product.allergens.as_deref(), Some(UNKNOWN_ALLERGENS));
        // Inference failure still classifies: non-food by default.
        assert_eq!(product.is_food, Some(false));
        // Prefix validity is independent of provider health.
        assert!(product.is_valid);
    }

    #[tokio::test]
    async fn test_image_fallback_requires_missing_image_and_usable_name() {
        // No name anywhere: image search must not be called.
        let images = CountingImageSearch::some("https://img.example/x.jpg");
        let r = resolver(
            Arc::new(FakeDb(None)),
            Arc::new(FakeRegistry(None)),
            Arc::new(FakeInference(Inference::unknown())),
            images.clone(),
        );
        let product = r.resolve(GERMAN_BARCODE).await;
        assert_eq!(images.calls.load(Ordering::SeqCst), 0);
        assert!(product.image.is_none());

        // Name known, image missing: exactly one search call.
        let images = CountingImageSearch::some("https://img.example/x.jpg");
        let r = resolver(
            Arc::new(FakeDb(Some(DatabaseRecord {
                name: Some("Nutella".into()),
                ..Default::default()
            }))),
            Arc::new(FakeRegistry(None)),
            Arc::new(FakeInference(Inference::unknown())),
            images.clone(),
        );
        let product = r.resolve(GERMAN_BARCODE).await;
        assert_eq!(images.calls.load(Ordering::SeqCst), 1);
        assert_eq!(product.image.as_deref(), Some("https://img.example/x.jpg"));

        // Image already present: no search call.
        let images = CountingImageSearch::some("https://img.example/other.jpg");
        let r = resolver(
            Arc::new(FakeDb(Some(DatabaseRecord {
                name: Some("Nutella".into()),
                image: Some("https://img.example/db.jpg".into()),
                ..Default::default()
            }))),
            Arc::new(FakeRegistry(None)),
            Arc::new(FakeInference(Inference::unknown())),
            images.clone(),
        );
        let product = r.resolve(GERMAN_BARCODE).await;
        assert_eq!(images.calls.load(Ordering::SeqCst), 0);
        assert_eq!(product.image.as_deref(), Some("https://img.example/db.jpg"));
    }

    #[tokio::test]
    async fn test_found_but_invalid_prefix_is_parallel_import() {
        let r = resolver(
            Arc::new(FakeDb(Some(DatabaseRecord {
                name: Some("Gray Import Cola".into()),
                ..Default::default()
            }))),
            Arc::new(FakeRegistry(None)),
            Arc::new(FakeInference(Inference::unknown())),
            CountingImageSearch::none(),
        );

        // "999" prefix matches no GS1 entry.
        let product = r.resolve("9990000000009").await;
        assert!(product.found);
        assert!(!product.is_valid);
        assert_eq!(product.verdict(), veriscan_core::Verdict::ParallelImport);
    }
}
