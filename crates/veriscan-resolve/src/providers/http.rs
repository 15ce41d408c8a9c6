//! # Default HTTP Providers
//!
//! reqwest-backed implementations of the provider traits. One attempt per
//! call, per-request timeout from [`ResolverConfig`], no retry/backoff —
//! the pipeline's job is to degrade, not to hammer flaky upstreams.
//!
//! ## Endpoint Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HttpProductDatabase   GET  {base}/api/v2/product/{barcode}.json       │
//! │                        JSON: { status: 1, product: { product_name,     │
//! │                                brands, brand_owner, image_url,         │
//! │                                allergens } }                            │
//! │                        status != 1 → miss (Ok(None))                   │
//! │                                                                         │
//! │  HttpNameRegistry      GET  {base}/{barcode}                            │
//! │                        HTML: first <title>…</title> is the product     │
//! │                        name; placeholder/search titles → miss          │
//! │                                                                         │
//! │  HttpInferenceProvider POST {url}  {"name": …}                          │
//! │                        JSON: { manufacturer, is_food }                  │
//! │                                                                         │
//! │  HttpImageSearch       GET  {url}?q={query}                             │
//! │                        JSON: { items: [ { link }, … ] } → first link   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::ResolverConfig;
use crate::error::{ResolveError, ResolveResult};

use super::{DatabaseRecord, ImageSearch, Inference, InferenceProvider, NameRegistry, ProductDatabase};

// =============================================================================
// Primary Product Database
// =============================================================================

/// Open-product-database client (Open Food Facts wire shape).
pub struct HttpProductDatabase {
    client: reqwest::Client,
    base_url: String,
    timeout: std::time::Duration,
}

#[derive(Debug, Deserialize)]
struct DatabaseResponse {
    #[serde(default)]
    status: i64,
    product: Option<DatabaseProduct>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseProduct {
    product_name: Option<String>,
    brands: Option<String>,
    brand_owner: Option<String>,
    image_url: Option<String>,
    allergens: Option<String>,
}

impl HttpProductDatabase {
    pub fn new(client: reqwest::Client, config: &ResolverConfig) -> Self {
        HttpProductDatabase {
            client,
            base_url: config.endpoints.product_db.clone(),
            timeout: config.request_timeout(),
        }
    }
}

#[async_trait]
impl ProductDatabase for HttpProductDatabase {
    async fn lookup(&self, barcode: &str) -> ResolveResult<Option<DatabaseRecord>> {
        let url = format!(
            "{}/api/v2/product/{}.json",
            self.base_url.trim_end_matches('/'),
            barcode
        );
        debug!(%url, "Querying product database");

        let response = self.client.get(&url).timeout(self.timeout).send().await?;

        // A miss is commonly reported as 404 with a status-0 body; either
        // spelling means "database answered, barcode unknown".
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ResolveError::HttpStatus {
                provider: "product-db",
                status: response.status().as_u16(),
            });
        }

        let body: DatabaseResponse = response.json().await?;
        if body.status != 1 {
            return Ok(None);
        }

        let product = body.product.unwrap_or_default();
        Ok(Some(DatabaseRecord {
            name: non_empty(product.product_name),
            // brands is preferred over brand_owner when both exist.
            brand: non_empty(product.brands).or_else(|| non_empty(product.brand_owner)),
            image: non_empty(product.image_url),
            allergens: non_empty(product.allergens),
        }))
    }
}

// =============================================================================
// Secondary Name Registry
// =============================================================================

/// HTML registry client. The barcode is appended to the base URL and the
/// page `<title>` is taken as the product name.
///
/// The placeholder heuristic lives HERE and nowhere else: a title that
/// looks like a search/no-results page maps to `Ok(None)`, so upstream
/// markup changes degrade to "not found" rather than leaking a bogus name
/// into the pipeline.
pub struct HttpNameRegistry {
    client: reqwest::Client,
    base_url: String,
    timeout: std::time::Duration,
}

impl HttpNameRegistry {
    pub fn new(client: reqwest::Client, config: &ResolverConfig) -> Self {
        HttpNameRegistry {
            client,
            base_url: config.endpoints.name_registry.clone(),
            timeout: config.request_timeout(),
        }
    }

    /// Extracts the first `<title>` text, if any.
    fn extract_title(html: &str) -> Option<String> {
        // ASCII lowering keeps byte offsets aligned with the original.
        let lower = html.to_ascii_lowercase();
        let open = lower.find("<title")?;
        let open_end = lower[open..].find('>')? + open + 1;
        let close = lower[open_end..].find("</title>")? + open_end;
        let title = html[open_end..close].trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }

    /// True for titles that smell like a generic search or no-results page.
    fn looks_like_placeholder(title: &str) -> bool {
        let lower = title.to_lowercase();
        lower.contains("search") || lower.contains("not found") || lower.contains("no result")
    }
}

#[async_trait]
impl NameRegistry for HttpNameRegistry {
    async fn product_title(&self, barcode: &str) -> ResolveResult<Option<String>> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), barcode);
        debug!(%url, "Querying name registry");

        let response = self.client.get(&url).timeout(self.timeout).send().await?;
        if !response.status().is_success() {
            return Err(ResolveError::HttpStatus {
                provider: "registry",
                status: response.status().as_u16(),
            });
        }

        let html = response.text().await?;
        let title = match Self::extract_title(&html) {
            Some(t) => t,
            None => return Ok(None),
        };

        if Self::looks_like_placeholder(&title) {
            debug!(%title, "Registry returned a placeholder page");
            return Ok(None);
        }

        Ok(Some(title))
    }
}

// =============================================================================
// Inference Provider
// =============================================================================

/// Inference client guessing manufacturer and food classification.
pub struct HttpInferenceProvider {
    client: reqwest::Client,
    url: String,
    timeout: std::time::Duration,
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    manufacturer: Option<String>,
    #[serde(default)]
    is_food: bool,
}

impl HttpInferenceProvider {
    pub fn new(client: reqwest::Client, config: &ResolverConfig) -> Self {
        HttpInferenceProvider {
            client,
            url: config.endpoints.inference.clone(),
            timeout: config.request_timeout(),
        }
    }
}

#[async_trait]
impl InferenceProvider for HttpInferenceProvider {
    async fn infer(&self, name: &str) -> ResolveResult<Inference> {
        debug!(url = %self.url, %name, "Querying inference provider");

        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolveError::HttpStatus {
                provider: "inference",
                status: response.status().as_u16(),
            });
        }

        let body: InferenceResponse = response.json().await?;
        Ok(Inference {
            manufacturer: non_empty(body.manufacturer),
            is_food: body.is_food,
        })
    }
}

// =============================================================================
// Image Search
// =============================================================================

/// Image-search client returning the first hit's link.
pub struct HttpImageSearch {
    client: reqwest::Client,
    url: String,
    timeout: std::time::Duration,
}

#[derive(Debug, Deserialize)]
struct ImageSearchResponse {
    #[serde(default)]
    items: Vec<ImageSearchItem>,
}

#[derive(Debug, Deserialize)]
struct ImageSearchItem {
    link: Option<String>,
}

impl HttpImageSearch {
    pub fn new(client: reqwest::Client, config: &ResolverConfig) -> Self {
        HttpImageSearch {
            client,
            url: config.endpoints.image_search.clone(),
            timeout: config.request_timeout(),
        }
    }
}

#[async_trait]
impl ImageSearch for HttpImageSearch {
    async fn first_image(&self, query: &str) -> ResolveResult<Option<String>> {
        debug!(url = %self.url, %query, "Querying image search");

        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .query(&[("q", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolveError::HttpStatus {
                provider: "image-search",
                status: response.status().as_u16(),
            });
        }

        let body: ImageSearchResponse = response.json().await?;
        Ok(body.items.into_iter().find_map(|item| non_empty(item.link)))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Collapses `Some("")` and whitespace-only strings to `None`.
fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let html = "<html><head><title>Nutella 400g</title></head></html>";
        assert_eq!(
            HttpNameRegistry::extract_title(html).as_deref(),
            Some("Nutella 400g")
        );

        // Attributes on the tag still parse.
        let html = r#"<TITLE lang="en"> Spaced Name </TITLE>"#;
        assert_eq!(
            HttpNameRegistry::extract_title(html).as_deref(),
            Some("Spaced Name")
        );

        assert_eq!(HttpNameRegistry::extract_title("<html></html>"), None);
        assert_eq!(HttpNameRegistry::extract_title("<title></title>"), None);
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(HttpNameRegistry::looks_like_placeholder("Search results"));
        assert!(HttpNameRegistry::looks_like_placeholder("Barcode Search - EAN DB"));
        assert!(HttpNameRegistry::looks_like_placeholder("Product not found"));
        assert!(!HttpNameRegistry::looks_like_placeholder("Nutella 400g"));
    }

    #[test]
    fn test_non_empty_collapses_blank_strings() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(Some(" x ".to_string())).as_deref(), Some("x"));
    }

    #[test]
    fn test_database_response_parsing() {
        let json = r#"{
            "status": 1,
            "product": {
                "product_name": "Nutella",
                "brands": "Ferrero",
                "image_url": "https://img.example/nutella.jpg",
                "allergens": "hazelnuts, milk"
            }
        }"#;
        let parsed: DatabaseResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, 1);
        let product = parsed.product.unwrap();
        assert_eq!(product.product_name.as_deref(), Some("Nutella"));
        assert_eq!(product.brands.as_deref(), Some("Ferrero"));
    }

    #[test]
    fn test_database_miss_parsing() {
        let json = r#"{ "status": 0, "status_verbose": "product not found" }"#;
        let parsed: DatabaseResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, 0);
        assert!(parsed.product.is_none());
    }
}
