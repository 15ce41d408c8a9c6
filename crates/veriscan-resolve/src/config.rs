//! # Resolver Configuration
//!
//! Endpoint and timeout configuration for the resolution pipeline.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VERISCAN_PRODUCT_DB_URL=https://world.openfoodfacts.org            │
//! │     VERISCAN_REQUEST_TIMEOUT_SECS=5                                    │
//! │                                                                         │
//! │  2. TOML Config File (resolver.toml, path supplied by the caller)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # resolver.toml
//! request_timeout_secs = 8
//!
//! [endpoints]
//! product_db = "https://world.openfoodfacts.org"
//! name_registry = "https://www.ean-search.example/barcode"
//! inference = "https://inference.example/classify"
//! image_search = "https://imagesearch.example/v1"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ResolveError, ResolveResult};

// =============================================================================
// Endpoint Settings
// =============================================================================

/// Base URLs for the four providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSettings {
    /// Structured product database (primary lookup).
    #[serde(default = "default_product_db")]
    pub product_db: String,

    /// HTML name registry (secondary lookup).
    #[serde(default = "default_name_registry")]
    pub name_registry: String,

    /// Inference endpoint (manufacturer + food classification).
    #[serde(default = "default_inference")]
    pub inference: String,

    /// Image-search endpoint (image fallback).
    #[serde(default = "default_image_search")]
    pub image_search: String,
}

fn default_product_db() -> String {
    "https://world.openfoodfacts.org".to_string()
}

fn default_name_registry() -> String {
    "https://www.barcodelookup.example/barcode".to_string()
}

fn default_inference() -> String {
    "https://inference.veriscan.example/classify".to_string()
}

fn default_image_search() -> String {
    "https://imagesearch.veriscan.example/v1".to_string()
}

impl Default for EndpointSettings {
    fn default() -> Self {
        EndpointSettings {
            product_db: default_product_db(),
            name_registry: default_name_registry(),
            inference: default_inference(),
            image_search: default_image_search(),
        }
    }
}

// =============================================================================
// Main Resolver Configuration
// =============================================================================

/// Complete resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Per-request timeout (seconds). One attempt per provider per scan —
    /// there is no retry, so this bounds each stage's worst case.
    ///
    /// Declared before `endpoints` so TOML serialization emits the scalar
    /// ahead of the table.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Provider base URLs.
    #[serde(default)]
    pub endpoints: EndpointSettings,
}

fn default_request_timeout() -> u64 {
    8
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            request_timeout_secs: default_request_timeout(),
            endpoints: EndpointSettings::default(),
        }
    }
}

impl ResolverConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (resolver.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ResolveResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading resolver config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load resolver config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ResolveResult<()> {
        for (name, value) in [
            ("product_db", &self.endpoints.product_db),
            ("name_registry", &self.endpoints.name_registry),
            ("inference", &self.endpoints.inference),
            ("image_search", &self.endpoints.image_search),
        ] {
            let parsed = url::Url::parse(value).map_err(|e| {
                ResolveError::InvalidConfig(format!("{} endpoint is not a valid URL: {}", name, e))
            })?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(ResolveError::InvalidConfig(format!(
                    "{} endpoint must be http(s), got: {}",
                    name, value
                )));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(ResolveError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("VERISCAN_PRODUCT_DB_URL") {
            debug!(url = %url, "Overriding product_db endpoint from environment");
            self.endpoints.product_db = url;
        }

        if let Ok(url) = std::env::var("VERISCAN_NAME_REGISTRY_URL") {
            self.endpoints.name_registry = url;
        }

        if let Ok(url) = std::env::var("VERISCAN_INFERENCE_URL") {
            self.endpoints.inference = url;
        }

        if let Ok(url) = std::env::var("VERISCAN_IMAGE_SEARCH_URL") {
            self.endpoints.image_search = url;
        }

        if let Ok(timeout) = std::env::var("VERISCAN_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                debug!(secs, "Overriding request timeout from environment");
                self.request_timeout_secs = secs;
            }
        }
    }

    /// Per-request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ResolverConfig {
        ResolverConfig::default()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_bad_urls() {
        let mut c = config();
        c.endpoints.product_db = "not a url".to_string();
        assert!(c.validate().is_err());

        let mut c = config();
        c.endpoints.inference = "ftp://example.com".to_string();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_zero_timeout() {
        let mut c = config();
        c.request_timeout_secs = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let c = config();
        let toml_str = toml::to_string_pretty(&c).unwrap();
        assert!(toml_str.contains("[endpoints]"));
        let parsed: ResolverConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.endpoints.product_db, c.endpoints.product_db);
    }

    #[test]
    fn test_empty_toml_fills_defaults() {
        let parsed: ResolverConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.request_timeout_secs, default_request_timeout());
        assert_eq!(parsed.endpoints.product_db, default_product_db());
    }
}
