//! # Resolve Error Types
//!
//! Errors for individual provider calls and configuration loading.
//!
//! ## Containment Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where ResolveError May Travel                      │
//! │                                                                         │
//! │  Provider impl ──Err──► pipeline stage guard ──warn!──► degraded field │
//! │                                                                         │
//! │  ResolveError NEVER crosses ProductResolver::resolve(), which always   │
//! │  returns a populated Product. The error type exists so each provider   │
//! │  can report precisely WHY it failed (for logs), not so callers can     │
//! │  branch on it.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result alias for provider calls.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Failures from a single provider call or from configuration loading.
#[derive(Debug, Error)]
pub enum ResolveError {
    // =========================================================================
    // Provider Errors
    // =========================================================================
    /// Network-level failure (DNS, connect, TLS, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Provider answered with a non-success HTTP status.
    #[error("Provider returned HTTP {status} from {provider}")]
    HttpStatus { provider: &'static str, status: u16 },

    /// Provider answered but the payload did not parse.
    #[error("Failed to parse {provider} response: {reason}")]
    ParseFailed {
        provider: &'static str,
        reason: String,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid resolver configuration.
    #[error("Invalid resolver configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(#[from] std::io::Error),

    /// Config file was not valid TOML.
    #[error("Failed to parse config: {0}")]
    ConfigParseFailed(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ResolveError::HttpStatus {
            provider: "product-db",
            status: 503,
        };
        assert_eq!(err.to_string(), "Provider returned HTTP 503 from product-db");

        let err = ResolveError::ParseFailed {
            provider: "registry",
            reason: "missing <title>".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse registry response: missing <title>"
        );
    }
}
