//! # veriscan-resolve: Product Resolution Pipeline
//!
//! This crate turns a decoded barcode string into a best-effort
//! [`Product`](veriscan_core::Product) by walking an ordered chain of
//! external metadata providers, tolerating any subset of them failing.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Resolution Architecture                             │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                   ProductResolver (Orchestrator)                 │  │
//! │  │                                                                  │  │
//! │  │  • Walks the stages in strict order                              │  │
//! │  │  • Guards every provider call independently                      │  │
//! │  │  • Builds one local ProductDraft per resolve() call              │  │
//! │  │  • NEVER returns an error to the caller                          │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │     ┌──────────────┬──────────┴──────┬──────────────────┐              │
//! │     ▼              ▼                 ▼                  ▼               │
//! │  ┌────────────┐ ┌────────────┐ ┌──────────────┐ ┌──────────────┐      │
//! │  │ Product    │ │ Name       │ │ Inference    │ │ Image        │      │
//! │  │ Database   │ │ Registry   │ │ Provider     │ │ Search       │      │
//! │  │ (JSON API) │ │ (HTML)     │ │ (classifier) │ │ (fallback)   │      │
//! │  └────────────┘ └────────────┘ └──────────────┘ └──────────────┘      │
//! │                                                                         │
//! │  All four seams are traits; reqwest-backed defaults live in            │
//! │  providers::http and in-memory fakes live in the tests.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`resolver`] - The `ProductResolver` pipeline
//! - [`providers`] - Provider traits and default HTTP implementations
//! - [`config`] - Endpoint/timeout configuration (TOML + env)
//! - [`error`] - Provider-call error types (contained inside the pipeline)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use veriscan_resolve::{ProductResolver, ResolverConfig};
//!
//! let config = ResolverConfig::load_or_default(None);
//! let resolver = ProductResolver::from_config(&config)?;
//!
//! let product = resolver.resolve("4006381333931").await;
//! println!("{} — {:?}", product.name, product.verdict());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod providers;
pub mod resolver;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{EndpointSettings, ResolverConfig};
pub use error::{ResolveError, ResolveResult};
pub use providers::{
    DatabaseRecord, ImageSearch, Inference, InferenceProvider, NameRegistry, ProductDatabase,
};
pub use resolver::ProductResolver;
