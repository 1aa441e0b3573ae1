//! Data-driven envelope definitions and loaders.
//!
//! This crate houses envelope prototypes and provides loaders for data files:
//! - Single prototypes (data-driven via TOML)
//! - Prototype catalogs keyed by name (data-driven via RON)
//!
//! Content is turned into [`envelope_core::EnvelopeConfig`] at spawn time and
//! never appears in envelope state.

pub mod prototype;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use prototype::{EnvelopePrototype, InterruptSpec};

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, LoadResult, PrototypeCatalog, PrototypeLoader};
