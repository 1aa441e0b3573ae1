//! Content loaders for reading envelope data from files.
//!
//! This module converts TOML/RON files into [`EnvelopePrototype`]s.
//!
//! [`EnvelopePrototype`]: crate::EnvelopePrototype

pub mod catalog;
pub mod prototype;

pub use catalog::{CatalogLoader, PrototypeCatalog};
pub use prototype::PrototypeLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
