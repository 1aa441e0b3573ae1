//! Prototype catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::EnvelopePrototype;
use crate::loaders::{LoadResult, read_file};

/// Named envelope prototypes, as stored in RON files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrototypeCatalog {
    pub prototypes: BTreeMap<String, EnvelopePrototype>,
}

impl PrototypeCatalog {
    pub fn get(&self, name: &str) -> Option<&EnvelopePrototype> {
        self.prototypes.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.prototypes.keys().map(String::as_str)
    }
}

/// Loader for prototype catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a prototype catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<PrototypeCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<PrototypeCatalog> {
        let catalog: PrototypeCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse prototype catalog RON: {}", e))?;

        Ok(catalog)
    }
}
