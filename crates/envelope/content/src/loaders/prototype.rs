//! Single envelope prototype loader.

use std::path::Path;

use crate::EnvelopePrototype;
use crate::loaders::{LoadResult, read_file};

/// Loader for one envelope prototype from a TOML file.
pub struct PrototypeLoader;

impl PrototypeLoader {
    /// Load a prototype from a TOML file.
    ///
    /// Every key is optional; missing ones take the default envelope values.
    pub fn load(path: &Path) -> LoadResult<EnvelopePrototype> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EnvelopePrototype> {
        let prototype: EnvelopePrototype = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse envelope prototype TOML: {}", e))?;

        Ok(prototype)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use envelope_core::EnvelopeState;

    use super::*;

    #[test]
    fn loads_prototype_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
seal_delay_ms = 3000
tear_delay_ms = 1500
initial_state = "sealed"

[interrupts]
distance_threshold = 2.5
"#
        )
        .unwrap();

        let prototype = PrototypeLoader::load(file.path()).unwrap();

        assert_eq!(prototype.seal_delay_ms, 3000);
        assert_eq!(prototype.tear_delay_ms, 1500);
        assert_eq!(prototype.initial_state, EnvelopeState::Sealed);
        assert!(prototype.lockable);
        assert_eq!(prototype.interrupts.distance_threshold, 2.5);
        assert!(prototype.interrupts.break_on_damage);
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(
            PrototypeLoader::parse("").unwrap(),
            EnvelopePrototype::default()
        );
    }

    #[test]
    fn unknown_state_is_rejected() {
        assert!(PrototypeLoader::parse(r#"initial_state = "crumpled""#).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = PrototypeLoader::load(Path::new("/nonexistent/envelope.toml")).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/envelope.toml"));
    }
}
