//! Registry of available export formats.

use std::collections::HashMap;
use std::sync::Arc;

use super::exporter::WorldExporter;
use super::formats::{ArchiveExporter, JsonExporter};

/// Registry of export formats, with the built-in ones registered.
pub struct ExporterRegistry {
    exporters: HashMap<&'static str, Arc<dyn WorldExporter>>,
}

impl ExporterRegistry {
    /// Create a new registry with all built-in formats registered.
    pub fn new() -> Self {
        let mut registry = Self {
            exporters: HashMap::new(),
        };

        registry.register(Arc::new(JsonExporter));
        registry.register(Arc::new(ArchiveExporter));

        registry
    }

    /// Register a format, replacing any format with the same id.
    pub fn register(&mut self, exporter: Arc<dyn WorldExporter>) {
        self.exporters.insert(exporter.id(), exporter);
    }

    /// Get a format by its ID.
    pub fn get(&self, id: &str) -> Option<Arc<dyn WorldExporter>> {
        self.exporters.get(id).cloned()
    }

    /// All format IDs, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.exporters.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_formats() {
        let registry = ExporterRegistry::new();

        assert_eq!(registry.ids(), vec!["archive", "json"]);
        assert_eq!(registry.get("json").unwrap().extension(), "json");
        assert_eq!(registry.get("archive").unwrap().extension(), "zip");
        assert!(registry.get("coco").is_none());
    }
}
