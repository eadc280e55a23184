//! Single-file JSON world description.

use std::path::Path;

use world_map::WorldMap;

use crate::export::document::ExportDocument;
use crate::export::error::ExportError;
use crate::export::exporter::{ExportSummary, ProgressReporter, WorldExporter};

/// Writes the [`ExportDocument`] as pretty-printed JSON.
pub struct JsonExporter;

impl WorldExporter for JsonExporter {
    fn id(&self) -> &'static str {
        "json"
    }

    fn display_name(&self) -> &'static str {
        "World description (JSON)"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn export(
        &self,
        world: &WorldMap,
        path: &Path,
        progress: &mut ProgressReporter,
    ) -> Result<ExportSummary, ExportError> {
        log::info!("Exporting '{}' as JSON to {:?}", world.name(), path);

        // Last step is the file write
        progress.set_total(ExportDocument::steps(world) + 1);
        let document = ExportDocument::build(world, progress)?;
        let bytes = serde_json::to_vec_pretty(&document)?;

        let bytes_written = progress.commit(path, &bytes)?;

        Ok(ExportSummary {
            format: self.id(),
            path: path.to_path_buf(),
            places_exported: document.places.len(),
            bytes_written,
        })
    }
}
