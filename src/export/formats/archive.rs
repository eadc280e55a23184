//! Zip bundle with the world description and a PNG preview.

use std::io::{Cursor, Write};
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use world_map::{Coordinate, WorldMap};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::constants::colors;
use crate::export::document::ExportDocument;
use crate::export::error::ExportError;
use crate::export::exporter::{ExportSummary, ProgressReporter, WorldExporter};

/// Archive entry holding the world description.
pub const WORLD_ENTRY: &str = "world.json";

/// Archive entry holding the preview image.
pub const PREVIEW_ENTRY: &str = "map.png";

/// Writes a zip containing [`WORLD_ENTRY`] and [`PREVIEW_ENTRY`].
pub struct ArchiveExporter;

/// Render the map one pixel per cell, with place and start cell markers.
pub fn render_preview(world: &WorldMap) -> RgbImage {
    let mut image = RgbImage::from_fn(world.width(), world.height(), |x, y| {
        if world.is_cell_on_land(Coordinate::new(x as i32, y as i32)) {
            Rgb(colors::LAND)
        } else {
            Rgb(colors::WATER)
        }
    });

    for place in world.places() {
        put_cell(&mut image, place.coordinates, colors::PLACE);
    }
    if let Some(start) = world.start_cell() {
        put_cell(&mut image, start, colors::START_CELL);
    }

    image
}

fn put_cell(image: &mut RgbImage, at: Coordinate, color: [u8; 3]) {
    if at.x < 0 || at.y < 0 || at.x as u32 >= image.width() || at.y as u32 >= image.height() {
        log::warn!("Marker at {} lies outside the preview", at);
        return;
    }
    image.put_pixel(at.x as u32, at.y as u32, Rgb(color));
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

impl WorldExporter for ArchiveExporter {
    fn id(&self) -> &'static str {
        "archive"
    }

    fn display_name(&self) -> &'static str {
        "World bundle with preview (ZIP)"
    }

    fn extension(&self) -> &'static str {
        "zip"
    }

    fn export(
        &self,
        world: &WorldMap,
        path: &Path,
        progress: &mut ProgressReporter,
    ) -> Result<ExportSummary, ExportError> {
        log::info!("Exporting '{}' as archive to {:?}", world.name(), path);

        // Extra steps: preview, archive write
        progress.set_total(ExportDocument::steps(world) + 2);
        let document = ExportDocument::build(world, progress)?;
        let json = serde_json::to_vec_pretty(&document)?;

        let mut png = Vec::new();
        render_preview(world).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        progress.advance()?;

        let bytes = {
            let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
            zip.start_file(WORLD_ENTRY, entry_options())?;
            zip.write_all(&json)?;
            zip.start_file(PREVIEW_ENTRY, entry_options())?;
            zip.write_all(&png)?;
            zip.finish()?.into_inner()
        };

        log::debug!("Writing archive ({} bytes) to {:?}", bytes.len(), path);
        let bytes_written = progress.commit(path, &bytes)?;

        Ok(ExportSummary {
            format: self.id(),
            path: path.to_path_buf(),
            places_exported: document.places.len(),
            bytes_written,
        })
    }
}
