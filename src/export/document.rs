//! Exported world description.

use serde::{Deserialize, Serialize};
use world_map::{Coordinate, WorldMap};

use super::error::ExportError;
use super::exporter::ProgressReporter;

/// Version of the exported world description.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// World description consumed by the game side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub start_cell: Coordinate,
    pub places: Vec<PlaceEntry>,
    /// One string per row, `#` land and `~` water
    pub terrain: Vec<String>,
}

/// Exported place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub x: i32,
    pub y: i32,
}

impl ExportDocument {
    /// Number of progress steps [`ExportDocument::build`] takes for `world`.
    pub fn steps(world: &WorldMap) -> usize {
        world.height() as usize + world.places().len()
    }

    /// Build the description, one progress step per terrain row and per
    /// place.
    pub fn build(world: &WorldMap, progress: &mut ProgressReporter) -> Result<Self, ExportError> {
        let start_cell = world
            .start_cell()
            .ok_or_else(|| ExportError::InvalidMap("no start cell".to_string()))?;

        let mut terrain = Vec::with_capacity(world.height() as usize);
        for row in world.terrain_rows() {
            progress.advance()?;
            terrain.push(row);
        }

        let mut places = Vec::with_capacity(world.places().len());
        for place in world.places() {
            progress.advance()?;
            places.push(PlaceEntry {
                name: place.name.clone(),
                description: place.description.clone(),
                x: place.coordinates.x,
                y: place.coordinates.y,
            });
        }

        Ok(Self {
            version: EXPORT_FORMAT_VERSION,
            name: world.name().to_string(),
            width: world.width(),
            height: world.height(),
            start_cell,
            places,
            terrain,
        })
    }
}
