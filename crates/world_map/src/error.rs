//! Error types for map operations.

use thiserror::Error;

use crate::Coordinate;

/// Errors raised by the world map.
#[derive(Error, Debug)]
pub enum MapError {
    /// Coordinate lies outside the map grid
    #[error("Invalid coordinates {coordinate}: the map is {width}x{height}")]
    InvalidCoordinate {
        /// The rejected coordinate
        coordinate: Coordinate,
        /// Map width in cells
        width: u32,
        /// Map height in cells
        height: u32,
    },

    /// A place was requested on a water cell
    #[error("No place can be added in water")]
    PlaceOnWater {
        /// The water cell
        coordinate: Coordinate,
    },

    /// A place with the same name or on the same cell exists already
    #[error("A place named '{name}' already exists at {coordinate}")]
    DuplicatePlace {
        /// Name of the existing place
        name: String,
        /// Cell of the existing place
        coordinate: Coordinate,
    },

    /// The map fails the pre-export checks
    #[error("{reason}")]
    ExportNotReady {
        /// Why the map cannot be exported
        reason: String,
    },

    /// Map file was written by a newer version of the editor
    #[error("Map file version {file_version} is newer than supported version {supported_version}")]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Terrain rows do not match the declared map size
    #[error("Invalid terrain: {0}")]
    InvalidTerrain(String),

    /// I/O error while reading or writing a map file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MapError {
    /// Create an export-not-ready error with a reason.
    pub fn export_not_ready(reason: impl Into<String>) -> Self {
        Self::ExportNotReady {
            reason: reason.into(),
        }
    }
}
