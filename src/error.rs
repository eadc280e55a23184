//! User-facing error taxonomy of the editor.
//!
//! Every error the editor surfaces ends up as one of these variants and is
//! shown through an [`AlertSink`](crate::alert::AlertSink). Nothing here
//! propagates past the action that raised it.

use thiserror::Error;
use world_map::{Coordinate, MapError};

/// Errors raised by editor actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// The map refused a start cell assignment
    #[error("{0}")]
    InvalidCoordinate(String),

    /// A place was requested on a water cell
    #[error("No place can be added in water")]
    WaterPlacementRejected {
        /// The clicked water cell
        coordinate: Coordinate,
    },

    /// Pre-export validation failed
    #[error("{0}")]
    ExportNotReady(String),

    /// The background export job failed after starting
    #[error("{0}")]
    ExportFailed(String),

    /// An export was triggered while another one is still running
    #[error("An export is already running")]
    ExportAlreadyRunning,

    /// Any other refusal from the map store (e.g. a duplicate place)
    #[error("{0}")]
    Map(String),
}

impl From<MapError> for EditorError {
    fn from(err: MapError) -> Self {
        match err {
            MapError::InvalidCoordinate { .. } => Self::InvalidCoordinate(err.to_string()),
            MapError::PlaceOnWater { coordinate } => Self::WaterPlacementRejected { coordinate },
            MapError::ExportNotReady { reason } => Self::ExportNotReady(reason),
            other => Self::Map(other.to_string()),
        }
    }
}
