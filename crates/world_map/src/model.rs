//! The contract the editor core consumes from a map store.

use std::sync::Arc;

use crate::{Coordinate, MapError, Place, WorldMap};

/// Map store operations needed by the interactive editor.
///
/// All mutation happens on the interactive thread. Background work (the
/// export job) only ever sees the immutable value returned by
/// [`MapModel::snapshot`].
pub trait MapModel {
    /// Whether a place may be created on this cell.
    fn is_land(&self, at: Coordinate) -> bool;

    /// Replace the start cell. Fails with [`MapError::InvalidCoordinate`].
    fn set_start_cell(&mut self, at: Coordinate) -> Result<(), MapError>;

    /// Store a new place.
    fn add_place(&mut self, place: Place) -> Result<(), MapError>;

    /// Places in insertion order.
    fn places(&self) -> &[Place];

    /// Current start cell, if any.
    fn start_cell(&self) -> Option<Coordinate>;

    /// Pre-flight validation. Fails with [`MapError::ExportNotReady`].
    fn check_export_ready(&self) -> Result<(), MapError>;

    /// Immutable copy of the map, safe to hand to another thread.
    fn snapshot(&self) -> Arc<WorldMap>;
}

impl MapModel for WorldMap {
    fn is_land(&self, at: Coordinate) -> bool {
        self.is_cell_on_land(at)
    }

    fn set_start_cell(&mut self, at: Coordinate) -> Result<(), MapError> {
        WorldMap::set_start_cell(self, at)
    }

    fn add_place(&mut self, place: Place) -> Result<(), MapError> {
        WorldMap::add_place(self, place)
    }

    fn places(&self) -> &[Place] {
        WorldMap::places(self)
    }

    fn start_cell(&self) -> Option<Coordinate> {
        WorldMap::start_cell(self)
    }

    fn check_export_ready(&self) -> Result<(), MapError> {
        self.check_for_export()
    }

    fn snapshot(&self) -> Arc<WorldMap> {
        Arc::new(self.clone())
    }
}
