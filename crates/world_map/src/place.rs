//! Named places of the world.

use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// A named location on the map.
///
/// The editor never changes a place once it exists; it only reads the
/// coordinates to draw a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Display name, unique within a map
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Cell the place sits on
    pub coordinates: Coordinate,
}

impl Place {
    /// Create a place without description.
    pub fn new(name: impl Into<String>, coordinates: Coordinate) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            coordinates,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
