//! World map data store for the world editor.
//!
//! Owns the grid of land and water cells, the optional start cell and the
//! list of places. The editor core only talks to it through the
//! [`MapModel`] trait.

mod coordinate;
mod error;
mod map;
mod model;
mod place;

pub use coordinate::Coordinate;
pub use error::MapError;
pub use map::{Terrain, WorldMap, MAP_FORMAT_VERSION};
pub use model::MapModel;
pub use place::Place;
