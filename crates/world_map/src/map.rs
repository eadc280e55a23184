//! The world map grid and its annotations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Coordinate, MapError, Place};

/// Current map file format version.
/// Increment this when making breaking changes to the file layout.
pub const MAP_FORMAT_VERSION: u32 = 1;

const LAND_SYMBOL: char = '#';
const WATER_SYMBOL: char = '~';

/// Land/water classification of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Terrain {
    Land,
    #[default]
    Water,
}

impl Terrain {
    /// Character used for this terrain in map files.
    pub fn symbol(self) -> char {
        match self {
            Terrain::Land => LAND_SYMBOL,
            Terrain::Water => WATER_SYMBOL,
        }
    }

    /// Parse a terrain character. Anything but the land symbol is water.
    pub fn from_symbol(symbol: char) -> Self {
        if symbol == LAND_SYMBOL {
            Terrain::Land
        } else {
            Terrain::Water
        }
    }
}

/// A rectangular world map with its start cell and places.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldMap {
    name: String,
    width: u32,
    height: u32,
    /// Row-major, `width * height` cells
    terrain: Vec<Terrain>,
    start_cell: Option<Coordinate>,
    places: Vec<Place>,
}

/// On-disk layout of a map file.
#[derive(Debug, Serialize, Deserialize)]
struct MapFile {
    version: u32,
    name: String,
    width: u32,
    height: u32,
    /// One string per row, see [`Terrain::symbol`]
    terrain: Vec<String>,
    #[serde(default)]
    start_cell: Option<Coordinate>,
    #[serde(default)]
    places: Vec<Place>,
}

impl WorldMap {
    /// Create a map of the given size covered in water.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            terrain: vec![Terrain::Water; (width as usize) * (height as usize)],
            start_cell: None,
            places: Vec::new(),
        }
    }

    /// Build a map from terrain rows, `#` being land.
    ///
    /// All rows must have the same length.
    pub fn from_rows<S: AsRef<str>>(name: impl Into<String>, rows: &[S]) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);

        let mut terrain = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != width {
                return Err(MapError::InvalidTerrain(format!(
                    "row {} has {} cells, expected {}",
                    y, len, width
                )));
            }
            terrain.extend(row.chars().map(Terrain::from_symbol));
        }

        Ok(Self {
            name: name.into(),
            width: width as u32,
            height: height as u32,
            terrain,
            start_cell: None,
            places: Vec::new(),
        })
    }

    /// Map name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, at: Coordinate) -> Option<usize> {
        if at.x < 0 || at.y < 0 || at.x as u32 >= self.width || at.y as u32 >= self.height {
            return None;
        }
        Some(at.y as usize * self.width as usize + at.x as usize)
    }

    fn invalid(&self, coordinate: Coordinate) -> MapError {
        MapError::InvalidCoordinate {
            coordinate,
            width: self.width,
            height: self.height,
        }
    }

    /// Check whether a coordinate lies on the grid.
    pub fn contains(&self, at: Coordinate) -> bool {
        self.index(at).is_some()
    }

    /// Terrain of a cell, `None` outside the grid.
    pub fn terrain_at(&self, at: Coordinate) -> Option<Terrain> {
        self.index(at).map(|i| self.terrain[i])
    }

    /// Change the terrain of a cell.
    pub fn set_terrain(&mut self, at: Coordinate, terrain: Terrain) -> Result<(), MapError> {
        let i = self.index(at).ok_or_else(|| self.invalid(at))?;
        self.terrain[i] = terrain;
        Ok(())
    }

    /// Number of land cells.
    pub fn land_count(&self) -> usize {
        self.terrain.iter().filter(|t| **t == Terrain::Land).count()
    }

    /// Terrain rows as strings of terrain symbols.
    pub fn terrain_rows(&self) -> Vec<String> {
        if self.width == 0 {
            return vec![String::new(); self.height as usize];
        }
        self.terrain
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|t| t.symbol()).collect())
            .collect()
    }

    /// Whether the cell is land. Cells outside the grid are not.
    pub fn is_cell_on_land(&self, at: Coordinate) -> bool {
        self.terrain_at(at) == Some(Terrain::Land)
    }

    /// Current start cell.
    pub fn start_cell(&self) -> Option<Coordinate> {
        self.start_cell
    }

    /// Set the start cell, replacing any previous one.
    ///
    /// Only the bounds are checked here; a start cell in water is caught by
    /// [`WorldMap::check_for_export`].
    pub fn set_start_cell(&mut self, at: Coordinate) -> Result<(), MapError> {
        if !self.contains(at) {
            return Err(self.invalid(at));
        }
        if let Some(previous) = self.start_cell.replace(at) {
            log::debug!("Start cell moved from {} to {}", previous, at);
        } else {
            log::debug!("Start cell set to {}", at);
        }
        Ok(())
    }

    /// Places in insertion order.
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Add a place on a land cell.
    pub fn add_place(&mut self, place: Place) -> Result<(), MapError> {
        let at = place.coordinates;
        if !self.contains(at) {
            return Err(self.invalid(at));
        }
        if !self.is_cell_on_land(at) {
            return Err(MapError::PlaceOnWater { coordinate: at });
        }
        if let Some(existing) = self
            .places
            .iter()
            .find(|p| p.name == place.name || p.coordinates == at)
        {
            return Err(MapError::DuplicatePlace {
                name: existing.name.clone(),
                coordinate: existing.coordinates,
            });
        }

        log::debug!("Added place '{}' at {}", place.name, at);
        self.places.push(place);
        Ok(())
    }

    /// Check that the map can be exported.
    pub fn check_for_export(&self) -> Result<(), MapError> {
        let Some(start) = self.start_cell else {
            return Err(MapError::export_not_ready("no start cell"));
        };
        if !self.is_cell_on_land(start) {
            return Err(MapError::export_not_ready("start cell is in water"));
        }
        if let Some(place) = self
            .places
            .iter()
            .find(|p| !self.is_cell_on_land(p.coordinates))
        {
            return Err(MapError::export_not_ready(format!(
                "place '{}' is in water",
                place.name
            )));
        }
        Ok(())
    }

    /// Serialize the map to pretty JSON.
    pub fn to_json(&self) -> Result<String, MapError> {
        let file = MapFile {
            version: MAP_FORMAT_VERSION,
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            terrain: self.terrain_rows(),
            start_cell: self.start_cell,
            places: self.places.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Deserialize a map from JSON.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let file: MapFile = serde_json::from_str(json)?;

        if file.version > MAP_FORMAT_VERSION {
            return Err(MapError::VersionTooNew {
                file_version: file.version,
                supported_version: MAP_FORMAT_VERSION,
            });
        }

        if file.terrain.len() != file.height as usize {
            return Err(MapError::InvalidTerrain(format!(
                "{} rows for a map of height {}",
                file.terrain.len(),
                file.height
            )));
        }

        let mut map = Self::from_rows(file.name, &file.terrain)?;
        if map.height > 0 && map.width != file.width {
            return Err(MapError::InvalidTerrain(format!(
                "rows have {} cells for a map of width {}",
                map.width, file.width
            )));
        }
        map.width = file.width;

        if let Some(start) = file.start_cell {
            map.set_start_cell(start)?;
        }
        for place in file.places {
            map.add_place(place)?;
        }

        Ok(map)
    }

    /// Save the map to a file.
    pub fn save(&self, path: &Path) -> Result<(), MapError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved map '{}' to {:?}", self.name, path);
        Ok(())
    }

    /// Load a map from a file.
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let json = std::fs::read_to_string(path)?;
        let map = Self::from_json(&json)?;
        log::info!(
            "Loaded map '{}' ({}x{}, {} places) from {:?}",
            map.name,
            map.width,
            map.height,
            map.places.len(),
            path
        );
        Ok(map)
    }
}
