//! Grid coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One cell of the map grid.
///
/// Coordinates are signed so that clicks outside the map (left of or above
/// the origin) can still be represented and rejected by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    /// Create a coordinate from its column and row.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = String;

    /// Parse `x,y` (whitespace around either number is ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected 'x,y', got '{}'", s))?;
        let x = x
            .trim()
            .parse()
            .map_err(|e| format!("invalid x in '{}': {}", s, e))?;
        let y = y
            .trim()
            .parse()
            .map_err(|e| format!("invalid y in '{}': {}", s, e))?;
        Ok(Self::new(x, y))
    }
}
