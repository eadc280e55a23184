//! Overlay markers drawn on top of the displayed map.
//!
//! The renderer keeps one handle per singleton role (start cell, highlighted
//! cell) and a growing list of place handles, and talks to whatever
//! [`DisplaySurface`] shows the map.

use world_map::{Coordinate, MapModel};

use crate::constants::colors;

/// Handle of a marker living on a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

/// Visual style of a one-cell marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Filled black cell
    StartCell,
    /// Filled grey cell with grey border
    Place,
    /// Black border only
    Highlight,
}

impl MarkerStyle {
    /// Fill color, if the marker is filled.
    pub fn fill(self) -> Option<[u8; 3]> {
        match self {
            MarkerStyle::StartCell => Some(colors::START_CELL),
            MarkerStyle::Place => Some(colors::PLACE),
            MarkerStyle::Highlight => None,
        }
    }

    /// Border color, if the marker has a border.
    pub fn outline(self) -> Option<[u8; 3]> {
        match self {
            MarkerStyle::StartCell => None,
            MarkerStyle::Place => Some(colors::PLACE),
            MarkerStyle::Highlight => Some(colors::HIGHLIGHT),
        }
    }
}

/// Surface displaying the map, on which markers can be added and removed.
pub trait DisplaySurface {
    /// Draw a one-cell marker and return its handle.
    fn add_marker(&mut self, at: Coordinate, style: MarkerStyle) -> MarkerHandle;

    /// Remove a marker. Unknown handles are ignored.
    fn remove_marker(&mut self, handle: MarkerHandle);

    /// Remove every marker.
    fn clear_markers(&mut self);
}

/// A marker currently shown by a [`MarkerScene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub handle: MarkerHandle,
    pub at: Coordinate,
    pub style: MarkerStyle,
}

/// In-memory display surface.
///
/// Used by the command line front-end, and by tests to observe what would
/// be on screen.
#[derive(Debug, Default)]
pub struct MarkerScene {
    next_id: u64,
    markers: Vec<Marker>,
}

impl MarkerScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live markers in drawing order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Cells covered by live markers of the given style.
    pub fn cells_with_style(&self, style: MarkerStyle) -> Vec<Coordinate> {
        self.markers
            .iter()
            .filter(|m| m.style == style)
            .map(|m| m.at)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl DisplaySurface for MarkerScene {
    fn add_marker(&mut self, at: Coordinate, style: MarkerStyle) -> MarkerHandle {
        let handle = MarkerHandle(self.next_id);
        self.next_id += 1;
        self.markers.push(Marker { handle, at, style });
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.retain(|m| m.handle != handle);
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }
}

/// Marker handles by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayRoles {
    pub start_cell: Option<MarkerHandle>,
    pub highlight: Option<MarkerHandle>,
    pub places: Vec<MarkerHandle>,
}

/// Keeps overlay markers on a display surface consistent with the map.
#[derive(Debug)]
pub struct OverlayRenderer<S: DisplaySurface> {
    surface: S,
    roles: OverlayRoles,
}

impl<S: DisplaySurface> OverlayRenderer<S> {
    /// Wrap a surface. No marker is drawn until [`OverlayRenderer::reset`].
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            roles: OverlayRoles::default(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn roles(&self) -> &OverlayRoles {
        &self.roles
    }

    /// Draw the start cell marker, replacing the previous one.
    pub fn draw_start_cell(&mut self, at: Coordinate) {
        if let Some(previous) = self.roles.start_cell.take() {
            self.surface.remove_marker(previous);
        }
        self.roles.start_cell = Some(self.surface.add_marker(at, MarkerStyle::StartCell));
    }

    /// Highlight a cell, clearing any previous highlight first.
    pub fn draw_highlight(&mut self, at: Coordinate) {
        self.clear_highlight();
        self.roles.highlight = Some(self.surface.add_marker(at, MarkerStyle::Highlight));
    }

    /// Remove the highlighted cell marker, if any.
    pub fn clear_highlight(&mut self) {
        if let Some(handle) = self.roles.highlight.take() {
            self.surface.remove_marker(handle);
        }
    }

    /// Add a place marker. Existing place markers are kept.
    pub fn draw_place(&mut self, at: Coordinate) {
        let handle = self.surface.add_marker(at, MarkerStyle::Place);
        self.roles.places.push(handle);
    }

    /// Rebuild every marker from the map, after a new map was loaded.
    pub fn reset<M: MapModel + ?Sized>(&mut self, model: &M) {
        self.surface.clear_markers();
        self.roles = OverlayRoles::default();

        for place in model.places() {
            self.draw_place(place.coordinates);
        }
        if let Some(start) = model.start_cell() {
            self.draw_start_cell(start);
        }

        log::debug!(
            "Overlay reset: {} places, start cell {:?}",
            self.roles.places.len(),
            model.start_cell()
        );
    }
}
