//! Scale state of the map view.

use world_map::Coordinate;

use crate::constants::zoom;

/// Zoom level of the displayed map and the cell it is focused on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    scale_factor: f32,
    focus: Option<Coordinate>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            focus: None,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Cell the view was last centered on.
    pub fn focus(&self) -> Option<Coordinate> {
        self.focus
    }

    /// Whether the zoom-in action is enabled.
    pub fn can_zoom_in(&self) -> bool {
        self.scale_factor < zoom::MAX_SCALE
    }

    /// Whether the zoom-out action is enabled.
    pub fn can_zoom_out(&self) -> bool {
        self.scale_factor > zoom::MIN_SCALE
    }

    /// Zoom in one step. Returns false when zooming in is disabled.
    pub fn zoom_in(&mut self) -> bool {
        if !self.can_zoom_in() {
            return false;
        }
        self.scale_factor *= zoom::IN_FACTOR;
        log::debug!("Zoom in: {:.2}x", self.scale_factor);
        true
    }

    /// Zoom out one step. Returns false when zooming out is disabled.
    pub fn zoom_out(&mut self) -> bool {
        if !self.can_zoom_out() {
            return false;
        }
        self.scale_factor *= zoom::OUT_FACTOR;
        log::debug!("Zoom out: {:.2}x", self.scale_factor);
        true
    }

    /// Zoom all the way in on a cell.
    pub fn center_on(&mut self, at: Coordinate) {
        self.scale_factor = zoom::MAX_SCALE;
        self.focus = Some(at);
        log::debug!("View centered on {}", at);
    }

    /// Back to the unscaled view, after a new map was loaded.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
