//! Global constants for the world editor

/// Marker and export colors (RGB).
pub mod colors {
    /// Start cell marker fill
    pub const START_CELL: [u8; 3] = [0, 0, 0];
    /// Place marker fill and border
    pub const PLACE: [u8; 3] = [127, 127, 127];
    /// Highlighted cell border
    pub const HIGHLIGHT: [u8; 3] = [0, 0, 0];
    /// Land cells in exported previews
    pub const LAND: [u8; 3] = [34, 139, 34];
    /// Water cells in exported previews
    pub const WATER: [u8; 3] = [30, 144, 255];
}

/// Map view zoom limits.
pub mod zoom {
    /// Scale multiplier applied by one zoom-in step
    pub const IN_FACTOR: f32 = 1.25;
    /// Scale multiplier applied by one zoom-out step
    pub const OUT_FACTOR: f32 = 0.75;
    /// Zooming out is disabled at or below this scale
    pub const MIN_SCALE: f32 = 0.75;
    /// Zooming in is disabled at or above this scale
    pub const MAX_SCALE: f32 = 30.0;
}

/// Name of the worker thread running exports.
pub const EXPORT_THREAD_NAME: &str = "map-export";
