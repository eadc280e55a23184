//! worldedit - interactive world map editor core
//!
//! Arms one-shot recording sessions on map clicks (start cell selection and
//! place creation), keeps the marker overlay in sync with the map, and runs
//! validated exports on a background thread.

pub mod alert;
pub mod config;
pub mod constants;
pub mod dialog;
pub mod editor;
pub mod error;
pub mod export;
pub mod overlay;
pub mod recording;
pub mod view;

pub use alert::{ALERT_TITLE, AlertLog, AlertSink};
pub use config::{ConfigError, EditorConfig, LogLevel};
pub use dialog::{PlaceChannel, PlaceDialog, PlaceEvent, PlaceReply};
pub use editor::Editor;
pub use error::EditorError;
pub use export::{ExportOrchestrator, ExportOutcome, ExportProgress, ExportState, ExporterRegistry};
pub use overlay::{DisplaySurface, MarkerScene, MarkerStyle, OverlayRenderer};
pub use recording::{ClickOutcome, Purpose, RecordingController};
pub use view::ViewState;
pub use world_map;
