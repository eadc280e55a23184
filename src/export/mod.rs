//! Map export: validated, cancellable, run on a background thread.
//!
//! The [`ExportOrchestrator`] validates the map, snapshots it and hands the
//! snapshot to an [`ExportJob`] running one [`WorldExporter`]. The job talks
//! back to the interactive thread only through [`JobEvent`] messages, which
//! the orchestrator forwards to an [`ExportProgress`] surface.
//!
//! ## Built-in exporters
//!
//! - **json**: a single world description file
//! - **archive**: a zip holding the world description and a PNG preview

mod document;
mod error;
mod exporter;
pub mod formats;
mod job;
mod orchestrator;
mod registry;

pub use document::{EXPORT_FORMAT_VERSION, ExportDocument, PlaceEntry};
pub use error::ExportError;
pub use exporter::{CancelToken, ExportSummary, ProgressReporter, WorldExporter};
pub use job::{ExportJob, JobEvent};
pub use orchestrator::{ExportOrchestrator, ExportOutcome, ExportProgress, ExportState};
pub use registry::ExporterRegistry;
