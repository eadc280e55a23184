//! Export format implementations.

mod archive;
mod json;

pub use archive::{ArchiveExporter, PREVIEW_ENTRY, WORLD_ENTRY, render_preview};
pub use json::JsonExporter;
