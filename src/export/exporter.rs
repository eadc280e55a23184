//! Trait definitions for export format implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

use world_map::WorldMap;

use super::error::ExportError;
use super::job::JobEvent;

/// Trait for map export formats.
///
/// Implementations run on the export worker thread and only see an
/// immutable snapshot of the map.
pub trait WorldExporter: Send + Sync {
    /// Unique identifier for this format (e.g., "json", "archive").
    fn id(&self) -> &'static str;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str;

    /// File extension of the written file, without dot.
    fn extension(&self) -> &'static str;

    /// Write `world` to `path`, reporting progress and honoring
    /// cancellation through `progress`.
    fn export(
        &self,
        world: &WorldMap,
        path: &Path,
        progress: &mut ProgressReporter,
    ) -> Result<ExportSummary, ExportError>;
}

/// Shared cancellation flag of an export job.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the job to stop at its next step.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Step counter handed to an exporter.
///
/// Each step checks the cancel token first, then notifies the interactive
/// thread (when a listener is attached).
#[derive(Debug)]
pub struct ProgressReporter {
    events: Option<Sender<JobEvent>>,
    cancel: CancelToken,
    done: usize,
    total: usize,
}

impl ProgressReporter {
    pub(crate) fn new(events: Sender<JobEvent>, cancel: CancelToken) -> Self {
        Self {
            events: Some(events),
            cancel,
            done: 0,
            total: 0,
        }
    }

    /// Reporter without listener, for running an exporter synchronously.
    pub fn detached(cancel: CancelToken) -> Self {
        Self {
            events: None,
            cancel,
            done: 0,
            total: 0,
        }
    }

    /// Announce how many steps the export will take.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    /// Fail with [`ExportError::Cancelled`] if cancellation was requested.
    pub fn check_cancelled(&self) -> Result<(), ExportError> {
        if self.cancel.is_cancelled() {
            Err(ExportError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Complete one step.
    pub fn advance(&mut self) -> Result<(), ExportError> {
        self.check_cancelled()?;
        self.step();
        Ok(())
    }

    /// Write the finished output to `path` as the last step.
    ///
    /// Cancellation is checked once before writing. Once the write has
    /// started the export can no longer be cancelled, so a cancelled job
    /// never leaves a file behind and a written file is always reported.
    pub fn commit(&mut self, path: &Path, bytes: &[u8]) -> Result<u64, ExportError> {
        self.check_cancelled()?;
        std::fs::write(path, bytes)?;
        self.step();
        Ok(bytes.len() as u64)
    }

    fn step(&mut self) {
        self.done += 1;
        if let Some(events) = &self.events {
            // A closed channel means nobody listens any more; keep working
            let _ = events.send(JobEvent::Progress {
                done: self.done,
                total: self.total,
            });
        }
    }

    pub fn done(&self) -> usize {
        self.done
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Result of a finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Exporter that produced the file
    pub format: &'static str,
    /// Written file
    pub path: PathBuf,
    /// Number of places exported
    pub places_exported: usize,
    /// Size of the written file
    pub bytes_written: u64,
}
