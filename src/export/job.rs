//! Background thread running one export.
//!
//! Mirrors the decoder-thread pattern: the worker owns its inputs, reports
//! through an mpsc channel and never touches interactive state.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use world_map::WorldMap;

use super::error::ExportError;
use super::exporter::{CancelToken, ExportSummary, ProgressReporter, WorldExporter};
use crate::constants::EXPORT_THREAD_NAME;

/// Message sent from the export worker to the interactive thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// One more step is done
    Progress { done: usize, total: usize },
    /// The export finished normally
    Completed(ExportSummary),
    /// The export failed while running
    Failed(String),
    /// The export stopped because its surface was closed
    Cancelled,
}

impl JobEvent {
    /// Whether no event follows this one.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobEvent::Progress { .. })
    }
}

/// Handle on a running export thread.
pub struct ExportJob {
    id: u64,
    events: Receiver<JobEvent>,
    cancel: CancelToken,
    thread_handle: Option<JoinHandle<()>>,
    finished: bool,
}

impl ExportJob {
    /// Spawn the worker thread exporting `world` to `path`.
    pub fn spawn(
        id: u64,
        world: Arc<WorldMap>,
        exporter: Arc<dyn WorldExporter>,
        path: PathBuf,
    ) -> Result<Self, ExportError> {
        let (event_tx, events) = mpsc::channel::<JobEvent>();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();

        let thread_handle = thread::Builder::new()
            .name(format!("{}-{}", EXPORT_THREAD_NAME, id))
            .spawn(move || {
                log::info!("Export job {} started ({})", id, exporter.id());
                let mut progress = ProgressReporter::new(event_tx.clone(), worker_cancel);
                let event = match exporter.export(&world, &path, &mut progress) {
                    Ok(summary) => JobEvent::Completed(summary),
                    Err(ExportError::Cancelled) => JobEvent::Cancelled,
                    Err(e) => JobEvent::Failed(e.to_string()),
                };
                log::info!("Export job {} finished: {:?}", id, event);
                if event_tx.send(event).is_err() {
                    log::debug!("Export job {} has no listener left", id);
                }
            })
            .map_err(|e| ExportError::Worker(format!("Failed to spawn export thread: {}", e)))?;

        Ok(Self {
            id,
            events,
            cancel,
            thread_handle: Some(thread_handle),
            finished: false,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Token cancelling this job.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Whether the terminal event was received.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Take the next event without blocking.
    pub fn try_event(&mut self) -> Option<JobEvent> {
        if self.finished {
            return None;
        }
        let event = match self.events.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => self.lost_worker(),
        };
        self.finished = event.is_terminal();
        Some(event)
    }

    /// Wait for the next event.
    pub fn wait_event(&mut self) -> Option<JobEvent> {
        if self.finished {
            return None;
        }
        let event = self.events.recv().unwrap_or_else(|_| self.lost_worker());
        self.finished = event.is_terminal();
        Some(event)
    }

    /// The worker went away without a terminal event (it panicked).
    fn lost_worker(&self) -> JobEvent {
        log::error!("Export job {} stopped without reporting", self.id);
        JobEvent::Failed("The export stopped unexpectedly".to_string())
    }
}

impl Drop for ExportJob {
    fn drop(&mut self) {
        let Some(handle) = self.thread_handle.take() else {
            return;
        };
        if self.finished {
            if handle.join().is_err() {
                log::warn!("Export thread {} panicked", self.id);
            }
        } else {
            // Never block the interactive thread on a running export
            log::debug!("Detaching unfinished export job {}", self.id);
            self.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use world_map::Coordinate;

    use super::*;

    struct StepExporter {
        steps: usize,
        fail: bool,
    }

    impl WorldExporter for StepExporter {
        fn id(&self) -> &'static str {
            "steps"
        }

        fn display_name(&self) -> &'static str {
            "Steps"
        }

        fn extension(&self) -> &'static str {
            "txt"
        }

        fn export(
            &self,
            world: &WorldMap,
            path: &Path,
            progress: &mut ProgressReporter,
        ) -> Result<ExportSummary, ExportError> {
            progress.set_total(self.steps);
            for _ in 0..self.steps {
                progress.advance()?;
            }
            if self.fail {
                return Err(ExportError::InvalidMap("disk full".to_string()));
            }
            Ok(ExportSummary {
                format: self.id(),
                path: path.to_path_buf(),
                places_exported: world.places().len(),
                bytes_written: 0,
            })
        }
    }

    fn snapshot() -> Arc<WorldMap> {
        let mut map = WorldMap::from_rows("m", &["##"]).unwrap();
        map.set_start_cell(Coordinate::new(0, 0)).unwrap();
        Arc::new(map)
    }

    fn drain(job: &mut ExportJob) -> Vec<JobEvent> {
        let mut events = Vec::new();
        while let Some(event) = job.wait_event() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_job_reports_progress_then_completion() {
        let exporter = Arc::new(StepExporter {
            steps: 3,
            fail: false,
        });
        let mut job = ExportJob::spawn(1, snapshot(), exporter, PathBuf::from("out.txt")).unwrap();

        let events = drain(&mut job);

        assert_eq!(events.len(), 4);
        assert_eq!(events[0], JobEvent::Progress { done: 1, total: 3 });
        assert_eq!(events[2], JobEvent::Progress { done: 3, total: 3 });
        assert!(matches!(events[3], JobEvent::Completed(_)));
        assert!(job.is_finished());
        assert_eq!(job.try_event(), None);
    }

    #[test]
    fn test_job_failure_is_an_event() {
        let exporter = Arc::new(StepExporter {
            steps: 1,
            fail: true,
        });
        let mut job = ExportJob::spawn(2, snapshot(), exporter, PathBuf::from("out.txt")).unwrap();

        let events = drain(&mut job);

        assert_eq!(
            events.last(),
            Some(&JobEvent::Failed("Invalid map: disk full".to_string()))
        );
    }

    #[test]
    fn test_cancelled_job() {
        struct Blocking;

        impl WorldExporter for Blocking {
            fn id(&self) -> &'static str {
                "blocking"
            }

            fn display_name(&self) -> &'static str {
                "Blocking"
            }

            fn extension(&self) -> &'static str {
                "txt"
            }

            fn export(
                &self,
                _world: &WorldMap,
                _path: &Path,
                progress: &mut ProgressReporter,
            ) -> Result<ExportSummary, ExportError> {
                loop {
                    progress.check_cancelled()?;
                    thread::sleep(Duration::from_millis(1));
                }
            }
        }

        let mut job =
            ExportJob::spawn(3, snapshot(), Arc::new(Blocking), PathBuf::from("x")).unwrap();
        job.cancel_token().cancel();

        assert_eq!(drain(&mut job), vec![JobEvent::Cancelled]);
    }
}
