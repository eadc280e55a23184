//! Export orchestration: validate, run in the background, report back.
//!
//! State machine: `Idle -> Validating -> Running -> {Completed | Failed}`.
//! A validation failure goes straight to `Failed` without spawning a job.
//! `Completed` and `Failed` are left on the next trigger, which passes
//! through `Idle` again.
//!
//! At most one job runs at a time. Preventing a second trigger while one
//! runs is the caller's business (the UI disables its export action); a
//! trigger arriving anyway is refused with
//! [`EditorError::ExportAlreadyRunning`].

use std::path::PathBuf;
use std::sync::Arc;

use world_map::MapModel;

use super::exporter::{CancelToken, ExportSummary, WorldExporter};
use super::job::{ExportJob, JobEvent};
use crate::alert::AlertSink;
use crate::error::EditorError;

/// Surface presenting a running export to the user.
///
/// Closing the surface should cancel the job through the token handed to
/// [`ExportProgress::shown`].
pub trait ExportProgress {
    /// The job started; `cancel` stops it.
    fn shown(&mut self, cancel: CancelToken) {
        let _ = cancel;
    }

    /// `done` of `total` steps are finished.
    fn progress(&mut self, done: usize, total: usize) {
        let _ = (done, total);
    }

    /// The export finished. The surface closes itself.
    fn completed(&mut self, summary: &ExportSummary);

    /// The export failed. The surface stays open until the user dismisses it.
    fn failed(&mut self, message: &str);
}

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportState {
    #[default]
    Idle,
    Validating,
    Running,
    Completed,
    Failed,
}

/// Final result of an export job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed(ExportSummary),
    Failed(String),
    Cancelled,
}

struct RunningExport {
    job: ExportJob,
    surface: Box<dyn ExportProgress>,
}

/// Runs validated exports as single-flight background jobs.
#[derive(Default)]
pub struct ExportOrchestrator {
    state: ExportState,
    running: Option<RunningExport>,
    next_job_id: u64,
}

impl ExportOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Whether a job is in flight.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Validate the map and, if it is ready, start exporting a snapshot of
    /// it to `path` in the background.
    ///
    /// On success the surface is shown and the job id returned. Errors are
    /// returned for the caller to surface; no job exists in that case.
    pub fn start<M: MapModel + ?Sized>(
        &mut self,
        model: &M,
        exporter: Arc<dyn WorldExporter>,
        path: PathBuf,
        mut surface: Box<dyn ExportProgress>,
    ) -> Result<u64, EditorError> {
        if self.is_running() {
            log::warn!("Export requested while another export is running");
            return Err(EditorError::ExportAlreadyRunning);
        }

        if matches!(self.state, ExportState::Completed | ExportState::Failed) {
            self.state = ExportState::Idle;
        }

        self.state = ExportState::Validating;
        if let Err(e) = model.check_export_ready() {
            log::info!("Export refused: {}", e);
            self.state = ExportState::Failed;
            return Err(EditorError::from(e));
        }

        let id = self.next_job_id;
        self.next_job_id += 1;

        let job = match ExportJob::spawn(id, model.snapshot(), exporter, path) {
            Ok(job) => job,
            Err(e) => {
                log::error!("Could not start export: {}", e);
                self.state = ExportState::Failed;
                return Err(EditorError::ExportFailed(e.to_string()));
            }
        };

        surface.shown(job.cancel_token());
        self.running = Some(RunningExport { job, surface });
        self.state = ExportState::Running;
        Ok(id)
    }

    /// Forward pending job events to the surface. Non-blocking.
    ///
    /// Returns the outcome once the job is over.
    pub fn poll(&mut self, alerts: &mut dyn AlertSink) -> Option<ExportOutcome> {
        loop {
            let event = self.running.as_mut()?.job.try_event()?;
            if let Some(outcome) = self.dispatch(event, alerts) {
                return Some(outcome);
            }
        }
    }

    /// Block until the running job is over, forwarding every event.
    ///
    /// Meant for front-ends without an event loop; the interactive editor
    /// uses [`ExportOrchestrator::poll`].
    pub fn wait(&mut self, alerts: &mut dyn AlertSink) -> Option<ExportOutcome> {
        loop {
            let event = self.running.as_mut()?.job.wait_event()?;
            if let Some(outcome) = self.dispatch(event, alerts) {
                return Some(outcome);
            }
        }
    }

    fn dispatch(&mut self, event: JobEvent, alerts: &mut dyn AlertSink) -> Option<ExportOutcome> {
        let running = self.running.as_mut()?;
        let outcome = match event {
            JobEvent::Progress { done, total } => {
                running.surface.progress(done, total);
                return None;
            }
            JobEvent::Completed(summary) => {
                running.surface.completed(&summary);
                log::info!(
                    "Export completed: {} places to {:?}",
                    summary.places_exported,
                    summary.path
                );
                self.state = ExportState::Completed;
                ExportOutcome::Completed(summary)
            }
            JobEvent::Failed(message) => {
                running.surface.failed(&message);
                alerts.alert(&EditorError::ExportFailed(message.clone()).to_string());
                self.state = ExportState::Failed;
                ExportOutcome::Failed(message)
            }
            JobEvent::Cancelled => {
                log::info!("Export cancelled");
                self.state = ExportState::Idle;
                ExportOutcome::Cancelled
            }
        };
        self.running = None;
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    use world_map::{Coordinate, WorldMap};

    use super::*;
    use crate::alert::AlertLog;
    use crate::export::error::ExportError;
    use crate::export::exporter::ProgressReporter;

    /// What the progress surface saw.
    #[derive(Debug, Default)]
    struct SurfaceLog {
        shown: bool,
        progress: Vec<(usize, usize)>,
        completed: bool,
        failed: Option<String>,
        open: bool,
        cancel: Option<CancelToken>,
    }

    struct RecordingSurface(Rc<RefCell<SurfaceLog>>);

    impl ExportProgress for RecordingSurface {
        fn shown(&mut self, cancel: CancelToken) {
            let mut log = self.0.borrow_mut();
            log.shown = true;
            log.open = true;
            log.cancel = Some(cancel);
        }

        fn progress(&mut self, done: usize, total: usize) {
            self.0.borrow_mut().progress.push((done, total));
        }

        fn completed(&mut self, _summary: &ExportSummary) {
            let mut log = self.0.borrow_mut();
            log.completed = true;
            log.open = false;
        }

        fn failed(&mut self, message: &str) {
            self.0.borrow_mut().failed = Some(message.to_string());
        }
    }

    fn surface() -> (Box<dyn ExportProgress>, Rc<RefCell<SurfaceLog>>) {
        let log = Rc::new(RefCell::new(SurfaceLog::default()));
        let surface: Box<dyn ExportProgress> = Box::new(RecordingSurface(log.clone()));
        (surface, log)
    }

    struct FixedExporter {
        error: Option<&'static str>,
    }

    impl WorldExporter for FixedExporter {
        fn id(&self) -> &'static str {
            "fixed"
        }

        fn display_name(&self) -> &'static str {
            "Fixed"
        }

        fn extension(&self) -> &'static str {
            "out"
        }

        fn export(
            &self,
            world: &WorldMap,
            path: &Path,
            progress: &mut ProgressReporter,
        ) -> Result<ExportSummary, ExportError> {
            progress.set_total(2);
            progress.advance()?;
            progress.advance()?;
            match self.error {
                Some(message) => Err(ExportError::Worker(message.to_string())),
                None => Ok(ExportSummary {
                    format: self.id(),
                    path: path.to_path_buf(),
                    places_exported: world.places().len(),
                    bytes_written: 0,
                }),
            }
        }
    }

    /// Exporter that runs until its job is cancelled.
    struct UntilCancelled;

    impl WorldExporter for UntilCancelled {
        fn id(&self) -> &'static str {
            "until-cancelled"
        }

        fn display_name(&self) -> &'static str {
            "Until cancelled"
        }

        fn extension(&self) -> &'static str {
            "out"
        }

        fn export(
            &self,
            _world: &WorldMap,
            _path: &Path,
            progress: &mut ProgressReporter,
        ) -> Result<ExportSummary, ExportError> {
            for _ in 0..10_000 {
                progress.check_cancelled()?;
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            Err(ExportError::Worker("never cancelled".to_string()))
        }
    }

    fn ready_map() -> WorldMap {
        let mut map = WorldMap::from_rows("m", &["##", "##"]).unwrap();
        map.set_start_cell(Coordinate::new(1, 1)).unwrap();
        map
    }

    #[test]
    fn test_not_ready_never_runs() {
        let map = WorldMap::from_rows("m", &["##"]).unwrap();
        let mut orchestrator = ExportOrchestrator::new();
        let (surface, log) = surface();

        let result = orchestrator.start(
            &map,
            Arc::new(FixedExporter { error: None }),
            PathBuf::from("out"),
            surface,
        );

        assert_eq!(
            result,
            Err(EditorError::ExportNotReady("no start cell".to_string()))
        );
        assert_eq!(orchestrator.state(), ExportState::Failed);
        assert!(!orchestrator.is_running());
        assert!(!log.borrow().shown);
        assert_eq!(orchestrator.poll(&mut AlertLog::new()), None);
    }

    #[test]
    fn test_successful_export_closes_surface() {
        let mut orchestrator = ExportOrchestrator::new();
        let mut alerts = AlertLog::new();
        let (surface, log) = surface();

        orchestrator
            .start(
                &ready_map(),
                Arc::new(FixedExporter { error: None }),
                PathBuf::from("out"),
                surface,
            )
            .unwrap();
        assert_eq!(orchestrator.state(), ExportState::Running);
        assert!(log.borrow().open);

        let outcome = orchestrator.wait(&mut alerts);

        assert!(matches!(outcome, Some(ExportOutcome::Completed(_))));
        assert_eq!(orchestrator.state(), ExportState::Completed);
        assert!(!orchestrator.is_running());
        let log = log.borrow();
        assert!(log.completed);
        assert!(!log.open);
        assert_eq!(log.progress, vec![(1, 2), (2, 2)]);
        assert_eq!(log.failed, None);
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_failed_export_alerts_and_stays_open() {
        let mut orchestrator = ExportOrchestrator::new();
        let mut alerts = AlertLog::new();
        let (surface, log) = surface();

        orchestrator
            .start(
                &ready_map(),
                Arc::new(FixedExporter {
                    error: Some("disk full"),
                }),
                PathBuf::from("out"),
                surface,
            )
            .unwrap();

        let outcome = orchestrator.wait(&mut alerts);

        let message = "Export worker error: disk full".to_string();
        assert_eq!(outcome, Some(ExportOutcome::Failed(message.clone())));
        assert_eq!(orchestrator.state(), ExportState::Failed);
        assert_eq!(alerts.messages(), &[message.clone()]);
        let log = log.borrow();
        assert_eq!(log.failed, Some(message));
        assert!(!log.completed);
        assert!(log.open);
    }

    #[test]
    fn test_poll_eventually_completes() {
        let mut orchestrator = ExportOrchestrator::new();
        let mut alerts = AlertLog::new();
        let (surface, _log) = surface();

        orchestrator
            .start(
                &ready_map(),
                Arc::new(FixedExporter { error: None }),
                PathBuf::from("out"),
                surface,
            )
            .unwrap();

        let outcome = loop {
            if let Some(outcome) = orchestrator.poll(&mut alerts) {
                break outcome;
            }
            std::thread::yield_now();
        };
        assert!(matches!(outcome, ExportOutcome::Completed(_)));
    }

    #[test]
    fn test_second_trigger_refused_while_running() {
        let mut orchestrator = ExportOrchestrator::new();
        let (first, _) = surface();
        let (second, second_log) = surface();
        let map = ready_map();

        orchestrator
            .start(
                &map,
                Arc::new(FixedExporter { error: None }),
                PathBuf::from("a"),
                first,
            )
            .unwrap();
        let result = orchestrator.start(
            &map,
            Arc::new(FixedExporter { error: None }),
            PathBuf::from("b"),
            second,
        );

        assert_eq!(result, Err(EditorError::ExportAlreadyRunning));
        assert!(!second_log.borrow().shown);
        assert!(orchestrator.wait(&mut AlertLog::new()).is_some());

        // Once over, a new export may start
        let (third, _) = surface();
        assert_eq!(
            orchestrator.start(
                &map,
                Arc::new(FixedExporter { error: None }),
                PathBuf::from("c"),
                third,
            ),
            Ok(1)
        );
        orchestrator.wait(&mut AlertLog::new());
    }

    #[test]
    fn test_cancel_from_surface_returns_to_idle() {
        let mut orchestrator = ExportOrchestrator::new();
        let mut alerts = AlertLog::new();
        let (surface, log) = surface();

        orchestrator
            .start(
                &ready_map(),
                Arc::new(UntilCancelled),
                PathBuf::from("out"),
                surface,
            )
            .unwrap();
        let cancel = log.borrow().cancel.clone().unwrap();

        cancel.cancel();
        let outcome = orchestrator.wait(&mut alerts);

        assert_eq!(outcome, Some(ExportOutcome::Cancelled));
        assert_eq!(orchestrator.state(), ExportState::Idle);
        assert!(!orchestrator.is_running());
        assert!(alerts.is_empty());
        let log = log.borrow();
        assert!(!log.completed);
        assert_eq!(log.failed, None);
    }
}
