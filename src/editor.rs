//! The interactive editor: the map being edited plus everything wired to it.
//!
//! All methods run on the interactive thread. Dialog answers and export
//! events arrive through channels and are applied when the front-end calls
//! [`Editor::process_dialog_results`] and [`Editor::poll_export`] from its
//! event loop.

use std::path::PathBuf;
use std::sync::Arc;

use world_map::{Coordinate, MapModel, Place};

use crate::alert::AlertSink;
use crate::dialog::{PlaceChannel, PlaceDialog, PlaceEvent};
use crate::error::EditorError;
use crate::export::{ExportOrchestrator, ExportOutcome, ExportProgress, ExportState, WorldExporter};
use crate::overlay::{DisplaySurface, OverlayRenderer};
use crate::recording::{ClickOutcome, ClickTargets, RecordingController};
use crate::view::ViewState;

/// Callback notified of every place added through the editor.
pub type PlaceSubscriber = Box<dyn FnMut(&Place)>;

/// Map editor session.
pub struct Editor<M: MapModel, S: DisplaySurface> {
    model: M,
    overlay: OverlayRenderer<S>,
    recording: RecordingController,
    places: PlaceChannel,
    dialog: Box<dyn PlaceDialog>,
    alerts: Box<dyn AlertSink>,
    subscribers: Vec<PlaceSubscriber>,
    view: ViewState,
    export: ExportOrchestrator,
}

impl<M: MapModel, S: DisplaySurface> Editor<M, S> {
    /// Open `model` on `surface`, drawing its existing places and start cell.
    pub fn new(
        model: M,
        surface: S,
        dialog: Box<dyn PlaceDialog>,
        alerts: Box<dyn AlertSink>,
    ) -> Self {
        let mut overlay = OverlayRenderer::new(surface);
        overlay.reset(&model);
        Self {
            model,
            overlay,
            recording: RecordingController::new(),
            places: PlaceChannel::new(),
            dialog,
            alerts,
            subscribers: Vec::new(),
            view: ViewState::default(),
            export: ExportOrchestrator::new(),
        }
    }

    /// Replace the edited map, returning the previous one.
    ///
    /// Any armed recording session ends and the overlay is redrawn from the
    /// new map.
    pub fn open_map(&mut self, model: M) -> M {
        self.recording.cancel(&mut self.overlay);
        let previous = std::mem::replace(&mut self.model, model);
        self.overlay.reset(&self.model);
        self.view.reset();
        log::info!("Opened map with {} places", self.model.places().len());
        previous
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn overlay(&self) -> &OverlayRenderer<S> {
        &self.overlay
    }

    pub fn recording(&self) -> &RecordingController {
        &self.recording
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn export_state(&self) -> ExportState {
        self.export.state()
    }

    /// Register a callback run after each place is stored.
    pub fn subscribe_places(&mut self, subscriber: impl FnMut(&Place) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Arm the "select start cell" action. See
    /// [`RecordingController::arm_for_start_cell`].
    pub fn arm_for_start_cell(&mut self) -> bool {
        self.recording.arm_for_start_cell()
    }

    /// Arm the "add place" action.
    pub fn arm_for_add_place(&mut self) -> bool {
        self.recording.arm_for_add_place()
    }

    /// Abort the armed action, if any.
    pub fn cancel_recording(&mut self) {
        self.recording.cancel(&mut self.overlay);
    }

    /// Forward a click on cell (`x`, `y`) to the recording controller.
    pub fn on_map_clicked(&mut self, x: i32, y: i32) -> ClickOutcome {
        let mut targets = ClickTargets {
            model: &mut self.model,
            overlay: &mut self.overlay,
            dialog: self.dialog.as_mut(),
            places: &self.places,
            alerts: self.alerts.as_mut(),
        };
        self.recording
            .on_map_clicked(Coordinate::new(x, y), &mut targets)
    }

    /// Apply every dialog answer received so far.
    ///
    /// Confirmed places are stored, drawn, and passed to the subscribers.
    /// Returns how many places were added.
    pub fn process_dialog_results(&mut self) -> usize {
        let mut added = 0;
        while let Some(event) = self.places.try_next() {
            match event {
                PlaceEvent::Confirmed(place) => {
                    if self.store_place(place) {
                        added += 1;
                    }
                }
                PlaceEvent::Cancelled { seed } => {
                    log::debug!("Place dialog at {} dismissed", seed);
                }
            }
        }
        added
    }

    fn store_place(&mut self, place: Place) -> bool {
        if let Err(e) = self.model.add_place(place.clone()) {
            self.alerts.alert(&EditorError::from(e).to_string());
            return false;
        }

        self.overlay.draw_place(place.coordinates);
        log::info!("Added place '{}' at {}", place.name, place.coordinates);
        for subscriber in &mut self.subscribers {
            subscriber(&place);
        }
        true
    }

    /// Validate the map and export it to `path` in the background.
    ///
    /// Refusals are shown as alerts. Returns the job id when a job started.
    pub fn export_map(
        &mut self,
        exporter: Arc<dyn WorldExporter>,
        path: PathBuf,
        surface: Box<dyn ExportProgress>,
    ) -> Option<u64> {
        match self.export.start(&self.model, exporter, path, surface) {
            Ok(id) => Some(id),
            Err(e) => {
                self.alerts.alert(&e.to_string());
                None
            }
        }
    }

    /// Forward pending export events. Non-blocking.
    pub fn poll_export(&mut self) -> Option<ExportOutcome> {
        self.export.poll(self.alerts.as_mut())
    }

    /// Block until the running export is over.
    pub fn wait_for_export(&mut self) -> Option<ExportOutcome> {
        self.export.wait(self.alerts.as_mut())
    }
}
