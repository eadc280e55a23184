//! Recording mode: which action the next map click triggers.
//!
//! While a session is armed, each click first highlights the clicked cell
//! and then runs the handler of the armed [`Purpose`]. The session ends
//! after that single click whatever the handler's result.

use world_map::{Coordinate, MapModel};

use crate::alert::AlertSink;
use crate::dialog::{PlaceChannel, PlaceDialog};
use crate::error::EditorError;
use crate::overlay::{DisplaySurface, OverlayRenderer};

/// Action performed by the next click of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// Move the world's start cell to the clicked cell
    SetStartCell,
    /// Open the place creation dialog on the clicked cell
    AddPlace,
}

impl Purpose {
    /// Get the display name for this purpose.
    pub fn name(&self) -> &'static str {
        match self {
            Purpose::SetStartCell => "Select start cell",
            Purpose::AddPlace => "Add place",
        }
    }
}

/// What a map click ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No session was armed
    Ignored,
    /// The start cell now sits on the clicked cell
    StartCellSet(Coordinate),
    /// The map refused the clicked cell as start cell
    StartCellRejected(Coordinate),
    /// The clicked cell is water, no dialog was opened
    PlaceOnWater(Coordinate),
    /// The place creation dialog was opened on the clicked cell
    DialogOpened(Coordinate),
}

/// Everything a click handler may touch.
pub struct ClickTargets<'a, M, S: DisplaySurface> {
    pub model: &'a mut M,
    pub overlay: &'a mut OverlayRenderer<S>,
    pub dialog: &'a mut dyn PlaceDialog,
    pub places: &'a PlaceChannel,
    pub alerts: &'a mut dyn AlertSink,
}

type ClickHandler<M, S> = fn(Coordinate, &mut ClickTargets<'_, M, S>) -> ClickOutcome;

/// State machine for recording sessions. At most one session is armed.
#[derive(Debug, Clone, Default)]
pub struct RecordingController {
    current: Option<Purpose>,
}

impl RecordingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session is armed.
    pub fn is_recording(&self) -> bool {
        self.current.is_some()
    }

    /// Purpose of the armed session.
    pub fn purpose(&self) -> Option<Purpose> {
        self.current
    }

    /// Arm a session selecting the start cell.
    ///
    /// Returns false, leaving the current session untouched, if a session
    /// is already armed.
    pub fn arm_for_start_cell(&mut self) -> bool {
        self.arm(Purpose::SetStartCell)
    }

    /// Arm a session adding a place. Same rules as
    /// [`RecordingController::arm_for_start_cell`].
    pub fn arm_for_add_place(&mut self) -> bool {
        self.arm(Purpose::AddPlace)
    }

    fn arm(&mut self, purpose: Purpose) -> bool {
        if let Some(current) = self.current {
            log::debug!(
                "Ignoring '{}': '{}' is already recording",
                purpose.name(),
                current.name()
            );
            return false;
        }
        log::info!("Recording mode: {}", purpose.name());
        self.current = Some(purpose);
        true
    }

    /// End the armed session without acting, removing the highlight.
    pub fn cancel<S: DisplaySurface>(&mut self, overlay: &mut OverlayRenderer<S>) {
        if let Some(purpose) = self.current.take() {
            log::info!("Recording mode cancelled: {}", purpose.name());
            overlay.clear_highlight();
        }
    }

    /// Handle a raw click on the map at `at`.
    pub fn on_map_clicked<M: MapModel, S: DisplaySurface>(
        &mut self,
        at: Coordinate,
        targets: &mut ClickTargets<'_, M, S>,
    ) -> ClickOutcome {
        let Some(purpose) = self.current else {
            log::trace!("Click at {} outside recording mode", at);
            return ClickOutcome::Ignored;
        };

        targets.overlay.draw_highlight(at);

        let handler: ClickHandler<M, S> = match purpose {
            Purpose::SetStartCell => select_start_cell,
            Purpose::AddPlace => add_place,
        };
        let outcome = handler(at, targets);

        // The highlight stays on screen once the session ends
        self.current = None;
        log::debug!("Recording mode ended: {:?}", outcome);
        outcome
    }
}

fn select_start_cell<M: MapModel, S: DisplaySurface>(
    at: Coordinate,
    targets: &mut ClickTargets<'_, M, S>,
) -> ClickOutcome {
    match targets.model.set_start_cell(at) {
        Ok(()) => {
            targets.overlay.draw_start_cell(at);
            log::info!("Start cell set to {}", at);
            ClickOutcome::StartCellSet(at)
        }
        Err(e) => {
            let err = EditorError::from(e);
            targets.alerts.alert(&err.to_string());
            ClickOutcome::StartCellRejected(at)
        }
    }
}

fn add_place<M: MapModel, S: DisplaySurface>(
    at: Coordinate,
    targets: &mut ClickTargets<'_, M, S>,
) -> ClickOutcome {
    if !targets.model.is_land(at) {
        let err = EditorError::WaterPlacementRejected { coordinate: at };
        targets.alerts.alert(&err.to_string());
        return ClickOutcome::PlaceOnWater(at);
    }

    targets.dialog.open(targets.places.reply(at));
    ClickOutcome::DialogOpened(at)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use world_map::{MapError, Place, WorldMap};

    use super::*;
    use crate::alert::AlertLog;
    use crate::dialog::{PendingDialog, PlaceEvent};
    use crate::overlay::{MarkerScene, MarkerStyle};

    /// Map wrapper logging every model call.
    struct TracingModel {
        map: WorldMap,
        calls: Vec<String>,
    }

    impl MapModel for TracingModel {
        fn is_land(&self, at: Coordinate) -> bool {
            self.map.is_cell_on_land(at)
        }

        fn set_start_cell(&mut self, at: Coordinate) -> Result<(), MapError> {
            self.calls.push(format!("set_start_cell {}", at));
            self.map.set_start_cell(at)
        }

        fn add_place(&mut self, place: Place) -> Result<(), MapError> {
            self.calls.push(format!("add_place {}", place.name));
            self.map.add_place(place)
        }

        fn places(&self) -> &[Place] {
            self.map.places()
        }

        fn start_cell(&self) -> Option<Coordinate> {
            self.map.start_cell()
        }

        fn check_export_ready(&self) -> Result<(), MapError> {
            self.map.check_for_export()
        }

        fn snapshot(&self) -> Arc<WorldMap> {
            Arc::new(self.map.clone())
        }
    }

    struct Fixture {
        controller: RecordingController,
        model: TracingModel,
        overlay: OverlayRenderer<MarkerScene>,
        dialog: PendingDialog,
        places: PlaceChannel,
        alerts: AlertLog,
    }

    impl Fixture {
        fn new() -> Self {
            // Land in the middle, water around (2, 2) and the border
            let map = WorldMap::from_rows(
                "test",
                &[
                    "~~~~~~~~", "~######~", "~#~####~", "~######~", "~######~", "~######~",
                    "~######~", "~~~~~~~~",
                ],
            )
            .unwrap();
            Self {
                controller: RecordingController::new(),
                model: TracingModel {
                    map,
                    calls: Vec::new(),
                },
                overlay: OverlayRenderer::new(MarkerScene::new()),
                dialog: PendingDialog::new(),
                places: PlaceChannel::new(),
                alerts: AlertLog::new(),
            }
        }

        fn click(&mut self, x: i32, y: i32) -> ClickOutcome {
            let mut targets = ClickTargets {
                model: &mut self.model,
                overlay: &mut self.overlay,
                dialog: &mut self.dialog,
                places: &self.places,
                alerts: &mut self.alerts,
            };
            self.controller
                .on_map_clicked(Coordinate::new(x, y), &mut targets)
        }

        fn highlights(&self) -> Vec<Coordinate> {
            self.overlay
                .surface()
                .cells_with_style(MarkerStyle::Highlight)
        }
    }

    #[test]
    fn test_second_arm_is_ignored() {
        let mut controller = RecordingController::new();
        assert!(controller.arm_for_start_cell());
        assert!(!controller.arm_for_add_place());
        assert!(!controller.arm_for_start_cell());
        assert_eq!(controller.purpose(), Some(Purpose::SetStartCell));

        let mut controller = RecordingController::new();
        assert!(controller.arm_for_add_place());
        assert!(!controller.arm_for_start_cell());
        assert_eq!(controller.purpose(), Some(Purpose::AddPlace));
    }

    #[test]
    fn test_click_while_idle_does_nothing() {
        let mut f = Fixture::new();
        assert_eq!(f.click(3, 3), ClickOutcome::Ignored);

        assert!(f.model.calls.is_empty());
        assert!(f.overlay.surface().is_empty());
        assert!(f.alerts.is_empty());
        assert!(f.dialog.seeds().is_empty());
    }

    #[test]
    fn test_select_start_cell() {
        let mut f = Fixture::new();
        f.controller.arm_for_start_cell();

        assert_eq!(f.click(5, 5), ClickOutcome::StartCellSet(Coordinate::new(5, 5)));

        assert_eq!(f.model.calls, vec!["set_start_cell (5, 5)".to_string()]);
        assert_eq!(f.model.map.start_cell(), Some(Coordinate::new(5, 5)));
        assert_eq!(f.highlights(), vec![Coordinate::new(5, 5)]);
        assert_eq!(
            f.overlay.surface().cells_with_style(MarkerStyle::StartCell),
            vec![Coordinate::new(5, 5)]
        );
        assert!(!f.controller.is_recording());
        assert!(f.alerts.is_empty());
    }

    #[test]
    fn test_highlight_is_drawn_before_handler() {
        let mut f = Fixture::new();
        f.controller.arm_for_start_cell();
        f.click(4, 4);

        let styles: Vec<MarkerStyle> = f
            .overlay
            .surface()
            .markers()
            .iter()
            .map(|m| m.style)
            .collect();
        assert_eq!(styles, vec![MarkerStyle::Highlight, MarkerStyle::StartCell]);
    }

    #[test]
    fn test_rejected_start_cell_alerts_and_ends_session() {
        let mut f = Fixture::new();
        f.controller.arm_for_start_cell();

        assert_eq!(
            f.click(20, 1),
            ClickOutcome::StartCellRejected(Coordinate::new(20, 1))
        );

        assert_eq!(f.model.calls.len(), 1);
        assert_eq!(f.alerts.messages().len(), 1);
        assert!(f.alerts.last().unwrap().contains("Invalid coordinates"));
        assert!(
            f.overlay
                .surface()
                .cells_with_style(MarkerStyle::StartCell)
                .is_empty()
        );
        assert_eq!(f.highlights(), vec![Coordinate::new(20, 1)]);
        assert!(!f.controller.is_recording());
    }

    #[test]
    fn test_start_cell_replaces_previous_marker() {
        let mut f = Fixture::new();
        f.controller.arm_for_start_cell();
        f.click(1, 1);
        f.controller.arm_for_start_cell();
        f.click(6, 6);

        assert_eq!(
            f.overlay.surface().cells_with_style(MarkerStyle::StartCell),
            vec![Coordinate::new(6, 6)]
        );
        assert_eq!(f.highlights(), vec![Coordinate::new(6, 6)]);
    }

    #[test]
    fn test_add_place_on_water() {
        let mut f = Fixture::new();
        f.controller.arm_for_add_place();

        assert_eq!(f.click(2, 2), ClickOutcome::PlaceOnWater(Coordinate::new(2, 2)));

        assert_eq!(f.alerts.last(), Some("No place can be added in water"));
        assert!(f.dialog.seeds().is_empty());
        assert!(f.model.calls.is_empty());
        assert!(!f.controller.is_recording());
        assert_eq!(f.places.try_next(), None);
    }

    #[test]
    fn test_add_place_on_land_opens_dialog() {
        let mut f = Fixture::new();
        f.controller.arm_for_add_place();

        assert_eq!(f.click(3, 2), ClickOutcome::DialogOpened(Coordinate::new(3, 2)));

        assert_eq!(f.dialog.seeds(), vec![Coordinate::new(3, 2)]);
        assert_eq!(f.highlights(), vec![Coordinate::new(3, 2)]);
        assert!(f.alerts.is_empty());
        // The session is over before the dialog answers
        assert!(!f.controller.is_recording());
        assert_eq!(f.click(4, 4), ClickOutcome::Ignored);

        let reply = f.dialog.take().remove(0);
        reply.confirm(Place::new("Fort", Coordinate::new(3, 2)));
        assert!(matches!(f.places.try_next(), Some(PlaceEvent::Confirmed(_))));
    }

    #[test]
    fn test_cancel_clears_highlight() {
        let mut f = Fixture::new();
        f.controller.arm_for_start_cell();
        f.click(1, 1);
        f.controller.arm_for_add_place();

        f.controller.cancel(&mut f.overlay);

        assert!(!f.controller.is_recording());
        assert!(f.highlights().is_empty());
        assert_eq!(f.click(3, 3), ClickOutcome::Ignored);
    }
}
