//! Place creation dialog contract.
//!
//! The recording controller only opens the dialog; it never waits for it.
//! The dialog answers later through a [`PlaceReply`], which feeds a
//! [`PlaceChannel`] drained by the editor on the interactive thread.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use world_map::{Coordinate, Place};

/// Answer of a place creation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceEvent {
    /// The user filled in the dialog and confirmed
    Confirmed(Place),
    /// The dialog was dismissed without creating a place
    Cancelled { seed: Coordinate },
}

/// One-shot reply handle given to a dialog when it opens.
///
/// Dropping the reply without answering counts as a cancellation.
#[derive(Debug)]
pub struct PlaceReply {
    seed: Coordinate,
    tx: Sender<PlaceEvent>,
    answered: bool,
}

impl PlaceReply {
    /// Cell the dialog was opened for.
    pub fn seed(&self) -> Coordinate {
        self.seed
    }

    /// Deliver the created place.
    pub fn confirm(mut self, place: Place) {
        self.send(PlaceEvent::Confirmed(place));
    }

    /// Report that the user dismissed the dialog.
    pub fn cancel(mut self) {
        self.send(PlaceEvent::Cancelled { seed: self.seed });
    }

    fn send(&mut self, event: PlaceEvent) {
        self.answered = true;
        if self.tx.send(event).is_err() {
            log::warn!("Place dialog answered after the editor went away");
        }
    }
}

impl Drop for PlaceReply {
    fn drop(&mut self) {
        if !self.answered {
            self.send(PlaceEvent::Cancelled { seed: self.seed });
        }
    }
}

/// Channel collecting dialog answers until the editor processes them.
#[derive(Debug)]
pub struct PlaceChannel {
    tx: Sender<PlaceEvent>,
    rx: Receiver<PlaceEvent>,
}

impl PlaceChannel {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Create a reply handle for a dialog opened on `seed`.
    pub fn reply(&self, seed: Coordinate) -> PlaceReply {
        PlaceReply {
            seed,
            tx: self.tx.clone(),
            answered: false,
        }
    }

    /// Take the oldest pending answer. Non-blocking.
    pub fn try_next(&self) -> Option<PlaceEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            // The channel keeps its own sender, so it never disconnects
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl Default for PlaceChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// A dialog collecting the metadata of a new place.
pub trait PlaceDialog {
    /// Present the dialog for `reply.seed()`. Must not block.
    fn open(&mut self, reply: PlaceReply);
}

impl<T: PlaceDialog> PlaceDialog for Rc<RefCell<T>> {
    fn open(&mut self, reply: PlaceReply) {
        self.borrow_mut().open(reply);
    }
}

/// Dialog that confirms immediately with preset metadata.
///
/// Used by the command line, where the metadata comes from arguments.
#[derive(Debug, Clone)]
pub struct PresetDialog {
    name: String,
    description: String,
}

impl PresetDialog {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl PlaceDialog for PresetDialog {
    fn open(&mut self, reply: PlaceReply) {
        let place = Place::new(self.name.clone(), reply.seed())
            .with_description(self.description.clone());
        reply.confirm(place);
    }
}

/// Dialog that keeps open requests until someone answers them.
#[derive(Debug, Default)]
pub struct PendingDialog {
    open: Vec<PlaceReply>,
}

impl PendingDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds of the dialogs still open.
    pub fn seeds(&self) -> Vec<Coordinate> {
        self.open.iter().map(PlaceReply::seed).collect()
    }

    /// Take every open request.
    pub fn take(&mut self) -> Vec<PlaceReply> {
        std::mem::take(&mut self.open)
    }
}

impl PlaceDialog for PendingDialog {
    fn open(&mut self, reply: PlaceReply) {
        log::debug!("Place dialog opened at {}", reply.seed());
        self.open.push(reply);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_delivers_place() {
        let channel = PlaceChannel::new();
        let reply = channel.reply(Coordinate::new(3, 4));
        assert_eq!(channel.try_next(), None);

        reply.confirm(Place::new("Town", Coordinate::new(3, 4)));

        assert_eq!(
            channel.try_next(),
            Some(PlaceEvent::Confirmed(Place::new("Town", Coordinate::new(3, 4))))
        );
        assert_eq!(channel.try_next(), None);
    }

    #[test]
    fn test_dropped_reply_is_cancel() {
        let channel = PlaceChannel::new();
        drop(channel.reply(Coordinate::new(1, 2)));

        assert_eq!(
            channel.try_next(),
            Some(PlaceEvent::Cancelled {
                seed: Coordinate::new(1, 2)
            })
        );
        assert_eq!(channel.try_next(), None);
    }

    #[test]
    fn test_explicit_cancel_sends_once() {
        let channel = PlaceChannel::new();
        channel.reply(Coordinate::new(0, 0)).cancel();

        assert!(matches!(
            channel.try_next(),
            Some(PlaceEvent::Cancelled { .. })
        ));
        assert_eq!(channel.try_next(), None);
    }

    #[test]
    fn test_preset_dialog_confirms_on_seed() {
        let channel = PlaceChannel::new();
        let mut dialog = PresetDialog::new("Harbour", "Where ships land");
        dialog.open(channel.reply(Coordinate::new(7, 1)));

        let Some(PlaceEvent::Confirmed(place)) = channel.try_next() else {
            panic!("expected a confirmed place");
        };
        assert_eq!(place.name, "Harbour");
        assert_eq!(place.description, "Where ships land");
        assert_eq!(place.coordinates, Coordinate::new(7, 1));
    }

    #[test]
    fn test_pending_dialog_keeps_requests() {
        let channel = PlaceChannel::new();
        let mut dialog = PendingDialog::new();
        dialog.open(channel.reply(Coordinate::new(2, 2)));

        assert_eq!(dialog.seeds(), vec![Coordinate::new(2, 2)]);
        assert_eq!(channel.try_next(), None);

        let mut open = dialog.take();
        assert!(dialog.seeds().is_empty());
        open.remove(0)
            .confirm(Place::new("Camp", Coordinate::new(2, 2)));
        assert!(matches!(
            channel.try_next(),
            Some(PlaceEvent::Confirmed(_))
        ));
    }
}
