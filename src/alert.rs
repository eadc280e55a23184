//! Blocking alerts shown to the user.

use std::cell::RefCell;
use std::rc::Rc;

/// Title used for every error alert.
pub const ALERT_TITLE: &str = "An error occurred";

/// Surface able to show a blocking error alert.
pub trait AlertSink {
    /// Show `message` to the user.
    fn alert(&mut self, message: &str);
}

impl<T: AlertSink> AlertSink for Rc<RefCell<T>> {
    fn alert(&mut self, message: &str) {
        self.borrow_mut().alert(message);
    }
}

/// Alert sink that keeps every message, oldest first.
#[derive(Debug, Clone, Default)]
pub struct AlertLog {
    messages: Vec<String>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All alerts shown so far.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Most recent alert.
    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl AlertSink for AlertLog {
    fn alert(&mut self, message: &str) {
        log::warn!("{}: {}", ALERT_TITLE, message);
        self.messages.push(message.to_string());
    }
}
