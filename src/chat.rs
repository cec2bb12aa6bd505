//! Visibility of the chat side panel.

use futures::stream::LocalBoxStream;
use medea_reactive::ObservableCell;

/// Chat side panel of the room page.
///
/// Only controls whether the panel is shown. Messages are out of its scope.
pub struct ChatPanel {
    /// Indicator whether the panel is shown.
    is_open: ObservableCell<bool>,
}

impl Default for ChatPanel {
    #[inline]
    fn default() -> Self {
        Self::new(false)
    }
}

impl ChatPanel {
    /// Creates a new [`ChatPanel`] with the provided visibility.
    #[inline]
    pub fn new(is_open: bool) -> Self {
        Self {
            is_open: ObservableCell::new(is_open),
        }
    }

    /// Indicates whether the panel is shown.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open.get()
    }

    /// Shows the panel if it's hidden, or hides it otherwise.
    pub fn toggle(&self) {
        self.is_open.mutate(|mut is_open| *is_open = !*is_open);
    }

    /// Shows or hides the panel.
    #[inline]
    pub fn set_open(&self, is_open: bool) {
        self.is_open.set(is_open);
    }

    /// Subscribes to the panel visibility changes.
    #[inline]
    pub fn on_change(&self) -> LocalBoxStream<'static, bool> {
        self.is_open.subscribe()
    }
}
