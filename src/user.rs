//! Local participant identity.

use futures::stream::LocalBoxStream;
use medea_reactive::ObservableCell;

use crate::{log::prelude::*, signalling::PeerId};

/// Local participant of the room page.
pub struct User {
    /// Stable ID of the local participant.
    user_id: PeerId,

    /// Display name of the local participant, editable by the user.
    user_name: ObservableCell<String>,
}

impl User {
    /// Creates a new [`User`] with the provided ID and display name.
    pub fn new(user_id: PeerId, user_name: impl Into<String>) -> Self {
        Self {
            user_id,
            user_name: ObservableCell::new(user_name.into()),
        }
    }

    /// Returns ID of this [`User`].
    #[inline]
    pub fn user_id(&self) -> &PeerId {
        &self.user_id
    }

    /// Returns display name of this [`User`].
    #[inline]
    pub fn user_name(&self) -> String {
        self.user_name.get()
    }

    /// Changes display name of this [`User`].
    pub fn set_user_name(&self, user_name: impl Into<String>) {
        let user_name = user_name.into();
        debug!("User `{}` renamed to `{}`", self.user_id, user_name);
        self.user_name.set(user_name);
    }

    /// Subscribes to the display name changes.
    #[inline]
    pub fn on_user_name_change(&self) -> LocalBoxStream<'static, String> {
        self.user_name.subscribe()
    }
}
