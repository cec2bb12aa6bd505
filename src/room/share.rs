//! Arbitration of the single screen sharing slot.

use std::{cell::Cell, rc::Rc};

use tracerr::Traced;

use crate::{
    log::prelude::*,
    media::{MediaAcquisitionError, MediaStreamHandle, ScreenShareSource},
};

use super::RoomSession;

/// Resolves which stream occupies the screen sharing slot of a
/// [`RoomSession`], and toggles the local participant in it.
pub struct ScreenShareArbiter {
    /// Room whose sharing slot is arbitrated.
    room: Rc<RoomSession>,

    /// Source of the local screen stream.
    source: Rc<dyn ScreenShareSource>,

    /// Indicator whether a local screen stream is being acquired right now.
    acquiring: Cell<bool>,
}

impl ScreenShareArbiter {
    /// Creates a new [`ScreenShareArbiter`] of the provided [`RoomSession`].
    pub fn new(
        room: Rc<RoomSession>,
        source: Rc<dyn ScreenShareSource>,
    ) -> Self {
        Self {
            room,
            source,
            acquiring: Cell::new(false),
        }
    }

    /// Toggles screen sharing of the local participant.
    ///
    /// If the local participant isn't sharing, acquires a screen stream from
    /// the [`ScreenShareSource`] and puts the local participant into the
    /// sharing slot, replacing any remote sharer. Otherwise, returns the local
    /// screen stream to the [`ScreenShareSource`] and frees the slot.
    ///
    /// Calls made while a screen stream is being acquired are ignored.
    ///
    /// # Errors
    ///
    /// With [`MediaAcquisitionError`] if the screen stream cannot be
    /// acquired. Sharing state is left untouched in this case.
    pub async fn share_screen(
        &self,
    ) -> Result<(), Traced<MediaAcquisitionError>> {
        if self.room.is_local_sharer() {
            self.stop_local_share();
            return Ok(());
        }
        if self.acquiring.replace(true) {
            debug!("Screen share is already being acquired");
            return Ok(());
        }

        let stream = {
            let _guard = AcquisitionGuard(&self.acquiring);
            self.source.start_screen_share().await
        }
        .map_err(tracerr::wrap!())?;

        let share = self.room.share();
        if let Some(stale) = share.set_local_screen_stream(Some(stream)) {
            self.source.stop_screen_share(&stale);
        }
        let prev =
            share.set_active_sharer(Some(self.room.local_peer_id().clone()));
        info!("Local screen sharing started, replacing {:?}", prev);
        Ok(())
    }

    /// Frees the sharing slot occupied by the local participant.
    fn stop_local_share(&self) {
        let share = self.room.share();
        if let Some(stream) = share.set_local_screen_stream(None) {
            self.source.stop_screen_share(&stream);
        }
        share.set_active_sharer(None);
        info!("Local screen sharing stopped");
    }

    /// Returns the stream occupying the sharing slot.
    ///
    /// That is the local screen stream if the local participant is sharing,
    /// or the sharing participant's stream from the roster otherwise.
    /// Returns `None` if nobody is sharing, or the sharer is unknown or has
    /// no stream.
    pub fn active_share_stream(&self) -> Option<MediaStreamHandle> {
        let sharer = self.room.share().active_sharer()?;
        if &sharer == self.room.local_peer_id() {
            self.room.share().local_screen_stream()
        } else {
            self.room.peers().stream_of(&sharer)
        }
    }
}

/// Resets the acquisition indicator once the prompt is answered or
/// abandoned.
struct AcquisitionGuard<'a>(&'a Cell<bool>);

impl Drop for AcquisitionGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
