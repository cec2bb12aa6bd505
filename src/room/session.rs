//! Shared state of a joined room.

use std::cell::Ref;

use futures::stream::LocalBoxStream;
use medea_reactive::ObservableCell;

use crate::{
    log::prelude::*,
    media::MediaStreamHandle,
    signalling::{PeerId, RoomId},
};

use super::{PeerRoster, RosterEvent};

/// Screen sharing slot of a room.
///
/// The active sharer is written only via
/// [`ScreenShareState::set_active_sharer()`], so every write fully replaces
/// the previous sharer.
pub struct ScreenShareState {
    /// Participant whose screen is currently shared, if any.
    active_sharer: ObservableCell<Option<PeerId>>,

    /// Screen stream acquired by the local participant.
    local_screen_stream: ObservableCell<Option<MediaStreamHandle>>,
}

impl ScreenShareState {
    fn new() -> Self {
        Self {
            active_sharer: ObservableCell::new(None),
            local_screen_stream: ObservableCell::new(None),
        }
    }

    /// Returns the participant whose screen is currently shared.
    #[inline]
    pub fn active_sharer(&self) -> Option<PeerId> {
        self.active_sharer.get()
    }

    /// Returns the screen stream acquired by the local participant.
    #[inline]
    pub fn local_screen_stream(&self) -> Option<MediaStreamHandle> {
        self.local_screen_stream.get()
    }

    /// Subscribes to the active sharer changes.
    #[inline]
    pub fn on_active_sharer_change(
        &self,
    ) -> LocalBoxStream<'static, Option<PeerId>> {
        self.active_sharer.subscribe()
    }

    /// Replaces the active sharer, returning the previous one.
    pub(crate) fn set_active_sharer(
        &self,
        sharer: Option<PeerId>,
    ) -> Option<PeerId> {
        let prev = self.active_sharer.replace(sharer);
        if prev != self.active_sharer.get() {
            debug!(
                "Active screen sharer changed: {:?} -> {:?}",
                prev,
                self.active_sharer.get(),
            );
        }
        prev
    }

    /// Replaces the local screen stream, returning the previous one.
    pub(crate) fn set_local_screen_stream(
        &self,
        stream: Option<MediaStreamHandle>,
    ) -> Option<MediaStreamHandle> {
        self.local_screen_stream.replace(stream)
    }
}

/// Room the local participant is in: its ID, local media, remote
/// participants and the screen sharing slot.
///
/// Each field has a single write path: the room ID is written on navigation,
/// the roster and remote sharing by [`RoomSession::apply()`], the local
/// sharing by the [`ScreenShareArbiter`].
///
/// [`ScreenShareArbiter`]: super::ScreenShareArbiter
pub struct RoomSession {
    /// ID of the local participant.
    local_peer_id: PeerId,

    /// ID of the room, synchronized with the current route.
    room_id: ObservableCell<RoomId>,

    /// Camera/microphone media of the local participant, once acquired.
    local_stream: ObservableCell<Option<MediaStreamHandle>>,

    /// Remote participants of the room.
    peers: ObservableCell<PeerRoster>,

    /// Screen sharing slot of the room.
    share: ScreenShareState,
}

impl RoomSession {
    /// Creates a new [`RoomSession`] of the local participant with the
    /// provided [`PeerId`].
    pub fn new(local_peer_id: PeerId) -> Self {
        Self {
            local_peer_id,
            room_id: ObservableCell::new(RoomId::default()),
            local_stream: ObservableCell::new(None),
            peers: ObservableCell::new(PeerRoster::default()),
            share: ScreenShareState::new(),
        }
    }

    /// Returns [`PeerId`] of the local participant.
    #[inline]
    pub fn local_peer_id(&self) -> &PeerId {
        &self.local_peer_id
    }

    /// Returns ID of this room.
    #[inline]
    pub fn room_id(&self) -> RoomId {
        self.room_id.get()
    }

    /// Sets ID of this room.
    pub fn set_room_id(&self, room_id: RoomId) {
        if self.room_id.replace(room_id.clone()) != room_id {
            info!("Room ID set to `{}`", room_id);
        }
    }

    /// Subscribes to this room ID changes.
    #[inline]
    pub fn on_room_id_change(&self) -> LocalBoxStream<'static, RoomId> {
        self.room_id.subscribe()
    }

    /// Returns media of the local participant.
    #[inline]
    pub fn local_stream(&self) -> Option<MediaStreamHandle> {
        self.local_stream.get()
    }

    /// Sets media of the local participant, or removes it if `None`.
    pub fn set_local_stream(&self, stream: Option<MediaStreamHandle>) {
        debug!("Local stream set to {:?}", stream);
        self.local_stream.set(stream);
    }

    /// Subscribes to the local participant media changes.
    #[inline]
    pub fn on_local_stream_change(
        &self,
    ) -> LocalBoxStream<'static, Option<MediaStreamHandle>> {
        self.local_stream.subscribe()
    }

    /// Returns remote participants of this room.
    #[inline]
    pub fn peers(&self) -> Ref<'_, PeerRoster> {
        self.peers.borrow()
    }

    /// Subscribes to the remote participants changes.
    #[inline]
    pub fn on_peers_change(&self) -> LocalBoxStream<'static, PeerRoster> {
        self.peers.subscribe()
    }

    /// Returns the screen sharing slot of this room.
    #[inline]
    pub fn share(&self) -> &ScreenShareState {
        &self.share
    }

    /// Indicates whether the local participant is the active screen sharer.
    #[inline]
    pub fn is_local_sharer(&self) -> bool {
        self.share.active_sharer().as_ref() == Some(&self.local_peer_id)
    }

    /// Applies the provided [`RosterEvent`] in a single step, so subscribers
    /// never observe it half-applied.
    ///
    /// Events about the local participant are ignored, as well as updates of
    /// unknown participants. A participant leaving while sharing its screen
    /// releases the sharing slot.
    pub fn apply(&self, event: RosterEvent) {
        if Self::subject(&event) == &self.local_peer_id {
            debug!("Ignoring roster event about local peer: {:?}", event);
            return;
        }

        match event {
            RosterEvent::PeerJoined { peer_id, user_name } => {
                info!("Peer `{}` joined as `{}`", peer_id, user_name);
                self.peers.mutate(|mut peers| {
                    peers.upsert(peer_id, user_name);
                });
            }
            RosterEvent::PeerRenamed { peer_id, user_name } => {
                self.peers.mutate(|mut peers| {
                    if !peers.rename(&peer_id, user_name) {
                        warn!("Cannot rename unknown peer `{}`", peer_id);
                    }
                });
            }
            RosterEvent::PeerStreamChanged { peer_id, stream } => {
                self.peers.mutate(|mut peers| {
                    if !peers.set_stream(&peer_id, stream) {
                        warn!("Dropping stream of unknown peer `{}`", peer_id);
                    }
                });
            }
            RosterEvent::PeerLeft { peer_id } => {
                info!("Peer `{}` left", peer_id);
                self.peers.mutate(|mut peers| {
                    drop(peers.remove(&peer_id));
                });
                if self.share.active_sharer().as_ref() == Some(&peer_id) {
                    self.share.set_active_sharer(None);
                }
            }
            RosterEvent::SharingStarted { peer_id } => {
                self.share.set_active_sharer(Some(peer_id));
            }
            RosterEvent::SharingStopped { peer_id } => {
                if self.share.active_sharer().as_ref() == Some(&peer_id) {
                    self.share.set_active_sharer(None);
                }
            }
        }
    }

    /// Returns [`PeerId`] of the participant the provided [`RosterEvent`] is
    /// about.
    fn subject(event: &RosterEvent) -> &PeerId {
        match event {
            RosterEvent::PeerJoined { peer_id, .. }
            | RosterEvent::PeerRenamed { peer_id, .. }
            | RosterEvent::PeerStreamChanged { peer_id, .. }
            | RosterEvent::PeerLeft { peer_id }
            | RosterEvent::SharingStarted { peer_id }
            | RosterEvent::SharingStopped { peer_id } => peer_id,
        }
    }
}
