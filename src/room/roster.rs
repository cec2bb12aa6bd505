//! Remote participants known to the local client.

use std::collections::{hash_map, HashMap};

use crate::{media::MediaStreamHandle, signalling::PeerId};

/// Remote participant of a room.
#[derive(Clone, Debug, PartialEq)]
pub struct PeerEntry {
    /// ID of this participant.
    pub peer_id: PeerId,

    /// Display name of this participant.
    pub user_name: String,

    /// Media received from this participant, if any arrived yet.
    pub stream: Option<MediaStreamHandle>,
}

impl PeerEntry {
    /// Creates a new [`PeerEntry`] without any media.
    #[inline]
    pub fn new(peer_id: PeerId, user_name: String) -> Self {
        Self {
            peer_id,
            user_name,
            stream: None,
        }
    }
}

/// Update of the remote participants set, produced by the signaling layer.
///
/// Each [`RosterEvent`] is applied atomically.
#[derive(Clone, Debug, PartialEq)]
pub enum RosterEvent {
    /// Remote participant joined the room.
    PeerJoined {
        /// ID of the joined participant.
        peer_id: PeerId,

        /// Display name of the joined participant.
        user_name: String,
    },

    /// Remote participant changed its display name.
    PeerRenamed {
        /// ID of the renamed participant.
        peer_id: PeerId,

        /// New display name of the participant.
        user_name: String,
    },

    /// Media of a remote participant has been received, or has ended if
    /// `stream` is `None`.
    PeerStreamChanged {
        /// ID of the participant.
        peer_id: PeerId,

        /// Received media.
        stream: Option<MediaStreamHandle>,
    },

    /// Remote participant left the room.
    PeerLeft {
        /// ID of the left participant.
        peer_id: PeerId,
    },

    /// Participant started sharing its screen.
    SharingStarted {
        /// ID of the sharing participant.
        peer_id: PeerId,
    },

    /// Participant stopped sharing its screen.
    SharingStopped {
        /// ID of the participant that was sharing.
        peer_id: PeerId,
    },
}

/// Remote participants of a room, keyed by their [`PeerId`]s.
///
/// Never contains the local participant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PeerRoster(HashMap<PeerId, PeerEntry>);

impl PeerRoster {
    /// Returns the [`PeerEntry`] with the provided [`PeerId`], if any.
    #[inline]
    pub fn get(&self, peer_id: &PeerId) -> Option<&PeerEntry> {
        self.0.get(peer_id)
    }

    /// Returns media of the participant with the provided [`PeerId`], if the
    /// participant is known and has any.
    #[inline]
    pub fn stream_of(&self, peer_id: &PeerId) -> Option<MediaStreamHandle> {
        self.0.get(peer_id).and_then(|peer| peer.stream.clone())
    }

    /// Indicates whether the participant with the provided [`PeerId`] is
    /// known.
    #[inline]
    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.0.contains_key(peer_id)
    }

    /// Returns count of the known participants.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether no participants are known.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the known participants in no particular order.
    #[inline]
    pub fn iter(&self) -> hash_map::Values<'_, PeerId, PeerEntry> {
        self.0.values()
    }

    /// Returns the known participants except the one with the provided
    /// [`PeerId`], sorted by their [`PeerId`]s.
    pub fn without(&self, excluded: Option<&PeerId>) -> Vec<PeerEntry> {
        let mut peers: Vec<_> = self
            .0
            .values()
            .filter(|peer| Some(&peer.peer_id) != excluded)
            .cloned()
            .collect();
        peers.sort_by(|a, b| a.peer_id.0.cmp(&b.peer_id.0));
        peers
    }

    /// Inserts a new participant, or renames an already known one keeping
    /// its media.
    pub(crate) fn upsert(&mut self, peer_id: PeerId, user_name: String) {
        match self.0.entry(peer_id) {
            hash_map::Entry::Occupied(mut entry) => {
                entry.get_mut().user_name = user_name;
            }
            hash_map::Entry::Vacant(entry) => {
                let peer_id = entry.key().clone();
                entry.insert(PeerEntry::new(peer_id, user_name));
            }
        }
    }

    /// Renames a known participant.
    ///
    /// Returns `false` if the participant is unknown.
    pub(crate) fn rename(
        &mut self,
        peer_id: &PeerId,
        user_name: String,
    ) -> bool {
        self.0
            .get_mut(peer_id)
            .map(|peer| peer.user_name = user_name)
            .is_some()
    }

    /// Sets media of a known participant.
    ///
    /// Returns `false` if the participant is unknown.
    pub(crate) fn set_stream(
        &mut self,
        peer_id: &PeerId,
        stream: Option<MediaStreamHandle>,
    ) -> bool {
        self.0
            .get_mut(peer_id)
            .map(|peer| peer.stream = stream)
            .is_some()
    }

    /// Removes a participant returning its [`PeerEntry`].
    pub(crate) fn remove(&mut self, peer_id: &PeerId) -> Option<PeerEntry> {
        self.0.remove(peer_id)
    }
}

impl From<HashMap<PeerId, PeerEntry>> for PeerRoster {
    #[inline]
    fn from(peers: HashMap<PeerId, PeerEntry>) -> Self {
        Self(peers)
    }
}
