//! Room events sent to the signaling server.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use tracerr::Traced;

/// ID of a conference room.
#[derive(
    Clone, Debug, Default, Deserialize, Display, Eq, From, Hash, PartialEq,
    Serialize,
)]
#[from(forward)]
pub struct RoomId(pub String);

/// ID of a room participant, both local and remote.
#[derive(
    Clone, Debug, Default, Deserialize, Display, Eq, From, Hash, PartialEq,
    Serialize,
)]
#[from(forward)]
pub struct PeerId(pub String);

/// Request of the local participant to join a room.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoom {
    /// ID of the room to join.
    pub room_id: RoomId,

    /// ID of the joining participant.
    pub peer_id: PeerId,

    /// Display name of the joining participant.
    pub user_name: String,
}

/// Event sent by the room session to the signaling server.
#[derive(Clone, Debug, Deserialize, Eq, From, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum RoomEvent {
    /// Local participant joins a room, announcing itself to the other
    /// participants.
    #[serde(rename = "join-room")]
    JoinRoom(JoinRoom),
}

/// Error of sending a [`RoomEvent`] reported by a [`SignalingChannel`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display(fmt = "Signaling is unavailable: {}", _0)]
pub struct SignalingError(pub String);

/// Outbound channel to the signaling server.
///
/// Delivery, framing and retrying are up to the implementation.
#[cfg_attr(test, mockall::automock)]
pub trait SignalingChannel {
    /// Sends the provided [`RoomEvent`] to the signaling server.
    ///
    /// # Errors
    ///
    /// With [`SignalingError`] if the [`RoomEvent`] cannot be sent.
    fn emit(&self, event: &RoomEvent) -> Result<(), Traced<SignalingError>>;
}
