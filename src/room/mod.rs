//! Room state shared between the room page components.

mod roster;
mod session;
mod share;

#[doc(inline)]
pub use self::{
    roster::{PeerEntry, PeerRoster, RosterEvent},
    session::{RoomSession, ScreenShareState},
    share::ScreenShareArbiter,
};
