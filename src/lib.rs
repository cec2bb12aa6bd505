//! Session controller of a single [Medea] video conferencing room page.
//!
//! Joins the room once the local media is ready, keeps the remote roster and
//! the exclusive screen sharing slot consistent, drives the local screen
//! recording, and composes all of it into a single [`RoomView`].
//!
//! [Medea]: https://github.com/instrumentisto/medea
//! [`RoomView`]: controller::RoomView

// TODO: Remove `clippy::must_use_candidate` once the issue below is resolved:
//       https://github.com/rust-lang/rust-clippy/issues/4779
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

#[macro_use]
pub mod utils;
pub mod chat;
pub mod conf;
pub mod controller;
pub mod layout;
pub mod log;
pub mod media;
pub mod notify;
pub mod platform;
pub mod recording;
pub mod room;
pub mod signalling;
pub mod user;

#[doc(inline)]
pub use self::{
    chat::ChatPanel,
    conf::Conf,
    controller::{MediaCollaborators, RoomSessionController, RoomView},
    recording::{RecordingSession, RecordingState},
    room::{RoomSession, RosterEvent, ScreenShareArbiter},
    user::User,
};
