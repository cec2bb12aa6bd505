//! Top-level coordinator of the room page.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use futures::{
    future,
    stream::{self, LocalBoxStream},
    StreamExt as _,
};
use tracerr::Traced;

use crate::{
    chat::ChatPanel,
    conf::Conf,
    layout::{LayoutInput, LayoutResolver, RenderPlan, Tile},
    log::prelude::*,
    media::{
        ArtifactSink, DeliveryError, MediaAcquisitionError, MediaDevices,
        MediaRecorder, ScreenShareSource,
    },
    notify::UserNotifier,
    platform,
    recording::{RecordingDeps, RecordingSession, RecordingState},
    room::{RoomSession, ScreenShareArbiter},
    signalling::{JoinRoom, PeerId, RoomEvent, RoomId, SignalingChannel},
    user::User,
    utils::TaskHandle,
};

/// Platform media collaborators of a [`RoomSessionController`].
#[derive(Clone)]
pub struct MediaCollaborators {
    /// Source of the conferencing screen share.
    pub screen: Rc<dyn ScreenShareSource>,

    /// Source of the local recording display captures.
    pub devices: Rc<dyn MediaDevices>,

    /// Recorder of the local display captures.
    pub recorder: Rc<dyn MediaRecorder>,

    /// Receiver of the finalized recordings.
    pub sink: Rc<dyn ArtifactSink>,

    /// Notifier of the user-facing failures.
    pub notifier: Rc<dyn UserNotifier>,
}

/// Consistent snapshot of everything the room page renders.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomView {
    /// ID of the current room.
    pub room_id: RoomId,

    /// Arrangement of the video tiles and the chat panel.
    pub plan: RenderPlan,

    /// State of the local screen recording.
    pub recording: RecordingState,

    /// Indicator whether the chat panel is open.
    pub chat_open: bool,
}

/// Values a join request depends on, as observed at some moment.
#[derive(Clone, Debug, Eq, PartialEq)]
struct JoinTrigger {
    room_id: RoomId,
    peer_id: PeerId,
    user_name: String,
    ready: bool,
}

impl JoinTrigger {
    /// Observes the current [`JoinTrigger`] of the provided [`RoomSession`]
    /// and [`User`].
    fn observe(room: &RoomSession, user: &User) -> Self {
        Self {
            room_id: room.room_id(),
            peer_id: user.user_id().clone(),
            user_name: user.user_name(),
            ready: room.local_stream().is_some(),
        }
    }

    /// Returns [`JoinRoom`] request of this [`JoinTrigger`], if the local
    /// media is ready and there is a room to join.
    fn request(self) -> Option<JoinRoom> {
        if !self.ready || self.room_id.0.is_empty() {
            return None;
        }
        Some(JoinRoom {
            room_id: self.room_id,
            peer_id: self.peer_id,
            user_name: self.user_name,
        })
    }
}

/// Coordinator of a single room page.
///
/// Triggers join signaling, delegates user actions to the owned components
/// and composes their state into a [`RoomView`].
pub struct RoomSessionController {
    /// Local participant.
    user: Rc<User>,

    /// State of the room.
    room: Rc<RoomSession>,

    /// Chat side panel.
    chat: Rc<ChatPanel>,

    /// Outbound channel to the signaling server.
    signaling: Rc<dyn SignalingChannel>,

    /// Arbiter of the screen sharing slot.
    arbiter: ScreenShareArbiter,

    /// Local screen recording.
    recording: RecordingSession,

    /// Resolver of the [`RenderPlan`]s.
    layout: LayoutResolver,

    /// Task emitting the join requests, if [`watch_join()`] was called.
    ///
    /// [`watch_join()`]: RoomSessionController::watch_join
    join_task: RefCell<Option<TaskHandle>>,
}

impl RoomSessionController {
    /// Creates a new [`RoomSessionController`].
    ///
    /// The provided [`RoomSession`] must be created for the provided
    /// [`User`].
    pub fn new(
        conf: &Conf,
        user: Rc<User>,
        room: Rc<RoomSession>,
        chat: Rc<ChatPanel>,
        signaling: Rc<dyn SignalingChannel>,
        media: MediaCollaborators,
    ) -> Self {
        debug_assert_eq!(user.user_id(), room.local_peer_id());
        let MediaCollaborators {
            screen,
            devices,
            recorder,
            sink,
            notifier,
        } = media;
        Self {
            arbiter: ScreenShareArbiter::new(Rc::clone(&room), screen),
            recording: RecordingSession::new(
                conf.recording.clone(),
                RecordingDeps {
                    devices,
                    recorder,
                    sink,
                    notifier,
                },
            ),
            layout: LayoutResolver::new(conf.layout),
            join_task: RefCell::new(None),
            user,
            room,
            chat,
            signaling,
        }
    }

    /// Returns the local participant.
    #[inline]
    pub fn user(&self) -> &Rc<User> {
        &self.user
    }

    /// Returns state of the room.
    #[inline]
    pub fn room(&self) -> &Rc<RoomSession> {
        &self.room
    }

    /// Returns the chat side panel.
    #[inline]
    pub fn chat(&self) -> &Rc<ChatPanel> {
        &self.chat
    }

    /// Returns the local screen recording.
    #[inline]
    pub fn recording(&self) -> &RecordingSession {
        &self.recording
    }

    /// Synchronizes the room ID with the provided route parameter.
    ///
    /// Missing parameter resets the room ID to an empty one.
    pub fn navigate(&self, route_room_id: Option<&str>) {
        self.room.set_room_id(route_room_id.unwrap_or_default().into());
    }

    /// Returns a [`Stream`] of the [`JoinRoom`] requests.
    ///
    /// A request is produced on every change of the room ID, the local media
    /// readiness or the user name, as long as the local media is ready.
    /// Nothing is produced while the local media is absent.
    ///
    /// [`Stream`]: futures::Stream
    pub fn join_requests(&self) -> LocalBoxStream<'static, JoinRoom> {
        let room = Rc::downgrade(&self.room);
        let user = Rc::downgrade(&self.user);
        let changes = stream::select_all(vec![
            self.room.on_room_id_change().map(|_| ()).boxed_local(),
            self.room.on_local_stream_change().map(|_| ()).boxed_local(),
            self.user.on_user_name_change().map(|_| ()).boxed_local(),
        ]);

        let mut last = None;
        changes
            .filter_map(move |()| {
                let request = observe(&room, &user).and_then(|observed| {
                    if last.as_ref() == Some(&observed) {
                        return None;
                    }
                    last = Some(observed.clone());
                    observed.request()
                });
                future::ready(request)
            })
            .boxed_local()
    }

    /// Starts sending [`JoinRoom`] requests to the [`SignalingChannel`].
    ///
    /// Failed requests are not retried. Calling it again restarts the
    /// watching, so the current state is announced anew.
    pub fn watch_join(&self) {
        let signaling = Rc::clone(&self.signaling);
        let mut requests = self.join_requests();
        let task = platform::spawn_abortable(async move {
            while let Some(request) = requests.next().await {
                info!(
                    "Joining room `{}` as `{}`",
                    request.room_id, request.peer_id,
                );
                if let Err(e) = signaling.emit(&RoomEvent::JoinRoom(request)) {
                    warn!("Failed to send join request: {}", e);
                }
            }
        });
        drop(self.join_task.replace(Some(task)));
    }

    /// Toggles screen sharing of the local participant.
    ///
    /// # Errors
    ///
    /// With [`MediaAcquisitionError`] if the screen cannot be captured.
    pub async fn share_screen(
        &self,
    ) -> Result<(), Traced<MediaAcquisitionError>> {
        let result = self.arbiter.share_screen().await;
        if let Err(e) = &result {
            warn!("Failed to share screen: {}", e);
        }
        result.map_err(tracerr::wrap!())
    }

    /// Shows the chat panel if it's hidden, or hides it otherwise.
    #[inline]
    pub fn toggle_chat(&self) {
        self.chat.toggle();
    }

    /// Starts the local screen recording.
    ///
    /// # Errors
    ///
    /// With [`MediaAcquisitionError`] if the display capture is declined or
    /// cannot be recorded.
    pub async fn start_recording(
        &self,
    ) -> Result<(), Traced<MediaAcquisitionError>> {
        self.recording.start().await.map_err(tracerr::wrap!())
    }

    /// Stops the local screen recording and delivers it to the user.
    ///
    /// # Errors
    ///
    /// With [`DeliveryError`] if the recording cannot be delivered.
    pub async fn stop_recording(&self) -> Result<(), Traced<DeliveryError>> {
        self.recording.stop().await.map_err(tracerr::wrap!())
    }

    /// Composes the current [`RoomView`].
    pub fn view(&self) -> RoomView {
        let sharer = self.room.share().active_sharer();
        let peers = self.room.peers().without(sharer.as_ref());
        let chat_open = self.chat.is_open();
        let plan = self.layout.resolve(LayoutInput {
            share_stream: self.arbiter.active_share_stream(),
            is_local_sharer: self.room.is_local_sharer(),
            local: Tile::local(
                self.user.user_id().clone(),
                self.user.user_name(),
                self.room.local_stream(),
            ),
            peers,
            chat_open,
        });
        RoomView {
            room_id: self.room.room_id(),
            plan,
            recording: self.recording.state(),
            chat_open,
        }
    }
}

/// Observes the current [`JoinTrigger`], unless the page is gone already.
fn observe(
    room: &Weak<RoomSession>,
    user: &Weak<User>,
) -> Option<JoinTrigger> {
    let room = room.upgrade()?;
    let user = user.upgrade()?;
    Some(JoinTrigger::observe(&room, &user))
}
