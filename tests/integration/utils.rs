//! Platform doubles wired into a [`RoomSessionController`].

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{channel::mpsc, StreamExt as _};
use medea_room_session::{
    media::{
        Artifact, ArtifactSink, DeliveredResource, DeliveryError,
        DisplayMediaConstraints, MediaAcquisitionError, MediaDevices,
        MediaRecorder, MediaStream, MediaStreamHandle, RecorderTask,
        ScreenShareSource,
    },
    notify::UserNotifier,
    signalling::{RoomEvent, SignalingChannel, SignalingError},
    ChatPanel, Conf, MediaCollaborators, RoomSession, RoomSessionController,
    User,
};
use tracerr::Traced;

/// [`MediaStream`] counting its tracks stops.
#[derive(Clone)]
pub struct Stream {
    id: &'static str,
    stops: Rc<Cell<usize>>,
}

impl Stream {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            stops: Rc::default(),
        }
    }

    pub fn stops(&self) -> usize {
        self.stops.get()
    }

    pub fn handle(&self) -> MediaStreamHandle {
        MediaStreamHandle::new(self.clone())
    }
}

impl MediaStream for Stream {
    fn id(&self) -> String {
        self.id.to_owned()
    }

    fn stop_tracks(&self) {
        self.stops.set(self.stops.get() + 1);
    }
}

/// [`SignalingChannel`] remembering all the emitted events.
#[derive(Default)]
pub struct Signaling {
    pub emitted: RefCell<Vec<RoomEvent>>,
}

impl SignalingChannel for Signaling {
    fn emit(&self, event: &RoomEvent) -> Result<(), Traced<SignalingError>> {
        self.emitted.borrow_mut().push(event.clone());
        Ok(())
    }
}

/// Platform prompt answering with queued streams, denying once they're out.
#[derive(Default)]
pub struct Prompt {
    granted: RefCell<VecDeque<Stream>>,
}

impl Prompt {
    pub fn grant(&self, stream: &Stream) {
        self.granted.borrow_mut().push_back(stream.clone());
    }

    fn answer(
        &self,
    ) -> Result<MediaStreamHandle, Traced<MediaAcquisitionError>> {
        self.granted
            .borrow_mut()
            .pop_front()
            .map(|s| s.handle())
            .ok_or_else(|| {
                tracerr::new!(MediaAcquisitionError::PermissionDenied(
                    "NotAllowedError".into()
                ))
            })
    }
}

#[async_trait(?Send)]
impl MediaDevices for Prompt {
    async fn get_display_media(
        &self,
        _: DisplayMediaConstraints,
    ) -> Result<MediaStreamHandle, Traced<MediaAcquisitionError>> {
        self.answer()
    }
}

#[async_trait(?Send)]
impl ScreenShareSource for Prompt {
    async fn start_screen_share(
        &self,
    ) -> Result<MediaStreamHandle, Traced<MediaAcquisitionError>> {
        self.answer()
    }

    fn stop_screen_share(&self, stream: &MediaStreamHandle) {
        stream.stop_tracks();
    }
}

/// [`MediaRecorder`] whose chunks are pushed by the test.
#[derive(Default)]
pub struct Recorder {
    chunks: RefCell<Option<mpsc::UnboundedSender<Bytes>>>,
}

impl Recorder {
    pub fn produce(&self, chunk: &'static [u8]) {
        if let Some(tx) = &*self.chunks.borrow() {
            tx.unbounded_send(Bytes::from_static(chunk)).unwrap();
        }
    }
}

impl MediaRecorder for Recorder {
    fn start(
        &self,
        _: &MediaStreamHandle,
        _: &str,
    ) -> Result<RecorderTask, Traced<MediaAcquisitionError>> {
        let (tx, rx) = mpsc::unbounded();
        let finalizing = tx.clone();
        drop(self.chunks.borrow_mut().replace(tx));
        Ok(RecorderTask {
            chunks: rx.boxed_local(),
            finalizer: Box::new(move || finalizing.close_channel()),
        })
    }
}

struct Resource(Rc<Cell<bool>>);

impl DeliveredResource for Resource {
    fn release(self: Box<Self>) {
        self.0.set(true);
    }
}

/// [`ArtifactSink`] remembering all the delivered files.
#[derive(Default)]
pub struct Downloads {
    pub files: RefCell<Vec<(Artifact, String)>>,
    pub released: Rc<Cell<bool>>,
}

impl ArtifactSink for Downloads {
    fn deliver(
        &self,
        artifact: &Artifact,
        file_name: &str,
    ) -> Result<Box<dyn DeliveredResource>, Traced<DeliveryError>> {
        self.files
            .borrow_mut()
            .push((artifact.clone(), file_name.to_owned()));
        Ok(Box::new(Resource(Rc::clone(&self.released))))
    }
}

/// [`UserNotifier`] remembering all the shown messages.
#[derive(Default)]
pub struct Alerts {
    pub shown: RefCell<Vec<String>>,
}

impl UserNotifier for Alerts {
    fn notify_failure(&self, message: &str) {
        self.shown.borrow_mut().push(message.to_owned());
    }
}

/// Room page of the `u1` participant named `Alice`, with all its doubles.
pub struct Page {
    pub user: Rc<User>,
    pub room: Rc<RoomSession>,
    pub signaling: Rc<Signaling>,
    pub screen: Rc<Prompt>,
    pub display: Rc<Prompt>,
    pub recorder: Rc<Recorder>,
    pub downloads: Rc<Downloads>,
    pub alerts: Rc<Alerts>,
    pub controller: RoomSessionController,
}

impl Page {
    pub fn new() -> Self {
        let user = Rc::new(User::new("u1".into(), "Alice"));
        let room = Rc::new(RoomSession::new("u1".into()));
        let signaling = Rc::new(Signaling::default());
        let screen = Rc::new(Prompt::default());
        let display = Rc::new(Prompt::default());
        let recorder = Rc::new(Recorder::default());
        let downloads = Rc::new(Downloads::default());
        let alerts = Rc::new(Alerts::default());
        let controller = RoomSessionController::new(
            &Conf::default(),
            Rc::clone(&user),
            Rc::clone(&room),
            Rc::new(ChatPanel::default()),
            Rc::clone(&signaling) as Rc<dyn SignalingChannel>,
            MediaCollaborators {
                screen: Rc::clone(&screen) as Rc<dyn ScreenShareSource>,
                devices: Rc::clone(&display) as Rc<dyn MediaDevices>,
                recorder: Rc::clone(&recorder) as Rc<dyn MediaRecorder>,
                sink: Rc::clone(&downloads) as Rc<dyn ArtifactSink>,
                notifier: Rc::clone(&alerts) as Rc<dyn UserNotifier>,
            },
        );
        Self {
            user,
            room,
            signaling,
            screen,
            display,
            recorder,
            downloads,
            alerts,
            controller,
        }
    }
}

/// Lets the spawned tasks run.
pub async fn settle() {
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }
}
