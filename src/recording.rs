//! Local screen recording, independent from the conferencing screen share.

use std::{cell::RefCell, mem, rc::Rc};

use bytes::Bytes;
use chrono::Utc;
use futures::{channel::oneshot, stream::LocalBoxStream, StreamExt as _};
use medea_reactive::ObservableCell;
use tracerr::Traced;

use crate::{
    conf,
    log::prelude::*,
    media::{
        artifact_file_name, Artifact, ArtifactSink, DeliveryError,
        DisplayMediaConstraints, MediaAcquisitionError, MediaDevices,
        MediaRecorder, MediaStreamHandle, RecorderTask,
    },
    notify::UserNotifier,
    platform,
    utils::TaskHandle,
};

/// Observable state of a [`RecordingSession`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordingState {
    /// Nothing is recorded.
    Idle,

    /// Display capture is being recorded.
    Capturing,
}

/// Internal phase of a [`RecordingSession`].
enum Phase {
    /// Nothing is recorded.
    Idle,

    /// User is being prompted for a display capture. Observed as
    /// [`RecordingState::Idle`].
    Acquiring,

    /// Display capture is being recorded.
    Capturing(ActiveCapture),
}

impl Phase {
    /// Returns [`RecordingState`] this [`Phase`] is observed as.
    fn state(&self) -> RecordingState {
        match self {
            Self::Idle | Self::Acquiring => RecordingState::Idle,
            Self::Capturing(_) => RecordingState::Capturing,
        }
    }
}

/// Resources of a single running capture.
///
/// Stops all the captured tracks once dropped, so they're released exactly
/// once regardless of how the capture ends.
struct ActiveCapture {
    /// Captured display stream.
    stream: MediaStreamHandle,

    /// Non-empty chunks recorded so far, in their arrival order.
    chunks: Rc<RefCell<Vec<Bytes>>>,

    /// Requests the recorder to flush and end its chunks stream.
    finalizer: Option<Box<dyn FnOnce()>>,

    /// Resolves once the recorder's chunks stream is drained.
    drained: Option<oneshot::Receiver<()>>,

    /// Task collecting the recorded chunks.
    _collector: TaskHandle,
}

impl ActiveCapture {
    /// Starts collecting the chunks of the provided [`RecorderTask`].
    fn spawn(stream: MediaStreamHandle, task: RecorderTask) -> Self {
        let RecorderTask {
            chunks: mut recorded,
            finalizer,
        } = task;
        let chunks = Rc::new(RefCell::new(Vec::new()));
        let (drained_tx, drained_rx) = oneshot::channel();

        let buffer = Rc::clone(&chunks);
        let collector = platform::spawn_abortable(async move {
            while let Some(chunk) = recorded.next().await {
                if !chunk.is_empty() {
                    buffer.borrow_mut().push(chunk);
                }
            }
            let _ = drained_tx.send(());
        });

        Self {
            stream,
            chunks,
            finalizer: Some(finalizer),
            drained: Some(drained_rx),
            _collector: collector,
        }
    }

    /// Finalizes the recorder and waits for its last chunks.
    async fn finalize(&mut self) -> Vec<Bytes> {
        if let Some(finalize) = self.finalizer.take() {
            finalize();
        }
        if let Some(drained) = self.drained.take() {
            let _ = drained.await;
        }
        mem::take(&mut *self.chunks.borrow_mut())
    }
}

impl Drop for ActiveCapture {
    fn drop(&mut self) {
        self.stream.stop_tracks();
    }
}

/// Display capture together with its recorder.
type Acquired = (MediaStreamHandle, RecorderTask);

/// Collaborators a [`RecordingSession`] captures and delivers through.
#[derive(Clone)]
pub struct RecordingDeps {
    /// Source of display captures.
    pub devices: Rc<dyn MediaDevices>,

    /// Recorder of the captured streams.
    pub recorder: Rc<dyn MediaRecorder>,

    /// Receiver of the finalized recordings.
    pub sink: Rc<dyn ArtifactSink>,

    /// Notifier of the failed recording starts.
    pub notifier: Rc<dyn UserNotifier>,
}

/// `Idle | Capturing` state machine recording a local display capture into
/// a downloadable [`Artifact`].
///
/// Captures are independent from the conferencing screen share, so both may
/// run at the same time.
pub struct RecordingSession {
    /// Recording settings.
    conf: conf::Recording,

    /// Collaborators of this [`RecordingSession`].
    deps: RecordingDeps,

    /// Current phase.
    phase: RefCell<Phase>,

    /// Observable state, always reflecting the [`RecordingSession::phase`].
    state: ObservableCell<RecordingState>,
}

impl RecordingSession {
    /// Creates a new [`Idle`] [`RecordingSession`].
    ///
    /// [`Idle`]: RecordingState::Idle
    pub fn new(conf: conf::Recording, deps: RecordingDeps) -> Self {
        Self {
            conf,
            deps,
            phase: RefCell::new(Phase::Idle),
            state: ObservableCell::new(RecordingState::Idle),
        }
    }

    /// Returns the current [`RecordingState`].
    #[inline]
    pub fn state(&self) -> RecordingState {
        self.state.get()
    }

    /// Subscribes to the [`RecordingState`] changes.
    #[inline]
    pub fn on_state_change(&self) -> LocalBoxStream<'static, RecordingState> {
        self.state.subscribe()
    }

    /// Returns the chunks recorded by the running capture so far.
    ///
    /// Empty if nothing is being recorded.
    pub fn buffered_chunks(&self) -> Vec<Bytes> {
        match &*self.phase.borrow() {
            Phase::Capturing(capture) => capture.chunks.borrow().clone(),
            Phase::Idle | Phase::Acquiring => Vec::new(),
        }
    }

    /// Switches to the provided [`Phase`], returning the previous one.
    fn set_phase(&self, phase: Phase) -> Phase {
        let state = phase.state();
        let prev = self.phase.replace(phase);
        self.state.set(state);
        prev
    }

    /// Prompts the user for a display capture and starts recording it.
    ///
    /// Does nothing if a capture is already being acquired or recorded.
    ///
    /// # Errors
    ///
    /// With [`MediaAcquisitionError`] if the display capture is declined or
    /// cannot be recorded. The user is notified about it, and this
    /// [`RecordingSession`] stays [`Idle`].
    ///
    /// [`Idle`]: RecordingState::Idle
    pub async fn start(&self) -> Result<(), Traced<MediaAcquisitionError>> {
        if !matches!(*self.phase.borrow(), Phase::Idle) {
            debug!("Screen recording is already started");
            return Ok(());
        }
        drop(self.set_phase(Phase::Acquiring));
        let _guard = AcquisitionGuard(self);

        match self.acquire().await {
            Ok((stream, task)) => {
                let capture = ActiveCapture::spawn(stream, task);
                drop(self.set_phase(Phase::Capturing(capture)));
                info!("Screen recording started");
                Ok(())
            }
            Err(e) => {
                error!("Failed to start screen recording: {}", e);
                self.deps.notifier.notify_failure(&self.conf.failure_notice);
                Err(e)
            }
        }
    }

    /// Acquires a new display capture and a recorder of it.
    async fn acquire(&self) -> Result<Acquired, Traced<MediaAcquisitionError>> {
        let stream = self
            .deps
            .devices
            .get_display_media(DisplayMediaConstraints::video_only())
            .await
            .map_err(tracerr::wrap!())?;
        let task = self
            .deps
            .recorder
            .start(&stream, &self.conf.mime_type)
            .map_err(|e| {
                stream.stop_tracks();
                e
            })
            .map_err(tracerr::wrap!())?;
        Ok((stream, task))
    }

    /// Stops the running recording and delivers its [`Artifact`] to the
    /// user.
    ///
    /// Captured tracks are stopped once the recorder is finalized, or as soon
    /// as the returned [`Future`] is dropped. The delivered resource is
    /// released after the configured grace delay.
    ///
    /// Does nothing if nothing is being recorded.
    ///
    /// # Errors
    ///
    /// With [`DeliveryError`] if the [`Artifact`] cannot be delivered.
    ///
    /// [`Future`]: std::future::Future
    pub async fn stop(&self) -> Result<(), Traced<DeliveryError>> {
        let mut capture = match self.set_phase(Phase::Idle) {
            Phase::Capturing(capture) => capture,
            phase => {
                drop(self.phase.replace(phase));
                debug!("Screen recording is not started");
                return Ok(());
            }
        };

        let chunks = capture.finalize().await;
        drop(capture);

        let artifact = Artifact::assemble(chunks, &*self.conf.mime_type);
        let file_name = artifact_file_name(
            &self.conf.file_name_prefix,
            &self.conf.file_extension,
            Utc::now(),
        );
        let resource = self
            .deps
            .sink
            .deliver(&artifact, &file_name)
            .map_err(tracerr::wrap!())?;
        info!(
            "Screen recording of {} bytes delivered as `{}`",
            artifact.len(),
            file_name,
        );

        let delay = self.conf.release_delay;
        platform::spawn(async move {
            platform::delay_for(delay).await;
            resource.release();
        });
        Ok(())
    }
}

/// Returns a [`RecordingSession`] back to the [`Phase::Idle`] if it's still
/// [`Phase::Acquiring`] once dropped.
struct AcquisitionGuard<'a>(&'a RecordingSession);

impl Drop for AcquisitionGuard<'_> {
    fn drop(&mut self) {
        let acquiring = matches!(*self.0.phase.borrow(), Phase::Acquiring);
        if acquiring {
            drop(self.0.set_phase(Phase::Idle));
        }
    }
}
