//! Adapters to the platform [Media Capture and Streams API][1] used by the
//! room session.
//!
//! The session never touches platform media objects directly: streams are
//! opaque [`MediaStreamHandle`]s, and acquiring new ones is delegated to
//! [`MediaDevices`] and [`MediaRecorder`] implementations.
//!
//! [1]: https://w3.org/TR/mediacapture-streams

pub mod recorder;

use std::{fmt, rc::Rc};

use async_trait::async_trait;
use derive_more::Display;
use tracerr::Traced;

#[doc(inline)]
pub use self::recorder::{
    artifact_file_name, Artifact, ArtifactSink, DeliveredResource,
    DeliveryError, MediaRecorder, RecorderTask,
};

/// Platform media stream, consisting of one or more tracks.
pub trait MediaStream {
    /// Returns unique ID of this [`MediaStream`].
    fn id(&self) -> String;

    /// Stops all the tracks of this [`MediaStream`], releasing their sources.
    fn stop_tracks(&self);
}

/// Shared reference to a platform [`MediaStream`].
///
/// Two handles are equal when they point to the streams with the same ID.
#[derive(Clone)]
pub struct MediaStreamHandle(Rc<dyn MediaStream>);

impl MediaStreamHandle {
    /// Wraps the provided [`MediaStream`] into a new [`MediaStreamHandle`].
    #[inline]
    pub fn new<S: MediaStream + 'static>(stream: S) -> Self {
        Self(Rc::new(stream))
    }

    /// Returns ID of the underlying [`MediaStream`].
    #[inline]
    pub fn id(&self) -> String {
        self.0.id()
    }

    /// Stops all the tracks of the underlying [`MediaStream`].
    #[inline]
    pub fn stop_tracks(&self) {
        self.0.stop_tracks();
    }
}

impl From<Rc<dyn MediaStream>> for MediaStreamHandle {
    #[inline]
    fn from(stream: Rc<dyn MediaStream>) -> Self {
        Self(stream)
    }
}

impl PartialEq for MediaStreamHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.id() == other.0.id()
    }
}

impl fmt::Debug for MediaStreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MediaStreamHandle").field(&self.0.id()).finish()
    }
}

/// Constraints of a [getDisplayMedia()][1] request.
///
/// [1]: https://w3.org/TR/screen-capture/#dom-mediadevices-getdisplaymedia
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DisplayMediaConstraints {
    /// Indicator whether a video track is requested.
    pub video: bool,

    /// Indicator whether an audio track is requested.
    pub audio: bool,
}

impl DisplayMediaConstraints {
    /// Returns [`DisplayMediaConstraints`] requesting a single video track.
    #[inline]
    #[must_use]
    pub fn video_only() -> Self {
        Self {
            video: true,
            audio: false,
        }
    }
}

/// Errors occurring when acquiring new media from the platform.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum MediaAcquisitionError {
    /// User has declined the capture permission prompt.
    #[display(fmt = "Media capture permission denied: {}", _0)]
    PermissionDenied(String),

    /// Requested capture device or source is unavailable.
    #[display(fmt = "Media capture device unavailable: {}", _0)]
    DeviceUnavailable(String),

    /// Platform cannot record the acquired stream with the requested format.
    #[display(fmt = "Media recording unsupported: {}", _0)]
    RecorderUnsupported(String),
}

/// Access to the platform media input devices.
#[async_trait(?Send)]
pub trait MediaDevices {
    /// Prompts the user for a display capture and returns the granted
    /// stream.
    ///
    /// Every successful call produces a new independent stream.
    ///
    /// # Errors
    ///
    /// With [`MediaAcquisitionError`] if the user declines the prompt or the
    /// capture source is unavailable.
    async fn get_display_media(
        &self,
        constraints: DisplayMediaConstraints,
    ) -> Result<MediaStreamHandle, Traced<MediaAcquisitionError>>;
}

/// Source of the conferencing screen share stream.
///
/// Implementations are responsible for publishing the acquired stream to the
/// remote peers and for switching them back once sharing stops.
#[async_trait(?Send)]
pub trait ScreenShareSource {
    /// Acquires a screen stream and starts publishing it.
    ///
    /// # Errors
    ///
    /// With [`MediaAcquisitionError`] if the screen cannot be captured.
    async fn start_screen_share(
        &self,
    ) -> Result<MediaStreamHandle, Traced<MediaAcquisitionError>>;

    /// Stops publishing the provided screen stream and releases it.
    fn stop_screen_share(&self, stream: &MediaStreamHandle);
}
