//! Recording of a captured [`MediaStreamHandle`] into a downloadable
//! [`Artifact`].

use std::fmt;

use bytes::{Bytes, BytesMut};
use chrono::{DateTime, SecondsFormat, Utc};
use derive_more::Display;
use futures::stream::LocalBoxStream;
use tracerr::Traced;

use super::{MediaAcquisitionError, MediaStreamHandle};

/// Running platform recorder of a single capture.
///
/// Recorded data is exposed as a lazy finite [`Stream`] of chunks, which
/// ends once the recorder is finalized and the last chunk is flushed. Each
/// [`MediaRecorder::start()`] call produces a new independent
/// [`RecorderTask`].
///
/// [`Stream`]: futures::Stream
pub struct RecorderTask {
    /// Chunks produced by the recorder, in their production order.
    pub chunks: LocalBoxStream<'static, Bytes>,

    /// Requests the recorder to flush its buffered data and end the
    /// [`RecorderTask::chunks`] stream.
    pub finalizer: Box<dyn FnOnce()>,
}

impl fmt::Debug for RecorderTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecorderTask").finish()
    }
}

/// Platform recorder factory.
pub trait MediaRecorder {
    /// Starts recording the provided `stream` with the provided `mime_type`.
    ///
    /// # Errors
    ///
    /// With [`MediaAcquisitionError::RecorderUnsupported`] if the platform
    /// cannot record the `stream` in the requested format.
    fn start(
        &self,
        stream: &MediaStreamHandle,
        mime_type: &str,
    ) -> Result<RecorderTask, Traced<MediaAcquisitionError>>;
}

/// Finalized recording as a single binary blob.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Artifact {
    /// Concatenated recorded data.
    data: Bytes,

    /// MIME type of the [`Artifact::data`].
    mime_type: String,
}

impl Artifact {
    /// Concatenates the provided `chunks` in their order into a new
    /// [`Artifact`].
    pub fn assemble<I>(chunks: I, mime_type: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = Bytes>,
    {
        let chunks: Vec<_> = chunks.into_iter().collect();
        let mut data =
            BytesMut::with_capacity(chunks.iter().map(Bytes::len).sum());
        for chunk in &chunks {
            data.extend_from_slice(chunk);
        }
        Self {
            data: data.freeze(),
            mime_type: mime_type.into(),
        }
    }

    /// Returns recorded data of this [`Artifact`].
    #[inline]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Returns MIME type of this [`Artifact`].
    #[inline]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns size of this [`Artifact`] in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Indicates whether this [`Artifact`] contains no data.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Builds a file name for an [`Artifact`] finalized at the provided `time`:
/// `<prefix>-<ISO 8601 timestamp>.<extension>`.
///
/// Timestamp has millisecond precision and `Z` suffix, the same as produced
/// by JS `Date.toISOString()`.
pub fn artifact_file_name(
    prefix: &str,
    extension: &str,
    time: DateTime<Utc>,
) -> String {
    format!(
        "{}-{}.{}",
        prefix,
        time.to_rfc3339_opts(SecondsFormat::Millis, true),
        extension,
    )
}

/// Error of delivering an [`Artifact`] to the user.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display(fmt = "Failed to deliver recording: {}", _0)]
pub struct DeliveryError(pub String);

/// Temporary resource backing a triggered [`Artifact`] delivery (a blob URL
/// or alike). Must outlive the start of the download.
pub trait DeliveredResource {
    /// Releases this resource.
    fn release(self: Box<Self>);
}

/// User-facing save/download capability.
pub trait ArtifactSink {
    /// Triggers delivery of the provided `artifact` as a file with the
    /// provided `file_name`.
    ///
    /// # Errors
    ///
    /// With [`DeliveryError`] if the delivery cannot be triggered.
    fn deliver(
        &self,
        artifact: &Artifact,
        file_name: &str,
    ) -> Result<Box<dyn DeliveredResource>, Traced<DeliveryError>>;
}
