//! Local screen recording settings.

use std::{borrow::Cow, time::Duration};

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Local screen recording settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct Recording {
    /// MIME type requested from the recorder and set on the produced
    /// artifact. Defaults to `video/webm`.
    #[default("video/webm")]
    pub mime_type: Cow<'static, str>,

    /// Prefix of the delivered artifact file name, followed by a `-` and an
    /// ISO 8601 timestamp. Defaults to `screen-recording`.
    #[default("screen-recording")]
    pub file_name_prefix: Cow<'static, str>,

    /// Extension of the delivered artifact file name. Defaults to `webm`.
    #[default("webm")]
    pub file_extension: Cow<'static, str>,

    /// Duration after a triggered delivery, upon which the temporary
    /// delivery resource is released. Defaults to `100ms`.
    #[default(Duration::from_millis(100))]
    #[serde(with = "humantime_serde")]
    pub release_delay: Duration,

    /// Notice shown to the user when a recording cannot be started.
    #[default("Could not start screen recording. Please try again.")]
    pub failure_notice: Cow<'static, str>,
}
