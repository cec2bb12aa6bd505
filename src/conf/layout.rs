//! Rendering layout settings.

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Rendering layout settings.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault,
)]
#[serde(default)]
pub struct Layout {
    /// Number of columns of the participants grid used when nobody is
    /// sharing a screen. Defaults to `4`.
    #[default(4)]
    pub grid_columns: usize,

    /// Number of columns of the participants sidebar shown next to a shared
    /// screen. Defaults to `1`.
    #[default(1)]
    pub sidebar_columns: usize,
}
