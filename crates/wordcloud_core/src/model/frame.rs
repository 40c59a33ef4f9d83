//! Output shapes consumed by a rendering sink.
//!
//! # Responsibility
//! - Identify category buckets and visualization modes.
//! - Carry positioned labels / chart bars for one rendered frame.
//!
//! # Invariants
//! - `CategoryId` is string-encoded on the wire (`"0"`, `"1"`, ...) and
//!   ordered numerically in memory.
//! - Every frame is tagged with the generation it was computed for.

use crate::chart::ChartData;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;

/// Epoch index of a command-delimited category bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CategoryId(pub u64);

impl CategoryId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CategoryId> for String {
    fn from(value: CategoryId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for CategoryId {
    type Error = ParseIntError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.trim().parse::<u64>().map(Self)
    }
}

/// Process-wide visualization mode, switched only by in-band commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationMode {
    #[default]
    Cloud,
    Chart,
}

/// Rendering surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Monotonic token distinguishing the latest requested layout pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

/// One word placed by the cloud layout, in viewport coordinates.
///
/// `x`/`y` address the label center; rotation is applied around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedLabel {
    pub text: String,
    pub font_size: f64,
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub rotation_degrees: f64,
    pub category_id: CategoryId,
}

/// Drawable content for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameContent {
    /// Aggregate is empty: the sink shows its "no content yet" state.
    Placeholder,
    Cloud { labels: Vec<PlacedLabel> },
    Chart { chart: ChartData },
}

/// Frame handed to the rendering sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub generation: Generation,
    pub viewport: Viewport,
    pub content: FrameContent,
}

impl Frame {
    pub fn mode(&self) -> Option<VisualizationMode> {
        match self.content {
            FrameContent::Placeholder => None,
            FrameContent::Cloud { .. } => Some(VisualizationMode::Cloud),
            FrameContent::Chart { .. } => Some(VisualizationMode::Chart),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, FrameContent::Placeholder)
    }
}
