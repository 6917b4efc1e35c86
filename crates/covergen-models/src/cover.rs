//! Cover request and result types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::score::FrameScore;
use crate::style::{AspectRatio, StyleParameters};

/// A request to render covers for one video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CoverRequest {
    /// Cover title; required, never empty.
    pub title: String,

    /// Optional secondary line under the title.
    #[serde(default)]
    pub subtitle: Option<String>,

    /// Fully-resolved style parameters.
    pub style: StyleParameters,
}

impl CoverRequest {
    /// Create a request with a title and style.
    pub fn new(title: impl Into<String>, style: StyleParameters) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            style,
        }
    }

    /// Set the subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

/// One rendered cover image.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CoverImage {
    /// Target aspect ratio this image was rendered for.
    pub aspect_ratio: AspectRatio,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Encoded JPEG bytes.
    pub data: Vec<u8>,
}

/// Terminal output of one pipeline invocation.
///
/// Value object with no back-references; serialization and persistence are
/// the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CoverResult {
    /// Rendered covers, one per configured target resolution.
    pub images: Vec<CoverImage>,
    /// Scores for every sampled frame, in sample order.
    pub scores: Vec<FrameScore>,
    /// Index into `scores` of the frame used for rendering.
    pub selected_frame_index: usize,
}
