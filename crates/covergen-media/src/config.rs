//! Configuration for the cover pipeline.
//!
//! All knobs live in one immutable struct handed to the pipeline at
//! construction time; nothing is read from ambient process state, so
//! concurrent invocations with different configs are safe.

use serde::{Deserialize, Serialize};

use covergen_models::AspectRatio;

/// Default number of candidate frames sampled per video.
pub const DEFAULT_SAMPLE_COUNT: usize = 9;
/// Default minimum spacing between sample timestamps, in seconds.
pub const DEFAULT_MIN_SAMPLE_SPACING: f64 = 1.0;
/// Default frame width used for scoring (analysis resolution).
pub const DEFAULT_ANALYSIS_WIDTH: u32 = 720;
/// Default JPEG quality for rendered covers.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Weights for the composite frame score.
///
/// The documented contract is the *ranking* behavior these induce
/// (sharper ≥ blurrier, mid-gray ≥ extremes, captioned frames penalized,
/// larger faces rewarded), not the exact floating-point output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of normalized Laplacian variance (default: 1.0)
    #[serde(default = "default_w_sharpness")]
    pub sharpness: f64,

    /// Weight of normalized histogram entropy (default: 1.0)
    #[serde(default = "default_w_entropy")]
    pub entropy: f64,

    /// Weight of the centered brightness curve (default: 0.5)
    #[serde(default = "default_w_brightness")]
    pub brightness: f64,

    /// Weight of the bottom-band caption penalty, subtracted (default: 0.9)
    #[serde(default = "default_w_subtitle")]
    pub subtitle: f64,

    /// Weight of the face-presence bonus (default: 2.0)
    #[serde(default = "default_w_face")]
    pub face: f64,
}

fn default_w_sharpness() -> f64 {
    1.0
}
fn default_w_entropy() -> f64 {
    1.0
}
fn default_w_brightness() -> f64 {
    0.5
}
fn default_w_subtitle() -> f64 {
    0.9
}
fn default_w_face() -> f64 {
    2.0
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            sharpness: default_w_sharpness(),
            entropy: default_w_entropy(),
            brightness: default_w_brightness(),
            subtitle: default_w_subtitle(),
            face: default_w_face(),
        }
    }
}

/// Text layout parameters for the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Title font size as a fraction of canvas height (default: 0.075)
    #[serde(default = "default_title_scale")]
    pub title_scale: f32,

    /// Subtitle font size as a fraction of canvas height (default: 0.045)
    #[serde(default = "default_subtitle_scale")]
    pub subtitle_scale: f32,

    /// Line advance as a multiple of font size (default: 1.25)
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,

    /// Maximum characters per title line (default: 16, policy range 10-18)
    #[serde(default = "default_title_wrap_chars")]
    pub title_wrap_chars: usize,

    /// Maximum characters per subtitle line (default: 14, policy range 10-16)
    #[serde(default = "default_subtitle_wrap_chars")]
    pub subtitle_wrap_chars: usize,

    /// Title font floor in pixels; shrink stops here (default: 24.0)
    #[serde(default = "default_title_min_px")]
    pub title_min_px: f32,

    /// Subtitle font floor in pixels (default: 16.0)
    #[serde(default = "default_subtitle_min_px")]
    pub subtitle_min_px: f32,

    /// Vertical band available to the text block, as a fraction of canvas
    /// height (default: 0.35)
    #[serde(default = "default_max_block_pct")]
    pub max_block_pct: f32,

    /// Multiplicative font shrink step when the block overflows (default: 0.9)
    #[serde(default = "default_shrink_step")]
    pub shrink_step: f32,
}

fn default_title_scale() -> f32 {
    0.075
}
fn default_subtitle_scale() -> f32 {
    0.045
}
fn default_line_spacing() -> f32 {
    1.25
}
fn default_title_wrap_chars() -> usize {
    16
}
fn default_subtitle_wrap_chars() -> usize {
    14
}
fn default_title_min_px() -> f32 {
    24.0
}
fn default_subtitle_min_px() -> f32 {
    16.0
}
fn default_max_block_pct() -> f32 {
    0.35
}
fn default_shrink_step() -> f32 {
    0.9
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            title_scale: default_title_scale(),
            subtitle_scale: default_subtitle_scale(),
            line_spacing: default_line_spacing(),
            title_wrap_chars: default_title_wrap_chars(),
            subtitle_wrap_chars: default_subtitle_wrap_chars(),
            title_min_px: default_title_min_px(),
            subtitle_min_px: default_subtitle_min_px(),
            max_block_pct: default_max_block_pct(),
            shrink_step: default_shrink_step(),
        }
    }
}

/// One output target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetSize {
    pub aspect: AspectRatio,
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    /// 1080x1920 portrait cover.
    pub const PORTRAIT_9X16: TargetSize = TargetSize {
        aspect: AspectRatio::PORTRAIT,
        width: 1080,
        height: 1920,
    };

    /// 1080x1440 three-by-four cover.
    pub const PORTRAIT_3X4: TargetSize = TargetSize {
        aspect: AspectRatio::THREE_FOUR,
        width: 1080,
        height: 1440,
    };
}

/// Configuration for one pipeline instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverConfig {
    // === Sampling ===
    /// Candidate frames sampled evenly across the duration (default: 9)
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,

    /// Minimum spacing between sample timestamps in seconds; short videos
    /// yield fewer frames rather than denser sampling (default: 1.0)
    #[serde(default = "default_min_sample_spacing")]
    pub min_sample_spacing: f64,

    /// Width frames are downscaled to for scoring (default: 720)
    #[serde(default = "default_analysis_width")]
    pub analysis_width: u32,

    // === Scoring ===
    #[serde(default)]
    pub weights: ScoreWeights,

    // === Rendering ===
    #[serde(default)]
    pub layout: LayoutConfig,

    /// JPEG quality for the rendered covers (default: 95)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Output targets (default: 1080x1920 and 1080x1440)
    #[serde(default = "default_targets")]
    pub targets: Vec<TargetSize>,
}

fn default_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}
fn default_min_sample_spacing() -> f64 {
    DEFAULT_MIN_SAMPLE_SPACING
}
fn default_analysis_width() -> u32 {
    DEFAULT_ANALYSIS_WIDTH
}
fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}
fn default_targets() -> Vec<TargetSize> {
    vec![TargetSize::PORTRAIT_9X16, TargetSize::PORTRAIT_3X4]
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            sample_count: default_sample_count(),
            min_sample_spacing: default_min_sample_spacing(),
            analysis_width: default_analysis_width(),
            weights: ScoreWeights::default(),
            layout: LayoutConfig::default(),
            jpeg_quality: default_jpeg_quality(),
            targets: default_targets(),
        }
    }
}

impl CoverConfig {
    /// Validate configuration ranges.
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_count == 0 || self.sample_count > 64 {
            return Err(format!("sample_count out of range [1, 64]: {}", self.sample_count));
        }
        if self.min_sample_spacing <= 0.0 {
            return Err(format!("min_sample_spacing must be positive: {}", self.min_sample_spacing));
        }
        if self.analysis_width < 64 {
            return Err(format!("analysis_width too small: {}", self.analysis_width));
        }
        if self.targets.is_empty() {
            return Err("at least one output target required".to_string());
        }
        Ok(())
    }
}
