#![deny(unreachable_patterns)]
//! Video cover generation pipeline.
//!
//! This crate provides:
//! - Evenly-spaced-by-time candidate frame sampling via the ffmpeg CLI
//! - Per-frame quality scoring (sharpness, brightness, entropy, caption
//!   penalty, optional face bonus)
//! - Deterministic best-frame selection
//! - Styled cover rendering (glass / gradient / sticker) at fixed 9:16 and
//!   3:4 targets
//! - A façade wiring the stages together behind one call
//!
//! Face detection and font resolution are injected capabilities with safe
//! defaults; HTTP, persistence, and preset storage are the caller's
//! concern.

pub mod config;
pub mod detect;
pub mod error;
pub mod fonts;
pub mod pipeline;
pub mod probe;
pub mod render;
pub mod sampler;
pub mod score;
pub mod select;

pub use config::{CoverConfig, LayoutConfig, ScoreWeights, TargetSize};
pub use detect::{FaceBox, FaceDetect, NoopFaceDetector, SkinToneFaceDetector};
pub use error::{CoverError, PipelineResult};
pub use fonts::{load_fonts, FontResolver, FontRole, LoadedFonts, SystemFontResolver};
pub use pipeline::CoverPipeline;
pub use probe::{probe_video, VideoInfo};
pub use render::{cover_fit, CoverRenderer};
pub use sampler::{Frame, FrameSampler};
pub use score::{composite_score, FrameScorer};
pub use select::select_cover_frame;
