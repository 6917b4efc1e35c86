//! Shared data models for the covergen pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Cover styles and style parameters
//! - Per-frame quality scores
//! - Cover requests and rendered results
//! - Aspect ratios and palette colors

pub mod cover;
pub mod score;
pub mod style;

// Re-export common types
pub use cover::{CoverImage, CoverRequest, CoverResult};
pub use score::FrameScore;
pub use style::{
    AspectRatio, RgbColor, StyleKind, StyleParameters, StyleParseError, StyleValidationError,
};
