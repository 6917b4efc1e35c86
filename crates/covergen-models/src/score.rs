//! Per-frame quality scores.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Quality metrics for one sampled frame.
///
/// Sub-metrics are stored in their normalized form so `score` is a pure
/// function of the other fields given a fixed set of weights; recomputing
/// from the same frame yields the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameScore {
    /// Ordinal position in the sampled sequence.
    pub frame_index: usize,

    /// Source timestamp in seconds.
    pub timestamp: f64,

    /// Mean luma, normalized to [0, 1].
    pub brightness: f64,

    /// Raw variance of the Laplacian on grayscale (sharpness, unbounded).
    pub laplacian_var: f64,

    /// Shannon entropy of the luma histogram, normalized to [0, 1].
    pub entropy: f64,

    /// Edge density in the bottom caption band, in [0, 1].
    pub subtitle_penalty: f64,

    /// Area fraction of the largest detected face, 0 when none.
    pub face_area: f64,

    /// Weighted composite of the above.
    pub score: f64,
}
