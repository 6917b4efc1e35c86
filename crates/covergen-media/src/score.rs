//! Per-frame quality scoring.
//!
//! All metrics are pure functions of the frame pixels; the only injected
//! capability is face detection, which defaults to a no-op. Degenerate
//! frames (single-color, tiny) produce zero sub-scores rather than NaNs or
//! panics.

use std::sync::Arc;

use image::RgbImage;

use crate::config::ScoreWeights;
use crate::detect::FaceDetect;
use crate::sampler::Frame;
use covergen_models::FrameScore;

/// Empirical scale dividing raw Laplacian variance into [0, 1].
pub const LAPLACIAN_NORM: f64 = 220.0;
/// Luma histogram bin count for the entropy metric.
pub const LUMA_HIST_BINS: usize = 64;
/// Maximum histogram entropy in bits (log2 of the bin count).
pub const MAX_ENTROPY_BITS: f64 = 6.0;
/// Fraction of frame height treated as the burned-in caption band.
pub const SUBTITLE_BAND_FRAC: f64 = 0.18;
/// Gradient magnitude above which a pixel counts as an edge.
pub const EDGE_THRESHOLD: f32 = 40.0;
/// Gain applied to the largest face's area fraction before clamping to 1.
pub const FACE_AREA_GAIN: f64 = 6.0;

/// Scores sampled frames with a fixed weight set and an injected,
/// optional face-detection capability.
pub struct FrameScorer {
    weights: ScoreWeights,
    detector: Arc<dyn FaceDetect>,
}

impl FrameScorer {
    /// Create a scorer.
    pub fn new(weights: ScoreWeights, detector: Arc<dyn FaceDetect>) -> Self {
        Self { weights, detector }
    }

    /// Score one frame. Never fails for a well-formed frame.
    pub fn score(&self, frame: &Frame) -> FrameScore {
        let gray = GrayPlane::from_rgb(&frame.image);

        let brightness = gray.mean() / 255.0;
        let laplacian_var = gray.laplacian_variance();
        let entropy = gray.histogram_entropy() / MAX_ENTROPY_BITS;
        let subtitle_penalty = gray.caption_band_edge_density();

        let (w, h) = (frame.image.width(), frame.image.height());
        let face_area = self
            .detector
            .detect(&frame.image)
            .iter()
            .map(|f| f.area_fraction(w, h))
            .fold(0.0_f64, f64::max);

        let score = composite_score(
            &self.weights,
            brightness,
            laplacian_var,
            entropy,
            subtitle_penalty,
            face_area,
        );

        FrameScore {
            frame_index: frame.frame_index,
            timestamp: frame.timestamp,
            brightness,
            laplacian_var,
            entropy,
            subtitle_penalty,
            face_area,
            score,
        }
    }
}

/// Weighted composite of the normalized sub-metrics.
///
/// Brightness passes through a curve peaking at mid-gray; sharpness is the
/// Laplacian variance over [`LAPLACIAN_NORM`] clamped to 1 (monotonic below
/// the clamp); the face term is the largest face's area fraction through
/// [`FACE_AREA_GAIN`].
pub fn composite_score(
    weights: &ScoreWeights,
    brightness: f64,
    laplacian_var: f64,
    entropy: f64,
    subtitle_penalty: f64,
    face_area: f64,
) -> f64 {
    let sharpness = (laplacian_var / LAPLACIAN_NORM).min(1.0);
    let brightness_curve = 1.0 - (2.0 * brightness - 1.0).powi(2);
    let face = (face_area * FACE_AREA_GAIN).min(1.0);

    weights.sharpness * sharpness
        + weights.entropy * entropy.clamp(0.0, 1.0)
        + weights.brightness * brightness_curve.clamp(0.0, 1.0)
        - weights.subtitle * subtitle_penalty.clamp(0.0, 1.0)
        + weights.face * face
}

/// A grayscale view of a frame (Rec.601 luma), with the metric kernels.
struct GrayPlane {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl GrayPlane {
    fn from_rgb(image: &RgbImage) -> Self {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let data = image
            .pixels()
            .map(|p| 0.299 * p.0[0] as f32 + 0.587 * p.0[1] as f32 + 0.114 * p.0[2] as f32)
            .collect();
        Self { width, height, data }
    }

    fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().map(|&v| v as f64).sum::<f64>() / self.data.len() as f64
    }

    /// Variance of the 4-neighbour Laplacian over interior pixels.
    fn laplacian_variance(&self) -> f64 {
        if self.width < 3 || self.height < 3 {
            return 0.0;
        }
        let mut sum = 0.0_f64;
        let mut sum_sq = 0.0_f64;
        let mut count = 0.0_f64;
        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                let lap = (4.0 * self.at(x, y)
                    - self.at(x - 1, y)
                    - self.at(x + 1, y)
                    - self.at(x, y - 1)
                    - self.at(x, y + 1)) as f64;
                sum += lap;
                sum_sq += lap * lap;
                count += 1.0;
            }
        }
        let mean = sum / count;
        (sum_sq / count - mean * mean).max(0.0)
    }

    /// Shannon entropy of the luma histogram, in bits.
    fn histogram_entropy(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mut hist = [0u64; LUMA_HIST_BINS];
        let bin_width = 256.0 / LUMA_HIST_BINS as f32;
        for &v in &self.data {
            let bin = ((v / bin_width) as usize).min(LUMA_HIST_BINS - 1);
            hist[bin] += 1;
        }
        let total = self.data.len() as f64;
        hist.iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / total;
                -p * p.log2()
            })
            .sum()
    }

    /// Fraction of edge pixels in the bottom caption band.
    fn caption_band_edge_density(&self) -> f64 {
        if self.width < 3 || self.height < 3 {
            return 0.0;
        }
        let band_top = ((self.height as f64 * (1.0 - SUBTITLE_BAND_FRAC)) as usize)
            .clamp(1, self.height - 2);
        let mut edges = 0u64;
        let mut total = 0u64;
        for y in band_top..self.height - 1 {
            for x in 1..self.width - 1 {
                let gx = self.at(x + 1, y) - self.at(x - 1, y);
                let gy = self.at(x, y + 1) - self.at(x, y - 1);
                if gx.abs() + gy.abs() > EDGE_THRESHOLD {
                    edges += 1;
                }
                total += 1;
            }
        }
        if total == 0 {
            return 0.0;
        }
        edges as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::NoopFaceDetector;
    use image::Rgb;

    fn frame_from(image: RgbImage) -> Frame {
        Frame {
            frame_index: 0,
            timestamp: 0.0,
            image,
        }
    }

    fn uniform(w: u32, h: u32, v: u8) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([v, v, v]))
    }

    fn checkerboard(w: u32, h: u32, lo: u8, hi: u8) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            let v = if (x + y) % 2 == 0 { hi } else { lo };
            Rgb([v, v, v])
        })
    }

    fn scorer() -> FrameScorer {
        FrameScorer::new(ScoreWeights::default(), Arc::new(NoopFaceDetector))
    }

    #[test]
    fn test_sharper_frame_scores_at_least_as_high() {
        let s = scorer();
        // Same geometry, same mean luma; only the edge contrast differs.
        let sharp = s.score(&frame_from(checkerboard(64, 64, 0, 255)));
        let soft = s.score(&frame_from(checkerboard(64, 64, 127, 129)));
        assert!(sharp.laplacian_var > soft.laplacian_var);
        assert!(sharp.score > soft.score);
    }

    #[test]
    fn test_mid_gray_beats_extremes() {
        let s = scorer();
        let mid = s.score(&frame_from(uniform(64, 64, 128)));
        let dark = s.score(&frame_from(uniform(64, 64, 0)));
        let bright = s.score(&frame_from(uniform(64, 64, 255)));
        assert!(mid.score >= dark.score);
        assert!(mid.score >= bright.score);
    }

    #[test]
    fn test_entropy_rewards_detail() {
        let s = scorer();
        let gradient = RgbImage::from_fn(256, 64, |x, _| {
            let v = x as u8;
            Rgb([v, v, v])
        });
        let flat = uniform(256, 64, 128);
        let detailed = s.score(&frame_from(gradient));
        let plain = s.score(&frame_from(flat));
        assert!(detailed.entropy > plain.entropy);
        assert!(plain.entropy.abs() < 1e-9);
    }

    #[test]
    fn test_caption_band_penalized() {
        let s = scorer();
        // Caption-like vertical stripes only in the bottom 18%
        let captioned = RgbImage::from_fn(100, 100, |x, y| {
            if y >= 85 {
                let v = if (x / 2) % 2 == 0 { 255 } else { 0 };
                Rgb([v, v, v])
            } else {
                Rgb([128, 128, 128])
            }
        });
        let clean = uniform(100, 100, 128);
        let with_captions = s.score(&frame_from(captioned));
        let without = s.score(&frame_from(clean));
        assert!(with_captions.subtitle_penalty > without.subtitle_penalty);
        assert!(without.subtitle_penalty.abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_frames_do_not_panic() {
        let s = scorer();
        let tiny = s.score(&frame_from(uniform(1, 1, 77)));
        assert!((tiny.laplacian_var).abs() < 1e-9);
        assert!((tiny.entropy).abs() < 1e-9);
        assert!((tiny.subtitle_penalty).abs() < 1e-9);
        assert!(tiny.score.is_finite());
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let s = scorer();
        let image = checkerboard(120, 90, 30, 200);
        let a = s.score(&frame_from(image.clone()));
        let b = s.score(&frame_from(image));
        assert_eq!(a, b);
    }

    #[test]
    fn test_composite_is_pure_function_of_fields() {
        let s = scorer();
        let rec = s.score(&frame_from(checkerboard(64, 64, 40, 210)));
        let recomputed = composite_score(
            &ScoreWeights::default(),
            rec.brightness,
            rec.laplacian_var,
            rec.entropy,
            rec.subtitle_penalty,
            rec.face_area,
        );
        assert!((rec.score - recomputed).abs() < 1e-12);
    }
}
