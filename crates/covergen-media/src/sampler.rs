//! Candidate-frame sampling.
//!
//! Frames are sampled evenly across the video's *duration* (by time, not by
//! frame count, so variable frame rates don't skew the spread) and decoded
//! one at a time through a seeked single-frame ffmpeg invocation. Each
//! subprocess is awaited to completion inside the call and killed if the
//! surrounding future is dropped, so no decoder resource outlives an
//! invocation.

use image::RgbImage;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::CoverConfig;
use crate::error::{CoverError, PipelineResult};
use crate::probe::{probe_video, VideoInfo};

/// One sampled frame: an owned RGB buffer plus its position metadata.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Ordinal position in the sampled sequence.
    pub frame_index: usize,
    /// Source timestamp in seconds.
    pub timestamp: f64,
    /// Decoded RGB8 pixels.
    pub image: RgbImage,
}

/// Samples candidate frames from a video.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    sample_count: usize,
    min_sample_spacing: f64,
    analysis_width: u32,
}

impl FrameSampler {
    /// Create a sampler from pipeline configuration.
    pub fn new(config: &CoverConfig) -> Self {
        Self {
            sample_count: config.sample_count,
            min_sample_spacing: config.min_sample_spacing,
            analysis_width: config.analysis_width,
        }
    }

    /// Sample up to `sample_count` analysis-resolution frames.
    ///
    /// Frames that fail to decode (e.g. a timestamp landing past the last
    /// keyframe) are skipped; at least one decoded frame is required.
    pub async fn sample(&self, video_path: &Path) -> PipelineResult<Vec<Frame>> {
        check_ffmpeg()?;
        let info = probe_video(video_path).await?;

        let timestamps = sample_timestamps(info.duration, self.sample_count, self.min_sample_spacing);
        let (width, height) = analysis_dimensions(info.width, info.height, self.analysis_width);

        debug!(
            video = %video_path.display(),
            duration = info.duration,
            samples = timestamps.len(),
            analysis = format!("{}x{}", width, height),
            "Sampling candidate frames"
        );

        let mut frames = Vec::with_capacity(timestamps.len());
        for &timestamp in &timestamps {
            match extract_frame(video_path, timestamp, width, height).await {
                Ok(image) => frames.push(Frame {
                    frame_index: frames.len(),
                    timestamp,
                    image,
                }),
                Err(e) => {
                    warn!(timestamp, error = %e, "Skipping undecodable sample point");
                }
            }
        }

        if frames.is_empty() {
            return Err(CoverError::decode("no frames decoded from video"));
        }

        Ok(frames)
    }

    /// Re-decode the frame at `timestamp` at the source's full resolution
    /// for rendering.
    pub async fn extract_full(&self, video_path: &Path, timestamp: f64) -> PipelineResult<RgbImage> {
        check_ffmpeg()?;
        let info = probe_video(video_path).await?;
        extract_frame(video_path, timestamp, info.width, info.height).await
    }

    /// Probe the video without sampling.
    pub async fn probe(&self, video_path: &Path) -> PipelineResult<VideoInfo> {
        probe_video(video_path).await
    }
}

/// Check that ffmpeg is available.
pub fn check_ffmpeg() -> PipelineResult<()> {
    which::which("ffmpeg")
        .map(|_| ())
        .map_err(|_| CoverError::dependency_unavailable("ffmpeg not found in PATH"))
}

/// Evenly spaced sample timestamps across `duration` seconds.
///
/// Midpoint placement avoids the black leader at t=0 and EOF seeks at the
/// tail. Durations shorter than the sampling grid yield fewer points
/// (bounded by `min_spacing`), never fabricated ones.
pub fn sample_timestamps(duration: f64, count: usize, min_spacing: f64) -> Vec<f64> {
    if duration <= 0.0 || count == 0 {
        return vec![0.0];
    }
    let fit = (duration / min_spacing).floor() as usize;
    let n = count.min(fit.max(1));
    (0..n).map(|i| (i as f64 + 0.5) * duration / n as f64).collect()
}

/// Scale source dimensions down to the analysis width, preserving aspect.
fn analysis_dimensions(src_w: u32, src_h: u32, analysis_width: u32) -> (u32, u32) {
    if src_w <= analysis_width {
        return (even(src_w), even(src_h));
    }
    let w = analysis_width;
    let h = ((src_h as f64 * w as f64 / src_w as f64).round() as u32).max(2);
    (even(w), even(h))
}

fn even(v: u32) -> u32 {
    (v.max(2)) & !1
}

/// Decode a single RGB frame at `timestamp`, scaled to exactly
/// `width` x `height`.
async fn extract_frame(
    video_path: &Path,
    timestamp: f64,
    width: u32,
    height: u32,
) -> PipelineResult<RgbImage> {
    let args = rawframe_args(video_path, timestamp, width, height);

    let output = Command::new("ffmpeg")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        return Err(CoverError::decode(format!(
            "ffmpeg frame extraction failed at {:.3}s: {}",
            timestamp,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let expected = width as usize * height as usize * 3;
    if output.stdout.len() != expected {
        return Err(CoverError::decode(format!(
            "short frame read at {:.3}s: got {} bytes, expected {}",
            timestamp,
            output.stdout.len(),
            expected
        )));
    }

    RgbImage::from_raw(width, height, output.stdout)
        .ok_or_else(|| CoverError::decode("frame buffer size mismatch"))
}

/// Build the argument list for a seeked single-frame rawvideo decode.
fn rawframe_args(video_path: &Path, timestamp: f64, width: u32, height: u32) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-ss".to_string(),
        format!("{:.3}", timestamp),
        "-i".to_string(),
        video_path.to_string_lossy().to_string(),
        "-frames:v".to_string(),
        "1".to_string(),
        "-vf".to_string(),
        format!("scale={}:{}", width, height),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "pipe:1".to_string(),
    ]
}
