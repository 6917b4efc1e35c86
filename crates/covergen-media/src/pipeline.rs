//! Pipeline façade: sampler → scorer → selector → renderer.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use rayon::prelude::*;
use tracing::info;

use crate::config::CoverConfig;
use crate::detect::{FaceDetect, NoopFaceDetector};
use crate::error::{CoverError, PipelineResult};
use crate::fonts::{load_fonts, FontResolver, SystemFontResolver};
use crate::render::CoverRenderer;
use crate::sampler::FrameSampler;
use crate::score::FrameScorer;
use crate::select::select_cover_frame;
use covergen_models::{CoverRequest, CoverResult, FrameScore};

/// Generates cover images for videos.
///
/// Configuration and capabilities are fixed at construction; one instance
/// can serve concurrent invocations because each call owns its decoder
/// subprocesses and frame buffers, and nothing here is mutated per
/// request.
pub struct CoverPipeline {
    config: CoverConfig,
    detector: Arc<dyn FaceDetect>,
    fonts: Arc<dyn FontResolver>,
}

impl CoverPipeline {
    /// Create a pipeline with the default (no-op) face detector and the
    /// system font resolver.
    pub fn new(config: CoverConfig) -> PipelineResult<Self> {
        config.validate().map_err(CoverError::invalid_request)?;
        Ok(Self {
            config,
            detector: Arc::new(NoopFaceDetector),
            fonts: Arc::new(SystemFontResolver),
        })
    }

    /// Inject a face-detection capability.
    pub fn with_face_detector(mut self, detector: Arc<dyn FaceDetect>) -> Self {
        self.detector = detector;
        self
    }

    /// Inject a font-resolution capability.
    pub fn with_font_resolver(mut self, resolver: Arc<dyn FontResolver>) -> Self {
        self.fonts = resolver;
        self
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &CoverConfig {
        &self.config
    }

    /// Run the full pipeline for one video.
    ///
    /// Deterministic for identical inputs, modulo any nondeterminism in
    /// the injected face detector. Hard failures propagate unmodified;
    /// the only soft fallbacks are the font chain and the absent face
    /// detector.
    pub async fn make_covers(
        &self,
        video_path: &Path,
        request: &CoverRequest,
    ) -> PipelineResult<CoverResult> {
        let started = Instant::now();
        validate_request(request)?;

        let sampler = FrameSampler::new(&self.config);
        let frames = sampler.sample(video_path).await?;
        if frames.is_empty() {
            return Err(CoverError::NoFrames);
        }

        let scorer = FrameScorer::new(self.config.weights.clone(), Arc::clone(&self.detector));
        let scores: Vec<FrameScore> = frames.par_iter().map(|f| scorer.score(f)).collect();

        let selected = select_cover_frame(&scores)?;
        let timestamp = frames[selected].timestamp;
        drop(frames);

        // Analysis frames are scoring-resolution; render from a full-res
        // decode of the winning timestamp.
        let full = sampler.extract_full(video_path, timestamp).await?;

        let fonts = load_fonts(
            request.style.title_font.as_deref(),
            request.style.subtitle_font.as_deref(),
            self.fonts.as_ref(),
        )?;
        let renderer = CoverRenderer::new(&self.config.layout, &fonts, self.config.jpeg_quality);
        let images = self
            .config
            .targets
            .iter()
            .map(|&target| renderer.render(&full, request, target))
            .collect::<PipelineResult<Vec<_>>>()?;

        counter!("covers_generated_total").increment(1);
        histogram!("cover_pipeline_duration_seconds").record(started.elapsed().as_secs_f64());
        info!(
            video = %video_path.display(),
            style = %request.style.style,
            selected_frame = selected,
            selected_timestamp = timestamp,
            samples = scores.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generated covers"
        );

        Ok(CoverResult {
            images,
            scores,
            selected_frame_index: selected,
        })
    }
}

fn validate_request(request: &CoverRequest) -> PipelineResult<()> {
    if request.title.trim().is_empty() {
        return Err(CoverError::invalid_request("title must not be empty"));
    }
    request.style.validate()?;
    Ok(())
}
