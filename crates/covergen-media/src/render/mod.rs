//! Style rendering for cover images.
//!
//! Each style has its own module behind a common entry point, mirroring
//! the per-style processor layout used across the codebase. Rendering is
//! pure CPU work over RGB8 buffers: cover-fit the source frame onto the
//! target canvas, plan the wrapped text block, composite the style
//! background, then blit the text.

pub mod draw;
pub mod layout;

mod glass;
mod gradient;
mod sticker;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::config::{LayoutConfig, TargetSize};
use crate::error::{CoverError, PipelineResult};
use crate::fonts::LoadedFonts;
use layout::BlockPlan;
use covergen_models::{CoverImage, CoverRequest, StyleKind};

/// Outline stroke width for cover text, in pixels.
const STROKE_PX: f32 = 2.0;
/// Panel padding around the text block, as a canvas-width fraction.
const PANEL_PAD_FRAC: f32 = 0.025;
/// Panel fill opacity.
const PANEL_ALPHA: f32 = 0.55;
/// Drop shadow blur radius.
const SHADOW_SIGMA: f32 = 3.0;
/// Drop shadow vertical offset.
const SHADOW_OFFSET_Y: f32 = 4.0;
/// Drop shadow opacity.
const SHADOW_ALPHA: f32 = 0.45;

/// Renders covers for one invocation's selected frame.
pub struct CoverRenderer<'a> {
    layout: &'a LayoutConfig,
    fonts: &'a LoadedFonts,
    jpeg_quality: u8,
}

impl<'a> CoverRenderer<'a> {
    /// Create a renderer over loaded fonts and layout configuration.
    pub fn new(layout: &'a LayoutConfig, fonts: &'a LoadedFonts, jpeg_quality: u8) -> Self {
        Self {
            layout,
            fonts,
            jpeg_quality,
        }
    }

    /// Render one cover at the target resolution.
    pub fn render(
        &self,
        frame: &RgbImage,
        request: &CoverRequest,
        target: TargetSize,
    ) -> PipelineResult<CoverImage> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(CoverError::render("empty source frame"));
        }

        let mut canvas = cover_fit(frame, target.width, target.height);
        match request.style.style {
            StyleKind::Glass => glass::render(&mut canvas, request, self.layout, self.fonts),
            StyleKind::Gradient => gradient::render(&mut canvas, request, self.layout, self.fonts),
            StyleKind::Sticker => sticker::render(&mut canvas, request, self.layout, self.fonts),
        }

        let data = encode_jpeg(&canvas, self.jpeg_quality)?;
        Ok(CoverImage {
            aspect_ratio: target.aspect,
            width: target.width,
            height: target.height,
            data,
        })
    }

    /// Plan the text block for a target without rendering; exposed so
    /// placement geometry can be asserted independently of pixels.
    pub fn plan_block(&self, request: &CoverRequest, target: TargetSize) -> BlockPlan {
        let mut plan = layout::plan_text_block(
            target.width,
            target.height,
            &request.title,
            request.subtitle.as_deref(),
            &request.style,
            self.layout,
            self.fonts,
        );
        match request.style.style {
            StyleKind::Sticker => plan.place_centered_lower(
                target.width,
                target.height,
                &request.style,
                sticker::TITLE_ANCHOR_FRAC,
            ),
            _ => plan.place_centered_top(target.width, target.height, &request.style),
        }
        plan
    }
}

/// Scale the source so the canvas is fully covered, then center-crop the
/// overflow axis. No letterboxing, no distortion.
pub fn cover_fit(src: &RgbImage, target_w: u32, target_h: u32) -> RgbImage {
    let (sw, sh) = (src.width() as f32, src.height() as f32);
    let scale = (target_w as f32 / sw).max(target_h as f32 / sh);
    let rw = ((sw * scale).round() as u32).max(target_w);
    let rh = ((sh * scale).round() as u32).max(target_h);

    let resized = imageops::resize(src, rw, rh, FilterType::Lanczos3);
    let x = (rw - target_w) / 2;
    let y = (rh - target_h) / 2;
    imageops::crop_imm(&resized, x, y, target_w, target_h).to_image()
}

fn encode_jpeg(img: &RgbImage, quality: u8) -> PipelineResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder
        .encode(img.as_raw(), img.width(), img.height(), image::ColorType::Rgb8)
        .map_err(|e| CoverError::render(format!("JPEG encoding failed: {e}")))?;
    Ok(buf)
}

/// Blit a planned block's text: white fill with a thin dark stroke, lines
/// centered within the block.
pub(crate) fn draw_block_text(
    canvas: &mut RgbImage,
    plan: &BlockPlan,
    fonts: &LoadedFonts,
    layout_cfg: &LayoutConfig,
) {
    let mut y = plan.y;
    let advance = plan.title.line_advance(layout_cfg.line_spacing);
    for line in &plan.title.lines {
        let lw = draw::measure_line(&fonts.title, plan.title.font_px, line);
        let lx = plan.x + (plan.width - lw) / 2.0;
        let baseline = y + draw::ascent(&fonts.title, plan.title.font_px);
        draw::draw_line_outlined(
            canvas,
            &fonts.title,
            plan.title.font_px,
            line,
            lx,
            baseline,
            draw::WHITE,
            draw::BLACK,
            STROKE_PX,
        );
        y += advance;
    }

    if let Some(sub) = &plan.subtitle {
        y += canvas.height() as f32 * layout::INTER_ROLE_GAP_FRAC;
        let advance = sub.line_advance(layout_cfg.line_spacing);
        for line in &sub.lines {
            let lw = draw::measure_line(&fonts.subtitle, sub.font_px, line);
            let lx = plan.x + (plan.width - lw) / 2.0;
            let baseline = y + draw::ascent(&fonts.subtitle, sub.font_px);
            draw::draw_line_outlined(
                canvas,
                &fonts.subtitle,
                sub.font_px,
                line,
                lx,
                baseline,
                draw::WHITE,
                draw::BLACK,
                STROKE_PX,
            );
            y += advance;
        }
    }
}

/// Composite the glass-style panel (shadow, rounded plate) behind a placed
/// block and draw its text. Shared by the glass and sticker styles.
pub(crate) fn panel_with_text(
    canvas: &mut RgbImage,
    plan: &BlockPlan,
    shadow: bool,
    fonts: &LoadedFonts,
    layout_cfg: &LayoutConfig,
) {
    let pad = canvas.width() as f32 * PANEL_PAD_FRAC;
    let px = plan.x - pad;
    let py = plan.y - pad;
    let pw = plan.width + 2.0 * pad;
    let ph = plan.height + 2.0 * pad;
    let radius = plan.title.font_px * 0.5;

    if shadow {
        draw::rounded_shadow(
            canvas,
            px,
            py + SHADOW_OFFSET_Y,
            pw,
            ph,
            radius,
            SHADOW_SIGMA,
            SHADOW_ALPHA,
        );
    }
    draw::fill_rounded_rect(canvas, px, py, pw, ph, radius, draw::BLACK, PANEL_ALPHA);
    draw_block_text(canvas, plan, fonts, layout_cfg);
}
