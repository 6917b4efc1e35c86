//! Sticker style: a rounded pill badge in the top-left corner plus a
//! glass-like title panel anchored in the lower band.

use image::RgbImage;

use crate::config::LayoutConfig;
use crate::fonts::LoadedFonts;
use crate::render::draw;
use crate::render::layout::plan_text_block;
use covergen_models::CoverRequest;

/// Badge width as a canvas-width fraction.
const BADGE_WIDTH_FRAC: f32 = 0.32;
/// Badge height as a canvas-width fraction.
const BADGE_HEIGHT_FRAC: f32 = 0.13;
/// Badge fill opacity.
const BADGE_ALPHA: f32 = 0.92;
/// Initial badge text size as a fraction of badge height.
const BADGE_TEXT_SCALE: f32 = 0.52;
/// Vertical anchor of the title block.
pub(super) const TITLE_ANCHOR_FRAC: f32 = 0.64;

pub(super) fn render(
    canvas: &mut RgbImage,
    request: &CoverRequest,
    layout_cfg: &LayoutConfig,
    fonts: &LoadedFonts,
) {
    let (w, h) = (canvas.width(), canvas.height());
    let params = &request.style;

    // Badge, independent of the title block
    let bw = w as f32 * BADGE_WIDTH_FRAC;
    let bh = w as f32 * BADGE_HEIGHT_FRAC;
    let bx = w as f32 * params.safe_margin_pct;
    let by = h as f32 * params.safe_margin_pct;
    draw::fill_rounded_rect(canvas, bx, by, bw, bh, bh / 2.0, params.palette_start, BADGE_ALPHA);

    if let Some(text) = params.sticker_text.as_deref() {
        // Shrink until the text fits inside the pill
        let inner = bw - bh * 0.8;
        let mut px = bh * BADGE_TEXT_SCALE;
        while draw::measure_line(&fonts.sticker, px, text) > inner && px > 8.0 {
            px *= 0.9;
        }
        let tw = draw::measure_line(&fonts.sticker, px, text);
        let tx = bx + (bw - tw) / 2.0;
        let baseline = by + bh / 2.0 + px * 0.35;
        draw::draw_line(canvas, &fonts.sticker, px, text, tx, baseline, draw::WHITE, 1.0);
    }

    // Title panel in the lower band
    let mut plan = plan_text_block(
        w,
        h,
        &request.title,
        request.subtitle.as_deref(),
        params,
        layout_cfg,
        fonts,
    );
    plan.place_centered_lower(w, h, params, TITLE_ANCHOR_FRAC);

    super::panel_with_text(canvas, &plan, params.shadow, fonts, layout_cfg);
}
