//! Gradient style: a full-width horizontal color bar spanning the title
//! block's vertical extent.

use image::RgbImage;

use crate::config::LayoutConfig;
use crate::fonts::LoadedFonts;
use crate::render::draw;
use crate::render::layout::plan_text_block;
use covergen_models::CoverRequest;

/// Bar opacity over the frame.
const BAR_ALPHA: f32 = 0.8;

pub(super) fn render(
    canvas: &mut RgbImage,
    request: &CoverRequest,
    layout_cfg: &LayoutConfig,
    fonts: &LoadedFonts,
) {
    let (w, h) = (canvas.width(), canvas.height());
    let params = &request.style;

    let mut plan = plan_text_block(
        w,
        h,
        &request.title,
        request.subtitle.as_deref(),
        params,
        layout_cfg,
        fonts,
    );
    plan.place_centered_top(w, h, params);

    let pad = h as f32 * params.padding_pct;
    draw::fill_horizontal_gradient(
        canvas,
        plan.y - pad,
        plan.y + plan.height + pad,
        params.palette_start,
        params.palette_end,
        BAR_ALPHA,
    );

    super::draw_block_text(canvas, &plan, fonts, layout_cfg);
}
