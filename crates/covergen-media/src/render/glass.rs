//! Glass style: a semi-transparent rounded panel behind the title block,
//! anchored near the top of the canvas.

use image::RgbImage;

use crate::config::LayoutConfig;
use crate::fonts::LoadedFonts;
use crate::render::layout::plan_text_block;
use covergen_models::CoverRequest;

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

    super::panel_with_text(canvas, &plan, params.shadow, fonts, layout_cfg);
}
