//! CPU drawing primitives for cover compositing.
//!
//! Everything here operates directly on RGB8 buffers: alpha blending,
//! rounded-rectangle fills (inside test against the rounded-rect distance
//! field), horizontal gradients, blurred shadows, and glyph blitting via
//! `ab_glyph` coverage callbacks.

use ab_glyph::{point, Font, FontVec, Glyph, GlyphId, PxScale, ScaleFont};
use image::{imageops, GrayImage, Luma, RgbImage};

use covergen_models::RgbColor;

pub const BLACK: RgbColor = RgbColor::new(0, 0, 0);
pub const WHITE: RgbColor = RgbColor::new(255, 255, 255);

/// Blend `color` over one pixel at `alpha`; out-of-bounds is a no-op.
pub fn blend_px(img: &mut RgbImage, x: i32, y: i32, color: RgbColor, alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let a = alpha.clamp(0.0, 1.0);
    let p = img.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in p.0.iter_mut().zip([color.r, color.g, color.b]) {
        *dst = ((1.0 - a) * *dst as f32 + a * src as f32).round() as u8;
    }
}

/// Rounded-rectangle inside test in local coordinates.
pub fn inside_rounded_rect(lx: f32, ly: f32, w: f32, h: f32, radius: f32) -> bool {
    if lx < 0.0 || ly < 0.0 || lx > w || ly > h {
        return false;
    }
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    let cx = lx.clamp(r, w - r);
    let cy = ly.clamp(r, h - r);
    let dx = lx - cx;
    let dy = ly - cy;
    dx * dx + dy * dy <= r * r
}

/// Fill a rounded rectangle at (x, y) with the given size and corner radius.
pub fn fill_rounded_rect(
    img: &mut RgbImage,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    radius: f32,
    color: RgbColor,
    alpha: f32,
) {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let x1 = (x + w).ceil() as i32;
    let y1 = (y + h).ceil() as i32;
    for py in y0..y1 {
        for px in x0..x1 {
            let lx = px as f32 + 0.5 - x;
            let ly = py as f32 + 0.5 - y;
            if inside_rounded_rect(lx, ly, w, h, radius) {
                blend_px(img, px, py, color, alpha);
            }
        }
    }
}

/// Composite a soft shadow of a rounded rectangle: the rect shape is
/// rasterized into a mask, Gaussian-blurred, then blended as black.
pub fn rounded_shadow(
    img: &mut RgbImage,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    radius: f32,
    sigma: f32,
    alpha: f32,
) {
    let pad = (sigma * 3.0).ceil() as i32;
    let mw = w.ceil() as i32 + 2 * pad;
    let mh = h.ceil() as i32 + 2 * pad;
    if mw <= 0 || mh <= 0 {
        return;
    }

    let mut mask = GrayImage::new(mw as u32, mh as u32);
    for my in 0..mh {
        for mx in 0..mw {
            let lx = (mx - pad) as f32 + 0.5;
            let ly = (my - pad) as f32 + 0.5;
            if inside_rounded_rect(lx, ly, w, h, radius) {
                mask.put_pixel(mx as u32, my as u32, Luma([255]));
            }
        }
    }
    let blurred = imageops::blur(&mask, sigma);

    let ox = x.floor() as i32 - pad;
    let oy = y.floor() as i32 - pad;
    for my in 0..mh {
        for mx in 0..mw {
            let coverage = blurred.get_pixel(mx as u32, my as u32).0[0] as f32 / 255.0;
            blend_px(img, ox + mx, oy + my, BLACK, coverage * alpha);
        }
    }
}

/// Fill rows [y0, y1) with a left-to-right gradient between two colors.
pub fn fill_horizontal_gradient(
    img: &mut RgbImage,
    y0: f32,
    y1: f32,
    start: RgbColor,
    end: RgbColor,
    alpha: f32,
) {
    let w = img.width() as i32;
    let row0 = y0.floor().max(0.0) as i32;
    let row1 = (y1.ceil() as i32).min(img.height() as i32);
    let span = (w - 1).max(1) as f32;
    for x in 0..w {
        let color = start.lerp(&end, x as f32 / span);
        for y in row0..row1 {
            blend_px(img, x, y, color, alpha);
        }
    }
}

/// Advance width of a text line at the given pixel size.
pub fn measure_line(font: &FontVec, px: f32, text: &str) -> f32 {
    let scaled = font.as_scaled(PxScale::from(px));
    let mut width = 0.0_f32;
    let mut prev: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(p) = prev {
            width += scaled.kern(p, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    width
}

/// Ascent of the font at the given pixel size.
pub fn ascent(font: &FontVec, px: f32) -> f32 {
    font.as_scaled(PxScale::from(px)).ascent()
}

/// Draw one line of text with its origin at `origin_x` and the given
/// baseline.
pub fn draw_line(
    img: &mut RgbImage,
    font: &FontVec,
    px: f32,
    text: &str,
    origin_x: f32,
    baseline_y: f32,
    color: RgbColor,
    alpha: f32,
) {
    let scale = PxScale::from(px);
    let scaled = font.as_scaled(scale);
    let mut pen_x = origin_x;
    let mut prev: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(p) = prev {
            pen_x += scaled.kern(p, id);
        }
        let glyph: Glyph = id.with_scale_and_position(scale, point(pen_x, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                blend_px(
                    img,
                    bounds.min.x as i32 + gx as i32,
                    bounds.min.y as i32 + gy as i32,
                    color,
                    coverage * alpha,
                );
            });
        }
        pen_x += scaled.h_advance(id);
        prev = Some(id);
    }
}

/// Draw a line with a thin outline stroke under the fill.
pub fn draw_line_outlined(
    img: &mut RgbImage,
    font: &FontVec,
    px: f32,
    text: &str,
    origin_x: f32,
    baseline_y: f32,
    fill: RgbColor,
    stroke: RgbColor,
    stroke_px: f32,
) {
    let s = stroke_px.max(1.0);
    for (dx, dy) in [
        (-s, 0.0),
        (s, 0.0),
        (0.0, -s),
        (0.0, s),
        (-s, -s),
        (-s, s),
        (s, -s),
        (s, s),
    ] {
        draw_line(img, font, px, text, origin_x + dx, baseline_y + dy, stroke, 0.9);
    }
    draw_line(img, font, px, text, origin_x, baseline_y, fill, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_blend_px_bounds_and_alpha() {
        let mut img = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        blend_px(&mut img, -1, 0, WHITE, 1.0);
        blend_px(&mut img, 0, 10, WHITE, 1.0);
        blend_px(&mut img, 1, 1, WHITE, 1.0);
        blend_px(&mut img, 2, 2, WHITE, 0.5);
        assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(2, 2).0, [128, 128, 128]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_rounded_rect_inside_test() {
        // Corners of the bounding box are outside the rounded shape
        assert!(!inside_rounded_rect(0.5, 0.5, 100.0, 50.0, 20.0));
        // Center is inside
        assert!(inside_rounded_rect(50.0, 25.0, 100.0, 50.0, 20.0));
        // Edge midpoints are inside
        assert!(inside_rounded_rect(0.0, 25.0, 100.0, 50.0, 20.0));
        // Outside the bounds entirely
        assert!(!inside_rounded_rect(-1.0, 10.0, 100.0, 50.0, 20.0));
    }

    #[test]
    fn test_fill_rounded_rect_leaves_corners() {
        let mut img = RgbImage::from_pixel(40, 40, Rgb([0, 0, 0]));
        fill_rounded_rect(&mut img, 0.0, 0.0, 40.0, 40.0, 12.0, WHITE, 1.0);
        // Center filled, extreme corner untouched
        assert_eq!(img.get_pixel(20, 20).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_gradient_interpolates_left_to_right() {
        let mut img = RgbImage::from_pixel(100, 10, Rgb([0, 0, 0]));
        let start = RgbColor::new(255, 0, 0);
        let end = RgbColor::new(0, 0, 255);
        fill_horizontal_gradient(&mut img, 0.0, 10.0, start, end, 1.0);
        assert_eq!(img.get_pixel(0, 5).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(99, 5).0, [0, 0, 255]);
        // Middle is a mix of both endpoints
        let mid = img.get_pixel(50, 5).0;
        assert!(mid[0] > 0 && mid[0] < 255);
        assert!(mid[2] > 0 && mid[2] < 255);
    }
}
