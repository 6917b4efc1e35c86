//! End-to-end rendering properties on synthetic frames.
//!
//! These tests exercise the full renderer without any video decoding, so
//! they run anywhere with a system font. Environments with no font at all
//! (the DependencyUnavailable case) skip the pixel assertions.

use covergen_media::config::{CoverConfig, LayoutConfig, TargetSize};
use covergen_media::fonts::{FontResolver, FontRole, LoadedFonts, SystemFontResolver};
use covergen_media::render::{cover_fit, CoverRenderer};
use covergen_models::{CoverRequest, StyleKind, StyleParameters};
use image::RgbImage;

fn try_load_fonts() -> Option<LoadedFonts> {
    let path = SystemFontResolver.resolve(FontRole::Title)?;
    let bytes = std::fs::read(path).ok()?;
    let mk = |b: Vec<u8>| ab_glyph::FontVec::try_from_vec(b).ok();
    Some(LoadedFonts {
        title: mk(bytes.clone())?,
        subtitle: mk(bytes.clone())?,
        sticker: mk(bytes)?,
    })
}

/// Deterministic synthetic source frame with visible structure.
fn source_frame() -> RgbImage {
    RgbImage::from_fn(1280, 720, |x, y| {
        let r = (x % 256) as u8;
        let g = (y % 256) as u8;
        let b = ((x / 7 + y / 3) % 256) as u8;
        image::Rgb([r, g, b])
    })
}

fn request_for(style: StyleKind) -> CoverRequest {
    let mut params = StyleParameters::new(style);
    if style == StyleKind::Sticker {
        params = params.with_sticker_text("Full Guide");
    }
    CoverRequest::new("Ten minute dinner nobody burns", params)
        .with_subtitle("three pans, zero stress")
}

/// Count pixels differing by more than a JPEG-artifact-sized threshold.
fn strong_pixel_diff_count(a: &RgbImage, b: &RgbImage) -> usize {
    a.pixels()
        .zip(b.pixels())
        .filter(|(pa, pb)| {
            pa.0.iter()
                .zip(pb.0.iter())
                .any(|(&ca, &cb)| (ca as i16 - cb as i16).abs() > 32)
        })
        .count()
}

fn jpeg_roundtrip(img: &RgbImage, quality: u8) -> RgbImage {
    let mut buf = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
    encoder
        .encode(img.as_raw(), img.width(), img.height(), image::ColorType::Rgb8)
        .unwrap();
    image::load_from_memory(&buf).unwrap().to_rgb8()
}

#[test]
fn test_output_geometry_is_exact() {
    let Some(fonts) = try_load_fonts() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let config = CoverConfig::default();
    let renderer = CoverRenderer::new(&config.layout, &fonts, config.jpeg_quality);
    let frame = source_frame();

    for style in StyleKind::ALL {
        for target in [TargetSize::PORTRAIT_9X16, TargetSize::PORTRAIT_3X4] {
            let cover = renderer.render(&frame, &request_for(*style), target).unwrap();
            assert_eq!((cover.width, cover.height), (target.width, target.height));
            // JPEG magic
            assert!(cover.data.len() > 1000);
            assert_eq!(&cover.data[..2], &[0xFF, 0xD8]);

            let decoded = image::load_from_memory(&cover.data).unwrap().to_rgb8();
            assert_eq!((decoded.width(), decoded.height()), (target.width, target.height));
        }
    }
}

#[test]
fn test_each_style_composites_a_visible_region() {
    let Some(fonts) = try_load_fonts() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let config = CoverConfig::default();
    let renderer = CoverRenderer::new(&config.layout, &fonts, config.jpeg_quality);
    let frame = source_frame();
    let target = TargetSize::PORTRAIT_9X16;
    let plain = jpeg_roundtrip(&cover_fit(&frame, target.width, target.height), config.jpeg_quality);

    let mut rendered = Vec::new();
    for style in StyleKind::ALL {
        let cover = renderer.render(&frame, &request_for(*style), target).unwrap();
        let decoded = image::load_from_memory(&cover.data).unwrap().to_rgb8();
        // The composited overlay must change a substantial region
        assert!(
            strong_pixel_diff_count(&plain, &decoded) > 10_000,
            "style {style} barely changed the frame"
        );
        rendered.push((style, cover.data));
    }

    // Styles are visually distinct from each other
    assert_ne!(rendered[0].1, rendered[1].1);
    assert_ne!(rendered[0].1, rendered[2].1);
    assert_ne!(rendered[1].1, rendered[2].1);
}

#[test]
fn test_rendering_is_deterministic() {
    let Some(fonts) = try_load_fonts() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let config = CoverConfig::default();
    let renderer = CoverRenderer::new(&config.layout, &fonts, config.jpeg_quality);
    let frame = source_frame();
    let request = request_for(StyleKind::Gradient);

    let a = renderer.render(&frame, &request, TargetSize::PORTRAIT_3X4).unwrap();
    let b = renderer.render(&frame, &request, TargetSize::PORTRAIT_3X4).unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn test_text_block_stays_inside_safe_margins() {
    let Some(fonts) = try_load_fonts() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let config = CoverConfig::default();
    let renderer = CoverRenderer::new(&config.layout, &fonts, config.jpeg_quality);

    for style in StyleKind::ALL {
        let request = request_for(*style);
        for target in [TargetSize::PORTRAIT_9X16, TargetSize::PORTRAIT_3X4] {
            let plan = renderer.plan_block(&request, target);
            assert!(
                plan.within_safe_margins(target.width, target.height, request.style.safe_margin_pct),
                "style {style} block {:?} escapes safe margins at {}x{}",
                (plan.x, plan.y, plan.width, plan.height),
                target.width,
                target.height
            );
        }
    }
}

#[test]
fn test_long_title_shrinks_to_fit() {
    let Some(fonts) = try_load_fonts() else {
        eprintln!("skipping: no system font available");
        return;
    };
    let layout = LayoutConfig::default();
    let config = CoverConfig::default();
    let renderer = CoverRenderer::new(&config.layout, &fonts, config.jpeg_quality);

    let params = StyleParameters::new(StyleKind::Glass);
    let request = CoverRequest::new(
        "an unreasonably long cover title that keeps going and going and going",
        params,
    );
    let target = TargetSize::PORTRAIT_9X16;
    let plan = renderer.plan_block(&request, target);

    // Shrunk below the initial scale but never below the floor
    let initial = target.height as f32 * layout.title_scale;
    assert!(plan.title.font_px < initial);
    assert!(plan.title.font_px >= layout.title_min_px);
    // No line exceeds the wrap limit, text is never dropped
    let rejoined: Vec<&str> = plan.title.lines.iter().map(String::as_str).collect();
    assert_eq!(
        rejoined.join(" "),
        "an unreasonably long cover title that keeps going and going and going"
    );
}
