//! Text wrapping and block planning.
//!
//! Wrapping is a character-count policy (not pixel measurement): lines
//! break greedily at the nearest word boundary within the per-role limit,
//! and a single token longer than the limit hard-breaks. Planning then
//! measures the wrapped lines with the real fonts and shrinks the font
//! size in fixed steps until the block fits its safe region, down to a
//! floor — text is never truncated.

use ab_glyph::FontVec;

use crate::config::LayoutConfig;
use crate::fonts::LoadedFonts;
use crate::render::draw;
use covergen_models::StyleParameters;

/// Vertical gap between the title and subtitle, as a canvas-height fraction.
pub(crate) const INTER_ROLE_GAP_FRAC: f32 = 0.012;

/// Greedily wrap `text` to at most `limit` characters per line.
///
/// Breaks at word boundaries where possible; a token longer than the limit
/// is hard-broken at the limit. Character counting is by `char`, so CJK
/// text wraps by glyph count.
pub fn wrap_text(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for token in text.split_whitespace() {
        let token_len = token.chars().count();

        if token_len > limit {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = token.chars().collect();
            let mut start = 0;
            while chars.len() - start > limit {
                lines.push(chars[start..start + limit].iter().collect());
                start += limit;
            }
            current = chars[start..].iter().collect();
            current_len = chars.len() - start;
            continue;
        }

        let needed = if current.is_empty() {
            token_len
        } else {
            current_len + 1 + token_len
        };
        if needed <= limit {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(token);
            current_len = needed;
        } else {
            lines.push(std::mem::take(&mut current));
            current = token.to_string();
            current_len = token_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrapped lines for one text role at a settled font size.
#[derive(Debug, Clone)]
pub struct RolePlan {
    pub lines: Vec<String>,
    pub font_px: f32,
}

impl RolePlan {
    /// Vertical advance per line.
    pub fn line_advance(&self, spacing: f32) -> f32 {
        self.font_px * spacing
    }

    /// Total height of the role's lines.
    pub fn height(&self, spacing: f32) -> f32 {
        self.lines.len() as f32 * self.line_advance(spacing)
    }

    fn max_width(&self, font: &FontVec) -> f32 {
        self.lines
            .iter()
            .map(|l| draw::measure_line(font, self.font_px, l))
            .fold(0.0, f32::max)
    }
}

/// A fully planned text block, positioned on the canvas after one of the
/// `place_*` calls.
#[derive(Debug, Clone)]
pub struct BlockPlan {
    pub title: RolePlan,
    pub subtitle: Option<RolePlan>,
    /// Widest measured line.
    pub width: f32,
    /// Total block height including the inter-role gap.
    pub height: f32,
    /// Top-left corner on the canvas.
    pub x: f32,
    pub y: f32,
}

impl BlockPlan {
    /// Center horizontally and anchor below the top safe margin plus the
    /// padding band.
    pub fn place_centered_top(&mut self, canvas_w: u32, canvas_h: u32, params: &StyleParameters) {
        self.x = (canvas_w as f32 - self.width) / 2.0;
        self.y = canvas_h as f32 * (params.safe_margin_pct + params.padding_pct);
    }

    /// Center horizontally and anchor at `anchor_frac` of the canvas
    /// height, clamped so the block plus padding stays above the bottom
    /// safe margin.
    pub fn place_centered_lower(
        &mut self,
        canvas_w: u32,
        canvas_h: u32,
        params: &StyleParameters,
        anchor_frac: f32,
    ) {
        let h = canvas_h as f32;
        let pad = h * params.padding_pct;
        let lowest = h * (1.0 - params.safe_margin_pct) - pad - self.height;
        self.x = (canvas_w as f32 - self.width) / 2.0;
        self.y = (h * anchor_frac).min(lowest).max(h * params.safe_margin_pct);
    }

    /// Whether the placed block lies fully inside the safe margins.
    pub fn within_safe_margins(&self, canvas_w: u32, canvas_h: u32, margin_pct: f32) -> bool {
        let (w, h) = (canvas_w as f32, canvas_h as f32);
        self.x >= w * margin_pct
            && self.y >= h * margin_pct
            && self.x + self.width <= w * (1.0 - margin_pct)
            && self.y + self.height <= h * (1.0 - margin_pct)
    }
}

/// Wrap and size the title/subtitle block for a canvas.
///
/// Font sizes start at their configured canvas-height fractions and shrink
/// by `shrink_step` until both the measured width fits the safe width and
/// the block height fits its vertical band, or the floors are reached.
pub fn plan_text_block(
    canvas_w: u32,
    canvas_h: u32,
    title: &str,
    subtitle: Option<&str>,
    params: &StyleParameters,
    layout: &LayoutConfig,
    fonts: &LoadedFonts,
) -> BlockPlan {
    let h = canvas_h as f32;
    let safe_w = canvas_w as f32 * (1.0 - 2.0 * params.safe_margin_pct);
    let band_h = h * layout.max_block_pct;
    let gap = h * INTER_ROLE_GAP_FRAC;

    let title_lines = wrap_text(title, layout.title_wrap_chars);
    let subtitle_lines = subtitle
        .map(|s| wrap_text(s, layout.subtitle_wrap_chars))
        .filter(|l| !l.is_empty());

    let mut title_px = h * layout.title_scale;
    let mut subtitle_px = h * layout.subtitle_scale;

    loop {
        let title_plan = RolePlan {
            lines: title_lines.clone(),
            font_px: title_px,
        };
        let subtitle_plan = subtitle_lines.as_ref().map(|lines| RolePlan {
            lines: lines.clone(),
            font_px: subtitle_px,
        });

        let mut width = title_plan.max_width(&fonts.title);
        let mut height = title_plan.height(layout.line_spacing);
        if let Some(sub) = &subtitle_plan {
            width = width.max(sub.max_width(&fonts.subtitle));
            height += gap + sub.height(layout.line_spacing);
        }

        let fits = width <= safe_w && height <= band_h;
        let at_floor = title_px <= layout.title_min_px && subtitle_px <= layout.subtitle_min_px;
        if fits || at_floor {
            return BlockPlan {
                title: title_plan,
                subtitle: subtitle_plan,
                width,
                height,
                x: 0.0,
                y: 0.0,
            };
        }

        title_px = (title_px * layout.shrink_step).max(layout.title_min_px);
        subtitle_px = (subtitle_px * layout.shrink_step).max(layout.subtitle_min_px);
    }
}
