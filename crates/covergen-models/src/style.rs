//! Cover style and style-parameter definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Default safe margin (fraction of the canvas kept clear on every side).
pub const DEFAULT_SAFE_MARGIN_PCT: f32 = 0.055;
/// Default vertical padding band above/below the text block.
pub const DEFAULT_PADDING_PCT: f32 = 0.035;
/// Default gradient start color.
pub const DEFAULT_PALETTE_START: RgbColor = RgbColor::new(0xFF, 0x24, 0x42);
/// Default gradient end color.
pub const DEFAULT_PALETTE_END: RgbColor = RgbColor::new(0xFF, 0x7A, 0x45);

/// Available cover styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StyleKind {
    /// Semi-transparent rounded panel behind the title block
    Glass,
    /// Full-width gradient bar behind the title block
    Gradient,
    /// Corner badge plus a lower title panel
    Sticker,
}

impl StyleKind {
    /// All available styles.
    pub const ALL: &'static [StyleKind] = &[StyleKind::Glass, StyleKind::Gradient, StyleKind::Sticker];

    /// Returns the style name as used in filenames.
    pub fn as_filename_part(&self) -> &'static str {
        match self {
            StyleKind::Glass => "glass",
            StyleKind::Gradient => "gradient",
            StyleKind::Sticker => "sticker",
        }
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_filename_part())
    }
}

impl FromStr for StyleKind {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "glass" => Ok(StyleKind::Glass),
            "gradient" => Ok(StyleKind::Gradient),
            "sticker" => Ok(StyleKind::Sticker),
            _ => Err(StyleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown style: {0}")]
pub struct StyleParseError(pub String);

/// An 8-bit RGB color, parseable from `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    /// Create a new color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation toward `other` at `t` in [0, 1].
    pub fn lerp(&self, other: &RgbColor, t: f32) -> RgbColor {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            ((1.0 - t) * a as f32 + t * b as f32).round().clamp(0.0, 255.0) as u8
        };
        RgbColor::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for RgbColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_string()));
        }
        let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| ColorParseError(s.to_string()))?;
        let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| ColorParseError(s.to_string()))?;
        let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| ColorParseError(s.to_string()))?;
        Ok(RgbColor::new(r, g, b))
    }
}

#[derive(Debug, Error)]
#[error("Invalid color: {0}, expected '#RRGGBB'")]
pub struct ColorParseError(pub String);

/// Aspect ratio specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Standard portrait (9:16) cover.
    pub const PORTRAIT: AspectRatio = AspectRatio { width: 9, height: 16 };

    /// 3:4 cover.
    pub const THREE_FOUR: AspectRatio = AspectRatio { width: 3, height: 4 };

    /// Create a new aspect ratio.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the aspect ratio as a decimal.
    pub fn as_f64(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            return Err(AspectRatioParseError::InvalidFormat(s.to_string()));
        }

        let width = parts[0]
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(parts[0].to_string()))?;
        let height = parts[1]
            .parse()
            .map_err(|_| AspectRatioParseError::InvalidNumber(parts[1].to_string()))?;

        if width == 0 || height == 0 {
            return Err(AspectRatioParseError::ZeroValue);
        }

        Ok(AspectRatio { width, height })
    }
}

#[derive(Debug, Error)]
pub enum AspectRatioParseError {
    #[error("Invalid aspect ratio format: {0}, expected 'W:H'")]
    InvalidFormat(String),
    #[error("Invalid number in aspect ratio: {0}")]
    InvalidNumber(String),
    #[error("Aspect ratio cannot have zero values")]
    ZeroValue,
}

/// Fully-resolved style parameters for one cover request.
///
/// Callers either construct this directly or resolve it from a named preset
/// before invoking the pipeline; preset storage is not this crate's concern.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StyleParameters {
    /// Which style to render.
    pub style: StyleKind,

    /// Title font file; falls back to the resolver chain when absent or broken.
    #[serde(default)]
    pub title_font: Option<PathBuf>,

    /// Subtitle font file; falls back to the resolver chain when absent or broken.
    #[serde(default)]
    pub subtitle_font: Option<PathBuf>,

    /// Safe margin as a fraction of the canvas on every side (default: 0.055)
    #[serde(default = "default_safe_margin_pct")]
    pub safe_margin_pct: f32,

    /// Vertical padding band above/below the text block (default: 0.035)
    #[serde(default = "default_padding_pct")]
    pub padding_pct: f32,

    /// Gradient start color / badge fill (default: #FF2442)
    #[serde(default = "default_palette_start")]
    pub palette_start: RgbColor,

    /// Gradient end color (default: #FF7A45)
    #[serde(default = "default_palette_end")]
    pub palette_end: RgbColor,

    /// Render a soft drop shadow under the panel (default: true)
    #[serde(default = "default_shadow")]
    pub shadow: bool,

    /// Badge text; required for the sticker style.
    #[serde(default)]
    pub sticker_text: Option<String>,
}

fn default_safe_margin_pct() -> f32 {
    DEFAULT_SAFE_MARGIN_PCT
}
fn default_padding_pct() -> f32 {
    DEFAULT_PADDING_PCT
}
fn default_palette_start() -> RgbColor {
    DEFAULT_PALETTE_START
}
fn default_palette_end() -> RgbColor {
    DEFAULT_PALETTE_END
}
fn default_shadow() -> bool {
    true
}

impl StyleParameters {
    /// Create parameters for a style with all defaults.
    pub fn new(style: StyleKind) -> Self {
        Self {
            style,
            title_font: None,
            subtitle_font: None,
            safe_margin_pct: DEFAULT_SAFE_MARGIN_PCT,
            padding_pct: DEFAULT_PADDING_PCT,
            palette_start: DEFAULT_PALETTE_START,
            palette_end: DEFAULT_PALETTE_END,
            shadow: true,
            sticker_text: None,
        }
    }

    /// Set the badge text.
    pub fn with_sticker_text(mut self, text: impl Into<String>) -> Self {
        self.sticker_text = Some(text.into());
        self
    }

    /// Set the gradient palette.
    pub fn with_palette(mut self, start: RgbColor, end: RgbColor) -> Self {
        self.palette_start = start;
        self.palette_end = end;
        self
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<(), StyleValidationError> {
        if !(0.0..=0.2).contains(&self.safe_margin_pct) {
            return Err(StyleValidationError::SafeMarginOutOfRange(self.safe_margin_pct));
        }
        if !(0.0..=0.1).contains(&self.padding_pct) {
            return Err(StyleValidationError::PaddingOutOfRange(self.padding_pct));
        }
        if self.style == StyleKind::Sticker
            && self.sticker_text.as_deref().map_or(true, |t| t.trim().is_empty())
        {
            return Err(StyleValidationError::MissingStickerText);
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum StyleValidationError {
    #[error("safe_margin_pct out of range [0, 0.2]: {0}")]
    SafeMarginOutOfRange(f32),
    #[error("padding_pct out of range [0, 0.1]: {0}")]
    PaddingOutOfRange(f32),
    #[error("sticker style requires non-empty sticker_text")]
    MissingStickerText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parse() {
        assert_eq!("glass".parse::<StyleKind>().unwrap(), StyleKind::Glass);
        assert_eq!("GRADIENT".parse::<StyleKind>().unwrap(), StyleKind::Gradient);
        assert_eq!("sticker".parse::<StyleKind>().unwrap(), StyleKind::Sticker);
        assert!("neon".parse::<StyleKind>().is_err());
    }

    #[test]
    fn test_style_display() {
        assert_eq!(StyleKind::Gradient.to_string(), "gradient");
    }

    #[test]
    fn test_color_parse() {
        assert_eq!("#FF2442".parse::<RgbColor>().unwrap(), RgbColor::new(0xFF, 0x24, 0x42));
        assert_eq!("ff7a45".parse::<RgbColor>().unwrap(), RgbColor::new(0xFF, 0x7A, 0x45));
        assert!("#F24".parse::<RgbColor>().is_err());
        assert!("#GGGGGG".parse::<RgbColor>().is_err());
    }

    #[test]
    fn test_color_display_roundtrip() {
        let c = RgbColor::new(1, 2, 3);
        assert_eq!(c.to_string().parse::<RgbColor>().unwrap(), c);
    }

    #[test]
    fn test_color_lerp_endpoints() {
        let a = RgbColor::new(0, 0, 0);
        let b = RgbColor::new(255, 255, 255);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), RgbColor::new(128, 128, 128));
    }

    #[test]
    fn test_aspect_ratio_parse() {
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::PORTRAIT);
        assert_eq!("3:4".parse::<AspectRatio>().unwrap(), AspectRatio::THREE_FOUR);
        assert!("invalid".parse::<AspectRatio>().is_err());
        assert!("0:16".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_params_defaults_valid() {
        let params = StyleParameters::new(StyleKind::Glass);
        assert!(params.validate().is_ok());
        assert!(params.shadow);
        assert_eq!(params.palette_start, DEFAULT_PALETTE_START);
    }

    #[test]
    fn test_sticker_requires_text() {
        let params = StyleParameters::new(StyleKind::Sticker);
        assert!(matches!(
            params.validate(),
            Err(StyleValidationError::MissingStickerText)
        ));
        let params = params.with_sticker_text("step by step");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_range_checks() {
        let mut params = StyleParameters::new(StyleKind::Glass);
        params.safe_margin_pct = 0.5;
        assert!(params.validate().is_err());
        params.safe_margin_pct = 0.055;
        params.padding_pct = 0.3;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_params_serde_defaults() {
        let params: StyleParameters = serde_json::from_str(r#"{"style":"glass"}"#).unwrap();
        assert_eq!(params.style, StyleKind::Glass);
        assert!((params.safe_margin_pct - DEFAULT_SAFE_MARGIN_PCT).abs() < 1e-6);
        assert_eq!(params.palette_end, DEFAULT_PALETTE_END);
        assert!(params.sticker_text.is_none());
    }
}
