//! Font resolution and loading.
//!
//! The pipeline never aborts on a missing or broken configured font: it
//! warns and walks a resolution chain (explicit path, injected resolver,
//! bundled system-path candidates). Only an environment with no loadable
//! font at all is an error, and a deployment-class one.

use ab_glyph::FontVec;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{CoverError, PipelineResult};

/// Which text element a font is being resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Title,
    Subtitle,
    Sticker,
}

/// Font resolution capability: maps a role to a font file.
pub trait FontResolver: Send + Sync {
    /// Return a font path for the role, or None to defer to the fallback
    /// chain.
    fn resolve(&self, role: FontRole) -> Option<PathBuf>;

    /// Resolver name for logging.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Common system font locations probed by the default resolver.
const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/Library/Fonts/Arial.ttf",
];

/// Default resolver: probes well-known system font paths.
pub struct SystemFontResolver;

impl FontResolver for SystemFontResolver {
    fn resolve(&self, _role: FontRole) -> Option<PathBuf> {
        FALLBACK_FONT_PATHS
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
            .map(Path::to_path_buf)
    }

    fn name(&self) -> &'static str {
        "system"
    }
}

/// Fonts loaded for one render invocation.
pub struct LoadedFonts {
    pub title: FontVec,
    pub subtitle: FontVec,
    pub sticker: FontVec,
}

/// Load fonts for every role, applying the fallback policy.
///
/// A configured path that is missing or unparseable logs a warning and
/// falls through to the resolver, then to the bundled candidate list; if
/// nothing in the chain loads, returns `DependencyUnavailable`.
pub fn load_fonts(
    title_font: Option<&Path>,
    subtitle_font: Option<&Path>,
    resolver: &dyn FontResolver,
) -> PipelineResult<LoadedFonts> {
    Ok(LoadedFonts {
        title: load_role(FontRole::Title, title_font, resolver)?,
        subtitle: load_role(FontRole::Subtitle, subtitle_font.or(title_font), resolver)?,
        sticker: load_role(FontRole::Sticker, title_font, resolver)?,
    })
}

fn load_role(
    role: FontRole,
    configured: Option<&Path>,
    resolver: &dyn FontResolver,
) -> PipelineResult<FontVec> {
    if let Some(path) = configured {
        match try_load(path) {
            Some(font) => return Ok(font),
            None => warn!(
                role = ?role,
                path = %path.display(),
                "Configured font missing or unreadable, falling back to default"
            ),
        }
    }

    if let Some(path) = resolver.resolve(role) {
        if let Some(font) = try_load(&path) {
            debug!(role = ?role, path = %path.display(), resolver = resolver.name(), "Resolved font");
            return Ok(font);
        }
        warn!(
            role = ?role,
            path = %path.display(),
            "Resolver font unreadable, probing bundled candidates"
        );
    }

    for candidate in FALLBACK_FONT_PATHS {
        if let Some(font) = try_load(Path::new(candidate)) {
            debug!(role = ?role, path = candidate, "Using bundled fallback font");
            return Ok(font);
        }
    }

    Err(CoverError::dependency_unavailable(
        "no usable font found for cover rendering",
    ))
}

fn try_load(path: &Path) -> Option<FontVec> {
    let bytes = std::fs::read(path).ok()?;
    FontVec::try_from_vec(bytes).ok()
}
