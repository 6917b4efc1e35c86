//! Error types for the cover pipeline.

use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, CoverError>;

/// Errors that can occur while generating covers.
#[derive(Debug, Error)]
pub enum CoverError {
    /// The container/codec could not be opened or no frames decoded.
    #[error("Failed to decode video: {message}")]
    Decode { message: String },

    /// The sampler produced an empty frame set.
    #[error("No frames sampled from video")]
    NoFrames,

    /// An unrecognized style name was supplied at the parse boundary.
    #[error("Unsupported style: {0}")]
    UnsupportedStyle(String),

    /// Drawing or encoding failed unexpectedly.
    #[error("Render failed: {0}")]
    Render(String),

    /// A runtime capability this feature needs is missing (deployment
    /// issue, not a data issue): ffmpeg/ffprobe not on PATH, or no
    /// loadable font anywhere in the resolution chain.
    #[error("Required capability unavailable: {what}")]
    DependencyUnavailable { what: String },

    /// The request itself is malformed (empty title, bad parameters).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl CoverError {
    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a render error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Create a dependency-unavailable error.
    pub fn dependency_unavailable(what: impl Into<String>) -> Self {
        Self::DependencyUnavailable { what: what.into() }
    }

    /// Create an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

impl From<covergen_models::StyleParseError> for CoverError {
    fn from(err: covergen_models::StyleParseError) -> Self {
        Self::UnsupportedStyle(err.0)
    }
}

impl From<covergen_models::StyleValidationError> for CoverError {
    fn from(err: covergen_models::StyleValidationError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_style_maps_to_unsupported() {
        let err: CoverError = "neon".parse::<covergen_models::StyleKind>().unwrap_err().into();
        assert!(matches!(err, CoverError::UnsupportedStyle(s) if s == "neon"));
    }

    #[test]
    fn test_display_messages() {
        let err = CoverError::dependency_unavailable("ffmpeg not found in PATH");
        assert!(err.to_string().contains("ffmpeg"));
        let err = CoverError::decode("moov atom missing");
        assert!(err.to_string().starts_with("Failed to decode video"));
    }
}
