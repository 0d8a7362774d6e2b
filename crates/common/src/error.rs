//! Error types shared across Slidecut crates.

/// Top-level error type for Slidecut operations.
#[derive(Debug, thiserror::Error)]
pub enum SlidecutError {
    #[error("Expected exactly {expected} images, got {actual}")]
    WrongImageCount { expected: usize, actual: usize },

    #[error("Transition plan contains no transitions")]
    EmptyTransitionPlan,

    #[error("Invalid timing: {message}")]
    InvalidTiming { message: String },

    #[error("Encoding failed ({status}): {diagnostics}")]
    EncodingFailed { status: String, diagnostics: String },

    #[error("Encoder timed out after {secs}s: {diagnostics}")]
    Timeout { secs: u64, diagnostics: String },

    #[error("Encoder binary not found: {binary}")]
    EncoderUnavailable { binary: String },

    #[error("Unknown template: {name}")]
    UnknownTemplate { name: String },

    #[error("Unknown transition: {name}")]
    UnknownTransition { name: String },

    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Image error: {message}")]
    Image { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SlidecutError.
pub type SlidecutResult<T> = Result<T, SlidecutError>;

impl SlidecutError {
    pub fn invalid_timing(msg: impl Into<String>) -> Self {
        Self::InvalidTiming {
            message: msg.into(),
        }
    }

    pub fn encoding_failed(status: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self::EncodingFailed {
            status: status.into(),
            diagnostics: diagnostics.into(),
        }
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image {
            message: msg.into(),
        }
    }

    /// Captured encoder output, when the failure came from the encoder.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::EncodingFailed { diagnostics, .. } | Self::Timeout { diagnostics, .. } => {
                Some(diagnostics)
            }
            _ => None,
        }
    }

    /// Whether re-running the same job could plausibly succeed.
    ///
    /// Always `false` for the render core: neither validation failures nor
    /// encoder failures are resolved by re-running unchanged inputs.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_image_count_message() {
        let err = SlidecutError::WrongImageCount {
            expected: 10,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Expected exactly 10 images, got 3");
        assert!(err.diagnostics().is_none());
    }

    #[test]
    fn test_encoding_failure_carries_diagnostics() {
        let err = SlidecutError::encoding_failed("exit status: 1", "No such file or directory");
        assert_eq!(err.diagnostics(), Some("No such file or directory"));
        assert!(!err.is_retryable());
    }
}
