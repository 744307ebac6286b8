//! # Error Types
//!
//! This module defines error types used throughout the bannerkit library.
//!
//! Only a few of these ever reach a caller of
//! [`TemplateComposer::render`](crate::template::TemplateComposer::render):
//! load failures are absorbed by the fallback renderer and composition
//! failures degrade to the original image URL.

use thiserror::Error;

/// Main error type for bannerkit operations
#[derive(Debug, Error)]
pub enum BannerError {
    /// Source bitmap could not be fetched or decoded
    #[error("Image load error: {0}")]
    ImageLoad(String),

    /// Source bitmap did not arrive before the load deadline
    #[error("Image load timed out after {0} ms")]
    Timeout(u64),

    /// Load was aborted through a cancel token
    #[error("Image load cancelled")]
    Cancelled,

    /// Unexpected failure while drawing onto the canvas
    #[error("Composition error: {0}")]
    Composition(String),

    /// Font file could not be read or parsed
    #[error("Font error: {0}")]
    Font(String),

    /// Malformed banner request (size, template, variant, headline)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// PNG export failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BannerError {
    /// True for the load-stage failures that the fallback renderer absorbs.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            BannerError::ImageLoad(_) | BannerError::Timeout(_) | BannerError::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_failures_are_classified() {
        assert!(BannerError::ImageLoad("404".into()).is_load_failure());
        assert!(BannerError::Timeout(100).is_load_failure());
        assert!(BannerError::Cancelled.is_load_failure());
        assert!(!BannerError::Composition("boom".into()).is_load_failure());
        assert!(!BannerError::InvalidRequest("size".into()).is_load_failure());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            BannerError::Timeout(250).to_string(),
            "Image load timed out after 250 ms"
        );
        assert_eq!(
            BannerError::ImageLoad("bad png".into()).to_string(),
            "Image load error: bad png"
        );
    }
}
