//! Common error types.

use thiserror::Error;

/// Main error type for the site rendering layer.
#[derive(Error, Debug)]
pub enum SiteError {
    /// A required field was empty or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A card or section was asked to render with nothing to show.
    #[error("Content required: {0}")]
    ContentRequired(String),

    /// The runtime refused to start playback. Never surfaced to the page.
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SiteResult<T> = Result<T, SiteError>;

impl SiteError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn content_required(msg: impl Into<String>) -> Self {
        Self::ContentRequired(msg.into())
    }

    pub fn playback_rejected(msg: impl Into<String>) -> Self {
        Self::PlaybackRejected(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether a containing component may drop the failed unit and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SiteError::InvalidInput(_) | SiteError::ContentRequired(_) | SiteError::PlaybackRejected(_)
        )
    }
}
