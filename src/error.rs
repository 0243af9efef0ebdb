//! Error types shared across the playlist library

/// Result type for playlist operations
pub type Result<T> = std::result::Result<T, PlaylistError>;

/// Error types for playlist, search and AI helper operations
#[derive(thiserror::Error, Debug)]
pub enum PlaylistError {
    #[error("Invalid video URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} API key is not configured")]
    MissingApiKey(&'static str),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("No results: {0}")]
    NoResults(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Video not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl PlaylistError {
    /// True for errors caused by what the user typed rather than by a backend
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PlaylistError::InvalidUrl(_) | PlaylistError::InvalidInput(_)
        )
    }
}
