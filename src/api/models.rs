//! API data models

use serde::{Deserialize, Serialize};

use crate::video::Video;

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Body of the add-video form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddVideoRequest {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAddRequest {
    pub videos: Vec<Video>,
}

/// Result of a single add; `added` is false for duplicates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddVideoResponse {
    pub added: bool,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAddResponse {
    pub added: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditModeRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectResponse {
    /// `"playing"` or `"toggled"`
    pub action: String,
    pub selected: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PlayerQuery {
    #[serde(default)]
    pub audio_only: bool,
}

/// Generated videos and how many of them were new to the playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPlaylistResponse {
    pub videos: Vec<Video>,
    pub added: usize,
}
