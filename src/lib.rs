//! StreamVerse - personal video playlist
//!
//! Collects YouTube, Vimeo and Dailymotion videos into a persisted playlist,
//! renders an embedded player for the current entry, and offers AI helpers
//! for music suggestions, compliance tips, summaries and prompt-generated
//! playlists.

pub mod config;
pub mod error;
pub mod flows;
pub mod llm;
pub mod player;
pub mod playlist;
pub mod search;
pub mod storage;
pub mod url_parser;
pub mod video;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::config::Config;
pub use crate::error::{PlaylistError, Result};
pub use crate::flows::AiAssistant;
pub use crate::llm::{LLMConfig, LLMProvider};
pub use crate::player::PlayerView;
pub use crate::playlist::{AddOutcome, PlaylistSnapshot, PlaylistStore, SelectOutcome};
pub use crate::search::{SearchResult, SearchTool, VideoSearchClient};
pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};
pub use crate::url_parser::{parse_video_url, ParsedVideoUrl, Platform};
pub use crate::video::Video;
