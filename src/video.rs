use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlaylistError, Result};
use crate::url_parser::{validate_video_url, Platform};

/// Minimum title length accepted from the add form
pub const MIN_TITLE_LEN: usize = 3;

/// A single playlist entry
///
/// Field names are serialized in camelCase so the persisted array keeps the
/// `{id, videoId, platform, title, description, tags}` layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Locally generated unique token
    pub id: String,
    /// Platform-native video id
    pub video_id: String,
    pub platform: Platform,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Comma-joined tag list
    #[serde(default)]
    pub tags: String,
}

impl Video {
    /// Create a video with a freshly generated id
    pub fn new(
        video_id: impl Into<String>,
        platform: Platform,
        title: impl Into<String>,
        description: impl Into<String>,
        tags: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            video_id: video_id.into(),
            platform,
            title: title.into(),
            description: description.into(),
            tags: tags.into(),
        }
    }

    /// Build a video from a pasted URL plus form fields.
    ///
    /// The URL must resolve to a supported platform and the title must have
    /// at least [`MIN_TITLE_LEN`] characters.
    pub fn from_url(
        url: &str,
        title: &str,
        description: Option<&str>,
        tags: Option<&str>,
    ) -> Result<Self> {
        let parsed = validate_video_url(url)?;
        if title.chars().count() < MIN_TITLE_LEN {
            return Err(PlaylistError::InvalidInput(format!(
                "Title must be at least {} characters.",
                MIN_TITLE_LEN
            )));
        }

        let video_id = parsed
            .id
            .ok_or_else(|| PlaylistError::InvalidUrl(url.to_string()))?;

        Ok(Self::new(
            video_id,
            parsed.platform,
            title,
            description.unwrap_or_default(),
            tags.unwrap_or_default(),
        ))
    }

    /// Tags split on commas, trimmed, empties dropped
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Identity used for duplicate detection
    pub fn dedupe_key(&self) -> (Platform, &str) {
        (self.platform, self.video_id.as_str())
    }

    pub fn is_same_media(&self, other: &Video) -> bool {
        self.dedupe_key() == other.dedupe_key()
    }
}

/// Join a tag list the way search results and the add form store them
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Starter videos offered while the playlist is empty
pub fn suggested_videos() -> Vec<Video> {
    let suggestion = |n: u32,
                      video_id: &str,
                      platform: Platform,
                      title: &str,
                      description: &str,
                      tags: &str| Video {
        id: format!("suggestion-{}", n),
        video_id: video_id.to_string(),
        platform,
        title: title.to_string(),
        description: description.to_string(),
        tags: tags.to_string(),
    };

    vec![
        suggestion(
            1,
            "dQw4w9WgXcQ",
            Platform::YouTube,
            "Rick Astley - Never Gonna Give You Up",
            "The official video for \u{201c}Never Gonna Give You Up\u{201d} by Rick Astley.",
            "music, pop, 80s",
        ),
        suggestion(
            2,
            "m7Bc3p-d544",
            Platform::Vimeo,
            "The Mountain",
            "A stunning timelapse video of mountains.",
            "nature, timelapse, mountains",
        ),
        suggestion(
            3,
            "x6c_d_p4_sI",
            Platform::Dailymotion,
            "How to Make French Toast",
            "A quick and easy recipe for delicious French toast.",
            "cooking, recipe, breakfast",
        ),
        suggestion(
            4,
            "3tmd-ClpJxA",
            Platform::YouTube,
            "lofi hip hop radio - beats to relax/study to",
            "A 24/7 stream of chill lofi hip hop beats.",
            "lofi, hiphop, study, relax",
        ),
    ]
}
