//! Video URL classification
//!
//! Maps a pasted link to the hosting platform and the platform-native video id.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{PlaylistError, Result};

/// Length of every YouTube video id
const YOUTUBE_ID_LEN: usize = 11;

/// Video hosting platforms the player knows how to embed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Vimeo,
    Dailymotion,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::Vimeo => "vimeo",
            Platform::Dailymotion => "dailymotion",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PlaylistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "youtube" => Ok(Platform::YouTube),
            "vimeo" => Ok(Platform::Vimeo),
            "dailymotion" => Ok(Platform::Dailymotion),
            "unknown" => Ok(Platform::Unknown),
            other => Err(PlaylistError::InvalidInput(format!(
                "unknown platform '{}'",
                other
            ))),
        }
    }
}

/// Result of classifying a URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedVideoUrl {
    pub id: Option<String>,
    pub platform: Platform,
}

impl ParsedVideoUrl {
    fn unknown() -> Self {
        Self {
            id: None,
            platform: Platform::Unknown,
        }
    }

    fn found(id: &str, platform: Platform) -> Self {
        Self {
            id: Some(id.to_string()),
            platform,
        }
    }

    /// Whether the URL resolved to a playable video
    pub fn is_supported(&self) -> bool {
        self.id.is_some() && self.platform != Platform::Unknown
    }
}

fn youtube_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^.*(youtu.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
            .expect("youtube pattern is valid")
    })
}

fn vimeo_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"vimeo\.com/(?:video/)?(\d+)").expect("vimeo pattern is valid"))
}

fn dailymotion_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^.+dailymotion.com/(video|hub)/([^_]+)[^#]*(#video=([^_&]+))?")
            .expect("dailymotion pattern is valid")
    })
}

/// Classify a video URL.
///
/// Platforms are tried in order YouTube, Vimeo, Dailymotion. A YouTube match
/// only counts when the captured id has the canonical 11 characters, so a
/// malformed YouTube link can still fall through to the other patterns.
pub fn parse_video_url(url: &str) -> ParsedVideoUrl {
    if url.is_empty() {
        return ParsedVideoUrl::unknown();
    }

    if let Some(id) = youtube_video_id(url) {
        debug!("Classified {} as youtube:{}", url, id);
        return ParsedVideoUrl::found(&id, Platform::YouTube);
    }

    if let Some(caps) = vimeo_regex().captures(url) {
        if let Some(id) = caps.get(1) {
            debug!("Classified {} as vimeo:{}", url, id.as_str());
            return ParsedVideoUrl::found(id.as_str(), Platform::Vimeo);
        }
    }

    if let Some(caps) = dailymotion_regex().captures(url) {
        // The #video= fragment wins over the path segment
        let id = caps
            .get(4)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .filter(|id| !id.is_empty());
        if let Some(id) = id {
            debug!("Classified {} as dailymotion:{}", url, id);
            return ParsedVideoUrl::found(id, Platform::Dailymotion);
        }
    }

    ParsedVideoUrl::unknown()
}

/// Extract a YouTube video id, if the URL is a YouTube link
pub fn youtube_video_id(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    youtube_regex()
        .captures(url)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
        .filter(|id| id.chars().count() == YOUTUBE_ID_LEN)
        .map(str::to_string)
}

/// Validate user input the way the add form does: it must be an absolute URL
/// and it must resolve to a supported platform.
pub fn validate_video_url(input: &str) -> Result<ParsedVideoUrl> {
    let input = input.trim();
    url::Url::parse(input)
        .map_err(|e| PlaylistError::InvalidUrl(format!("{} ({})", input, e)))?;

    let parsed = parse_video_url(input);
    if !parsed.is_supported() {
        return Err(PlaylistError::InvalidUrl(format!(
            "{} is not a YouTube, Vimeo, or Dailymotion video URL",
            input
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_parsed(url: &str, platform: Platform, id: &str) {
        let parsed = parse_video_url(url);
        assert_eq!(parsed.platform, platform, "platform for {}", url);
        assert_eq!(parsed.id.as_deref(), Some(id), "id for {}", url);
    }

    #[test]
    fn test_youtube_shapes() {
        assert_parsed("https://youtu.be/dQw4w9WgXcQ", Platform::YouTube, "dQw4w9WgXcQ");
        assert_parsed(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            Platform::YouTube,
            "dQw4w9WgXcQ",
        );
        assert_parsed(
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            Platform::YouTube,
            "dQw4w9WgXcQ",
        );
        assert_parsed(
            "https://www.youtube.com/embed/dQw4w9WgXcQ?start=10",
            Platform::YouTube,
            "dQw4w9WgXcQ",
        );
        assert_parsed("https://www.youtube.com/v/dQw4w9WgXcQ", Platform::YouTube, "dQw4w9WgXcQ");
        assert_parsed(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ#t=30",
            Platform::YouTube,
            "dQw4w9WgXcQ",
        );
    }

    #[test]
    fn test_youtube_wrong_length_is_rejected() {
        let parsed = parse_video_url("https://www.youtube.com/watch?v=short");
        assert_eq!(parsed.platform, Platform::Unknown);
        assert_eq!(parsed.id, None);
        assert_eq!(youtube_video_id("https://youtu.be/dQw4w9WgXcQxyz"), None);
    }

    #[test]
    fn test_vimeo_shapes() {
        assert_parsed("https://vimeo.com/76979871", Platform::Vimeo, "76979871");
        assert_parsed("https://vimeo.com/video/76979871", Platform::Vimeo, "76979871");
        assert_parsed("https://player.vimeo.com/video/76979871", Platform::Vimeo, "76979871");
    }

    #[test]
    fn test_dailymotion_shapes() {
        assert_parsed(
            "https://www.dailymotion.com/video/x7tgad0",
            Platform::Dailymotion,
            "x7tgad0",
        );
        assert_parsed(
            "https://www.dailymotion.com/video/x7tgad0_some-title",
            Platform::Dailymotion,
            "x7tgad0",
        );
        assert_parsed(
            "https://www.dailymotion.com/hub/x1a2b3_playlist#video=x9zz8y",
            Platform::Dailymotion,
            "x9zz8y",
        );
    }

    #[test]
    fn test_unsupported_urls() {
        for url in ["", "https://example.com/watch", "not a url", "https://vimeo.com/channels"] {
            assert_eq!(parse_video_url(url), ParsedVideoUrl::unknown(), "{}", url);
        }
    }

    #[test]
    fn test_validate_requires_absolute_url() {
        assert!(matches!(
            validate_video_url("youtu.be/dQw4w9WgXcQ"),
            Err(PlaylistError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_video_url("https://example.com/clip"),
            Err(PlaylistError::InvalidUrl(_))
        ));
        let parsed = validate_video_url("  https://vimeo.com/76979871 ").unwrap();
        assert_eq!(parsed.platform, Platform::Vimeo);
    }

    #[test]
    fn test_platform_round_trip_through_str() {
        assert_eq!("YouTube".parse::<Platform>().unwrap(), Platform::YouTube);
        assert_eq!(Platform::Dailymotion.to_string(), "dailymotion");
        assert!("myspace".parse::<Platform>().is_err());
        assert_eq!(serde_json::to_string(&Platform::YouTube).unwrap(), "\"youtube\"");
    }

    #[test]
    fn test_unrecognised_platform_deserializes_as_unknown() {
        let platform: Platform = serde_json::from_str("\"twitch\"").unwrap();
        assert_eq!(platform, Platform::Unknown);
    }
}
