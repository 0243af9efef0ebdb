//! YouTube Data API search glue

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::error::{PlaylistError, Result};
use crate::url_parser::Platform;
use crate::video::{join_tags, Video};

/// Shortest query the search box accepts
pub const MIN_QUERY_LEN: usize = 2;

/// Upper bound the search endpoint allows per page
pub const MAX_RESULTS_LIMIT: u32 = 50;

const GENERIC_FAILURE: &str = "Could not fetch videos from YouTube.";

/// One search hit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SearchResult {
    /// Turn the hit into a playlist entry with a fresh id
    pub fn into_video(self) -> Video {
        let tags = join_tags(&self.tags);
        Video::new(self.video_id, Platform::YouTube, self.title, self.description, tags)
    }
}

/// A video search backend, also exposed to the playlist generator as a tool
#[async_trait]
pub trait SearchTool: Send + Sync {
    async fn search_videos(&self, query: &str, max_results: u32) -> Result<Vec<SearchResult>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Option<Vec<SearchItem>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    thumbnails: Option<Thumbnails>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// Client for the `search` endpoint of the YouTube Data API
pub struct VideoSearchClient {
    config: SearchConfig,
    client: reqwest::Client,
}

impl VideoSearchClient {
    pub fn new(config: SearchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { config, client }
    }

    pub fn default_max_results(&self) -> u32 {
        self.config.max_results
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(PlaylistError::MissingApiKey("YouTube"))
    }

    fn build_url(&self, query: &str, api_key: &str, max_results: u32) -> Result<url::Url> {
        let endpoint = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let mut url = url::Url::parse(&endpoint).map_err(|e| {
            PlaylistError::SearchFailed(format!("bad search endpoint {}: {}", endpoint, e))
        })?;

        url.query_pairs_mut()
            .append_pair("part", "snippet")
            .append_pair("q", query)
            .append_pair("key", api_key)
            .append_pair("type", "video")
            .append_pair("maxResults", &max_results.to_string());
        Ok(url)
    }

    /// Search for videos matching `query`
    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Err(PlaylistError::InvalidInput(format!(
                "Search query must be at least {} characters.",
                MIN_QUERY_LEN
            )));
        }
        let api_key = self.api_key()?;
        let max_results = max_results.clamp(1, MAX_RESULTS_LIMIT);
        let url = self.build_url(query, api_key, max_results)?;

        debug!("Searching videos for '{}' (max {})", query, max_results);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        let parsed: SearchResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                return Err(PlaylistError::SearchFailed(format!("HTTP {}", status)));
            }
        };

        if let Some(err) = parsed.error {
            let message = err.message.unwrap_or_else(|| GENERIC_FAILURE.to_string());
            warn!("Video search rejected: {}", message);
            return Err(PlaylistError::SearchFailed(message));
        }
        if !status.is_success() {
            return Err(PlaylistError::SearchFailed(format!("HTTP {}", status)));
        }

        let items = parsed
            .items
            .ok_or_else(|| PlaylistError::SearchFailed(GENERIC_FAILURE.to_string()))?;

        let results: Vec<SearchResult> = items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(SearchResult {
                    video_id,
                    title: unescape_entities(&item.snippet.title),
                    description: unescape_entities(&item.snippet.description),
                    thumbnail_url: item.snippet.thumbnails.and_then(|t| t.default).map(|t| t.url),
                    tags: item.snippet.tags,
                })
            })
            .collect();

        info!("🔍 Search '{}' returned {} videos", query, results.len());
        Ok(results)
    }
}

#[async_trait]
impl SearchTool for VideoSearchClient {
    async fn search_videos(&self, query: &str, max_results: u32) -> Result<Vec<SearchResult>> {
        self.search(query, max_results).await
    }
}

/// Snippet text comes back HTML-escaped
fn unescape_entities(input: &str) -> String {
    input
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_key: Option<&str>) -> VideoSearchClient {
        VideoSearchClient::new(SearchConfig {
            api_key: api_key.map(str::to_string),
            ..SearchConfig::default()
        })
    }

    #[test]
    fn test_build_url_encodes_query() {
        let url = client(Some("k")).build_url("lofi & chill", "k", 10).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".to_string(), "lofi & chill".to_string())));
        assert!(pairs.contains(&("type".to_string(), "video".to_string())));
        assert!(pairs.contains(&("maxResults".to_string(), "10".to_string())));
        assert!(url.as_str().starts_with("https://www.googleapis.com/youtube/v3/search?"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_reported_before_network() {
        let err = client(None).search("lofi beats", 10).await.unwrap_err();
        assert!(matches!(err, PlaylistError::MissingApiKey(_)));
        let err = client(Some("  ")).search("lofi beats", 10).await.unwrap_err();
        assert!(matches!(err, PlaylistError::MissingApiKey(_)));
    }

    #[tokio::test]
    async fn test_short_query_rejected() {
        let err = client(Some("k")).search(" a ", 10).await.unwrap_err();
        assert!(matches!(err, PlaylistError::InvalidInput(_)));
    }

    #[test]
    fn test_into_video_joins_tags() {
        let video = SearchResult {
            video_id: "dQw4w9WgXcQ".to_string(),
            title: "Song".to_string(),
            description: String::new(),
            thumbnail_url: None,
            tags: vec!["music".to_string(), "pop".to_string()],
        }
        .into_video();
        assert_eq!(video.platform, Platform::YouTube);
        assert_eq!(video.tags, "music, pop");
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape_entities("Rock &amp; Roll &#39;80s&#39;"), "Rock & Roll '80s'");
    }
}
