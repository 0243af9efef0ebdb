//! Prompt-driven playlist generation
//!
//! The model does not see search results directly. It answers with one or
//! more `youtubeSearch` tool calls, which are executed here through the
//! configured [`SearchTool`](crate::search::SearchTool); every hit becomes a
//! new YouTube [`Video`].

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::AiAssistant;
use crate::error::{PlaylistError, Result};
use crate::search::MAX_RESULTS_LIMIT;
use crate::url_parser::Platform;
use crate::video::Video;

/// Shortest prompt accepted by the generator
pub const MIN_PROMPT_LEN: usize = 10;

/// Name of the search tool offered to the model
pub const YOUTUBE_SEARCH_TOOL: &str = "youtubeSearch";

const DEFAULT_TOOL_MAX_RESULTS: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePlaylistInput {
    pub prompt: String,
}

impl GeneratePlaylistInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().chars().count() < MIN_PROMPT_LEN {
            return Err(PlaylistError::InvalidInput(format!(
                "prompt must be at least {} characters",
                MIN_PROMPT_LEN
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneratedPlaylist {
    pub videos: Vec<Video>,
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub input: SearchToolInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchToolInput {
    #[serde(default)]
    pub query: String,
    pub max_results: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolCallReply {
    #[serde(default, alias = "tool_calls")]
    tool_calls: Vec<ToolCall>,
}

const SYSTEM_PROMPT: &str = r#"You are a playlist generation assistant. Use the youtubeSearch tool to find videos matching the user's request.

The youtubeSearch tool takes:
- query: the search terms
- maxResults: how many videos to return (default 10)

Split broad requests into several focused searches when that gives a better playlist.

Respond with JSON only, in exactly this shape:
{"toolCalls": [{"name": "youtubeSearch", "input": {"query": "...", "maxResults": 10}}]}"#;

impl AiAssistant {
    /// Build a playlist for a free-text request
    pub async fn generate_playlist(
        &self,
        input: &GeneratePlaylistInput,
    ) -> Result<GeneratedPlaylist> {
        input.validate()?;
        let search = self.search_tool().ok_or_else(|| {
            PlaylistError::SearchFailed("no video search tool configured".to_string())
        })?;

        let reply: ToolCallReply = self.ask(SYSTEM_PROMPT, input.prompt.trim().to_string()).await?;
        info!("🛠️  Model requested {} tool call(s)", reply.tool_calls.len());

        let mut searches = Vec::new();
        for call in reply.tool_calls {
            if call.name != YOUTUBE_SEARCH_TOOL {
                warn!("Ignoring unknown tool call '{}'", call.name);
                continue;
            }
            let query = call.input.query.trim().to_string();
            if query.is_empty() {
                warn!("Ignoring {} call with an empty query", YOUTUBE_SEARCH_TOOL);
                continue;
            }
            let max_results = call
                .input
                .max_results
                .unwrap_or(DEFAULT_TOOL_MAX_RESULTS)
                .clamp(1, MAX_RESULTS_LIMIT);
            searches.push((query, max_results));
        }

        let hits = join_all(
            searches
                .iter()
                .map(|(query, max_results)| search.search_videos(query, *max_results)),
        )
        .await;

        let mut videos = Vec::new();
        for batch in hits {
            videos.extend(batch?.into_iter().map(|hit| {
                Video::new(hit.video_id, Platform::YouTube, hit.title, hit.description, "")
            }));
        }

        info!("🎬 Generated {} videos for prompt", videos.len());
        Ok(GeneratedPlaylist { videos })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::{FakeSearch, ScriptedLLM};
    use std::sync::Arc;

    #[test]
    fn test_short_prompt_rejected() {
        assert!(GeneratePlaylistInput::new("lofi").validate().is_err());
        assert!(GeneratePlaylistInput::new("lofi beats to study to").validate().is_ok());
    }

    #[tokio::test]
    async fn test_tool_calls_are_executed() {
        let search = Arc::new(FakeSearch::new());
        let ai = AiAssistant::new(Box::new(ScriptedLLM::replying(
            r#"{"toolCalls": [
                {"name": "youtubeSearch", "input": {"query": "lofi hip hop", "maxResults": 2}},
                {"name": "youtubeSearch", "input": {"query": "jazz piano"}},
                {"name": "weather", "input": {"query": "Paris"}}
            ]}"#,
        )))
        .with_search_tool(search.clone());

        let out = ai
            .generate_playlist(&GeneratePlaylistInput::new("relaxing music for studying"))
            .await
            .unwrap();

        let queries = search.queries.lock().unwrap().clone();
        assert_eq!(
            queries,
            vec![("lofi hip hop".to_string(), 2), ("jazz piano".to_string(), 10)]
        );
        assert_eq!(out.videos.len(), 5);
        assert!(out.videos.iter().all(|v| v.platform == Platform::YouTube && v.tags.is_empty()));
    }

    #[tokio::test]
    async fn test_no_tool_calls_yields_empty_playlist() {
        let ai = AiAssistant::new(Box::new(ScriptedLLM::replying(r#"{"toolCalls": []}"#)))
            .with_search_tool(Arc::new(FakeSearch::new()));
        let out = ai
            .generate_playlist(&GeneratePlaylistInput::new("something nobody has filmed"))
            .await
            .unwrap();
        assert!(out.videos.is_empty());
    }

    #[tokio::test]
    async fn test_missing_search_tool_is_an_error() {
        let ai = AiAssistant::new(Box::new(ScriptedLLM::replying(r#"{"toolCalls": []}"#)));
        let err = ai
            .generate_playlist(&GeneratePlaylistInput::new("relaxing music for studying"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlaylistError::SearchFailed(_)));
    }
}
