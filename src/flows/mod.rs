//! AI helper flows
//!
//! Each flow sends a structured prompt to the configured [`LLM`] and parses
//! a JSON reply into a typed output. The `actions` module wraps the flows
//! with input validation and user-facing fallbacks.

pub mod actions;
pub mod compliance;
pub mod intelligence;
pub mod music;
pub mod playlist;

pub use compliance::{ComplianceInput, ComplianceSuggestions, YOUTUBE_DATA_POLICY_URL};
pub use intelligence::{IntelligenceInput, KeyMoment, VideoIntelligence};
pub use music::{MusicSuggestion, MusicSuggestionInput};
pub use playlist::{GeneratePlaylistInput, GeneratedPlaylist, SearchToolInput, ToolCall};

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use crate::error::{PlaylistError, Result};
use crate::llm::{create_llm, parse_json_reply, ChatMessage, LLMConfig, LLM};
use crate::search::SearchTool;

/// Prompt runner shared by every flow
pub struct AiAssistant {
    llm: Box<dyn LLM>,
    search: Option<Arc<dyn SearchTool>>,
}

impl AiAssistant {
    pub fn new(llm: Box<dyn LLM>) -> Self {
        Self { llm, search: None }
    }

    /// Build from config; fails when the provider is missing credentials
    pub fn from_config(config: &LLMConfig) -> Result<Self> {
        let llm = create_llm(config).map_err(|e| PlaylistError::Llm(e.to_string()))?;
        Ok(Self::new(llm))
    }

    /// Give the playlist generator a video search tool
    pub fn with_search_tool(mut self, tool: Arc<dyn SearchTool>) -> Self {
        self.search = Some(tool);
        self
    }

    /// Whether the backend answers right now
    pub async fn is_available(&self) -> bool {
        self.llm.is_available().await
    }

    pub(crate) fn search_tool(&self) -> Option<&Arc<dyn SearchTool>> {
        self.search.as_ref()
    }

    /// Send one system + user exchange and parse the JSON reply
    pub(crate) async fn ask<T: DeserializeOwned>(&self, system: &str, user: String) -> Result<T> {
        let messages = vec![ChatMessage::system(system), ChatMessage::user(user)];

        let response = self
            .llm
            .chat(messages)
            .await
            .map_err(|e| PlaylistError::Llm(e.to_string()))?;

        debug!(
            "{:?} replied ({} chars, tokens: {:?})",
            self.llm.provider_type(),
            response.content.len(),
            response.tokens_used
        );

        parse_json_reply(&response.content)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::llm::{LLMProvider, LLMResponse};
    use crate::search::SearchResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with canned content and records what it was sent
    pub struct ScriptedLLM {
        replies: Mutex<Vec<anyhow::Result<String>>>,
        pub seen: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    }

    impl ScriptedLLM {
        pub fn replying(reply: &str) -> Self {
            Self {
                replies: Mutex::new(vec![Ok(reply.to_string())]),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn failing() -> Self {
            Self {
                replies: Mutex::new(vec![Err(anyhow::anyhow!("backend down"))]),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl LLM for ScriptedLLM {
        async fn chat(&self, messages: Vec<ChatMessage>) -> anyhow::Result<LLMResponse> {
            self.seen.lock().unwrap().push(messages);
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply left")))?;
            Ok(LLMResponse {
                content: reply,
                tokens_used: None,
            })
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn provider_type(&self) -> LLMProvider {
            LLMProvider::LMStudio
        }
    }

    /// Up to three numbered hits per query
    pub struct FakeSearch {
        pub queries: Mutex<Vec<(String, u32)>>,
    }

    impl FakeSearch {
        pub fn new() -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchTool for FakeSearch {
        async fn search_videos(&self, query: &str, max_results: u32) -> Result<Vec<SearchResult>> {
            self.queries
                .lock()
                .unwrap()
                .push((query.to_string(), max_results));
            Ok((0..max_results.min(3))
                .map(|i| SearchResult {
                    video_id: format!("{:0>11}", format!("{}{}", query.len(), i)),
                    title: format!("{} #{}", query, i + 1),
                    description: String::new(),
                    thumbnail_url: None,
                    tags: Vec::new(),
                })
                .collect())
        }
    }
}
