//! Copyright-free music suggestions for audio-only mode

use serde::{Deserialize, Serialize};
use tracing::info;

use super::AiAssistant;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicSuggestionInput {
    pub video_title: String,
    #[serde(default)]
    pub video_description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MusicSuggestion {
    pub music_suggestion: String,
}

const SYSTEM_PROMPT: &str = r#"You are a music expert specializing in copyright-free music.

Given the title and description of a video, suggest copyright-free music that matches its genre and style, so it can play while the video runs in audio-only mode.

Respond with JSON only, in exactly this shape:
{"musicSuggestion": "your suggestion"}"#;

impl AiAssistant {
    /// Suggest copyright-free music similar to the given video
    pub async fn music_suggestion(&self, input: &MusicSuggestionInput) -> Result<MusicSuggestion> {
        let user = format!(
            "Title: {}\nDescription: {}\n\nSuggest copyright-free music:",
            input.video_title, input.video_description
        );

        let suggestion: MusicSuggestion = self.ask(SYSTEM_PROMPT, user).await?;
        info!("🎵 Music suggestion ready for '{}'", input.video_title);
        Ok(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::ScriptedLLM;

    #[tokio::test]
    async fn test_music_suggestion_parses_reply() {
        let llm = ScriptedLLM::replying(
            "```json\n{\"musicSuggestion\": \"Try Kevin MacLeod - Local Forecast\"}\n```",
        );
        let seen = llm.seen.clone();
        let ai = AiAssistant::new(Box::new(llm));

        let out = ai
            .music_suggestion(&MusicSuggestionInput {
                video_title: "Synthwave mix".to_string(),
                video_description: "Retro vibes".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(out.music_suggestion, "Try Kevin MacLeod - Local Forecast");
        let sent = seen.lock().unwrap();
        assert!(sent[0][1].content.contains("Title: Synthwave mix"));
    }
}
