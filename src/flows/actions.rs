//! Entry points used by the CLI and HTTP API
//!
//! Input errors are returned as-is. Any other failure inside a flow is logged
//! and replaced with a fallback the user can read. `None` for the assistant
//! means no backend is configured and is treated like a failing backend.

use tracing::{error, warn};

use super::{
    AiAssistant, ComplianceInput, ComplianceSuggestions, GeneratePlaylistInput, GeneratedPlaylist,
    IntelligenceInput, MusicSuggestion, MusicSuggestionInput, VideoIntelligence,
};
use crate::error::{PlaylistError, Result};

pub const MUSIC_FALLBACK: &str = "Sorry, I couldn't generate a suggestion at this time.";
pub const COMPLIANCE_FALLBACK: &str = "Sorry, I couldn't generate suggestions at this time.";
pub const SUMMARY_FALLBACK: &str = "Sorry, I couldn't generate a summary at this time.";
pub const GENERATION_FAILED: &str = "Something went wrong while generating the playlist.";

fn unavailable() -> PlaylistError {
    PlaylistError::Llm("no AI backend configured".to_string())
}

pub async fn suggest_audio_only_music(
    ai: Option<&AiAssistant>,
    input: &MusicSuggestionInput,
) -> Result<MusicSuggestion> {
    let outcome = match ai {
        Some(ai) => ai.music_suggestion(input).await,
        None => Err(unavailable()),
    };

    Ok(outcome.unwrap_or_else(|e| {
        error!("Music suggestion failed: {}", e);
        MusicSuggestion {
            music_suggestion: MUSIC_FALLBACK.to_string(),
        }
    }))
}

pub async fn suggest_compliance(
    ai: Option<&AiAssistant>,
    input: &ComplianceInput,
) -> Result<ComplianceSuggestions> {
    input.validate()?;
    let outcome = match ai {
        Some(ai) => ai.compliance_suggestions(input).await,
        None => Err(unavailable()),
    };

    Ok(outcome.unwrap_or_else(|e| {
        error!("Compliance suggestions failed: {}", e);
        ComplianceSuggestions {
            suggestions: vec![COMPLIANCE_FALLBACK.to_string()],
        }
    }))
}

pub async fn summarize_video(
    ai: Option<&AiAssistant>,
    input: &IntelligenceInput,
) -> Result<VideoIntelligence> {
    let outcome = match ai {
        Some(ai) => ai.video_intelligence(input).await,
        None => Err(unavailable()),
    };

    Ok(outcome.unwrap_or_else(|e| {
        error!("Video summary failed: {}", e);
        VideoIntelligence {
            summary: SUMMARY_FALLBACK.to_string(),
            key_moments: Vec::new(),
        }
    }))
}

/// Generate a playlist; an empty result is `NoResults`
pub async fn generate_playlist(
    ai: Option<&AiAssistant>,
    input: &GeneratePlaylistInput,
) -> Result<GeneratedPlaylist> {
    input.validate()?;
    let outcome = match ai {
        Some(ai) => ai.generate_playlist(input).await,
        None => Err(unavailable()),
    };

    match outcome {
        Ok(playlist) if playlist.videos.is_empty() => {
            warn!("Playlist generation returned no videos");
            Err(PlaylistError::NoResults(
                "The AI could not find any videos for your prompt.".to_string(),
            ))
        }
        Ok(playlist) => Ok(playlist),
        Err(e @ PlaylistError::MissingApiKey(_)) => Err(e),
        Err(e) => {
            error!("Playlist generation failed: {}", e);
            Err(PlaylistError::Llm(GENERATION_FAILED.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::{FakeSearch, ScriptedLLM};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_music_fallback_on_backend_failure() {
        let ai = AiAssistant::new(Box::new(ScriptedLLM::failing()));
        let input = MusicSuggestionInput {
            video_title: "Chill beats".to_string(),
            video_description: String::new(),
        };
        let out = suggest_audio_only_music(Some(&ai), &input).await.unwrap();
        assert_eq!(out.music_suggestion, MUSIC_FALLBACK);
    }

    #[tokio::test]
    async fn test_compliance_fallback_without_backend() {
        let out = suggest_compliance(None, &ComplianceInput::new("Clip", "", ""))
            .await
            .unwrap();
        assert_eq!(out.suggestions, vec![COMPLIANCE_FALLBACK.to_string()]);
    }

    #[tokio::test]
    async fn test_summary_fallback_on_unparseable_reply() {
        let ai = AiAssistant::new(Box::new(ScriptedLLM::replying("I'd rather not.")));
        let input = IntelligenceInput {
            video_title: "Lecture".to_string(),
            video_description: String::new(),
        };
        let out = summarize_video(Some(&ai), &input).await.unwrap();
        assert_eq!(out.summary, SUMMARY_FALLBACK);
        assert!(out.key_moments.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_is_not_masked() {
        let mut input = ComplianceInput::new("Clip", "", "");
        input.policy_url = "not a url".to_string();
        let err = suggest_compliance(None, &input).await.unwrap_err();
        assert!(matches!(err, PlaylistError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_empty_title_still_gets_an_answer() {
        let ai = AiAssistant::new(Box::new(ScriptedLLM::replying(
            r#"{"musicSuggestion": "Ambient piano from the YouTube Audio Library"}"#,
        )));
        let input = MusicSuggestionInput {
            video_title: String::new(),
            video_description: String::new(),
        };
        let out = suggest_audio_only_music(Some(&ai), &input).await.unwrap();
        assert_eq!(out.music_suggestion, "Ambient piano from the YouTube Audio Library");

        let out = suggest_audio_only_music(None, &input).await.unwrap();
        assert_eq!(out.music_suggestion, MUSIC_FALLBACK);
    }

    #[tokio::test]
    async fn test_empty_generation_is_no_results() {
        let ai = AiAssistant::new(Box::new(ScriptedLLM::replying(r#"{"toolCalls": []}"#)))
            .with_search_tool(Arc::new(FakeSearch::new()));
        let input = GeneratePlaylistInput::new("obscure 1970s polka remixes");
        let err = generate_playlist(Some(&ai), &input).await.unwrap_err();
        assert!(matches!(err, PlaylistError::NoResults(_)));
    }

    #[tokio::test]
    async fn test_generation_failure_is_generic() {
        let ai = AiAssistant::new(Box::new(ScriptedLLM::failing()))
            .with_search_tool(Arc::new(FakeSearch::new()));
        let input = GeneratePlaylistInput::new("obscure 1970s polka remixes");
        let err = generate_playlist(Some(&ai), &input).await.unwrap_err();
        match err {
            PlaylistError::Llm(msg) => assert_eq!(msg, GENERATION_FAILED),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
