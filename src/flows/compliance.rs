//! Copyright-compliance tips based on YouTube's developer policies

use serde::{Deserialize, Serialize};
use tracing::info;

use super::AiAssistant;
use crate::error::{PlaylistError, Result};

/// Policy document the suggestions are grounded in
pub const YOUTUBE_DATA_POLICY_URL: &str =
    "https://developers.google.com/youtube/terms/developer-policies";

fn default_policy_url() -> String {
    YOUTUBE_DATA_POLICY_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceInput {
    pub video_title: String,
    #[serde(default)]
    pub video_description: String,
    #[serde(default)]
    pub video_tags: String,
    #[serde(default = "default_policy_url", rename = "youtubeDataPolicyUrl")]
    pub policy_url: String,
}

impl ComplianceInput {
    pub fn new(title: &str, description: &str, tags: &str) -> Self {
        Self {
            video_title: title.to_string(),
            video_description: description.to_string(),
            video_tags: tags.to_string(),
            policy_url: default_policy_url(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.policy_url).map_err(|e| {
            PlaylistError::InvalidInput(format!(
                "policy URL '{}' is invalid: {}",
                self.policy_url, e
            ))
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplianceSuggestions {
    pub suggestions: Vec<String>,
}

const SYSTEM_PROMPT: &str = r#"You are an assistant that helps a personal video playlist application improve its user experience and avoid copyright infringement, following YouTube's data policy.

Give a list of short, actionable suggestions for the video described by the user.

Respond with JSON only, in exactly this shape:
{"suggestions": ["first suggestion", "second suggestion"]}"#;

impl AiAssistant {
    /// Actionable compliance suggestions for one video
    pub async fn compliance_suggestions(
        &self,
        input: &ComplianceInput,
    ) -> Result<ComplianceSuggestions> {
        input.validate()?;
        let user = format!(
            "The current YouTube data policy is available here: {}\n\nVideo Title: {}\nVideo Description: {}\nVideo Tags: {}\n\nSuggestions:",
            input.policy_url, input.video_title, input.video_description, input.video_tags
        );

        let mut out: ComplianceSuggestions = self.ask(SYSTEM_PROMPT, user).await?;
        out.suggestions.retain(|s| !s.trim().is_empty());

        info!("📋 {} compliance suggestions for '{}'", out.suggestions.len(), input.video_title);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::ScriptedLLM;

    #[test]
    fn test_policy_url_defaults_when_absent() {
        let input: ComplianceInput =
            serde_json::from_str(r#"{"videoTitle": "Clip", "videoDescription": "", "videoTags": ""}"#).unwrap();
        assert_eq!(input.policy_url, YOUTUBE_DATA_POLICY_URL);
    }

    #[test]
    fn test_bad_policy_url_rejected() {
        let mut input = ComplianceInput::new("Clip", "", "");
        input.policy_url = "not a url".to_string();
        assert!(matches!(input.validate(), Err(PlaylistError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_blank_suggestions_dropped() {
        let ai = AiAssistant::new(Box::new(ScriptedLLM::replying(
            r#"{"suggestions": ["Credit the original creator", "  ", "Link back to the source"]}"#,
        )));
        let out = ai
            .compliance_suggestions(&ComplianceInput::new("Clip", "desc", "music"))
            .await
            .unwrap();
        assert_eq!(out.suggestions.len(), 2);
    }
}
