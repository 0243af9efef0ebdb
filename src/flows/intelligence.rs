//! Video summary and key moments

use serde::{Deserialize, Serialize};
use tracing::info;

use super::AiAssistant;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceInput {
    pub video_title: String,
    #[serde(default)]
    pub video_description: String,
}

/// A notable point in the video. `timestamp` is `HH:MM:SS`, or empty when
/// the description gives nothing to infer it from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyMoment {
    #[serde(default)]
    pub timestamp: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoIntelligence {
    pub summary: String,
    #[serde(default)]
    pub key_moments: Vec<KeyMoment>,
}

const SYSTEM_PROMPT: &str = r#"You are a video content analyst. From a video's title and description, write a concise summary and list its key moments.

If the description is detailed, use it to infer timestamps in HH:MM:SS format. If not, give general key moments and leave the timestamp empty.

Respond with JSON only, in exactly this shape:
{"summary": "...", "keyMoments": [{"timestamp": "00:01:30", "description": "..."}]}"#;

impl AiAssistant {
    /// Summarize a video and pick out key moments
    pub async fn video_intelligence(&self, input: &IntelligenceInput) -> Result<VideoIntelligence> {
        let user = format!(
            "Video Title: {}\nVideo Description: {}",
            input.video_title, input.video_description
        );

        let mut out: VideoIntelligence = self.ask(SYSTEM_PROMPT, user).await?;
        for moment in &mut out.key_moments {
            moment.timestamp = normalize_timestamp(&moment.timestamp);
        }

        info!(
            "🧠 Summary with {} key moments for '{}'",
            out.key_moments.len(),
            input.video_title
        );
        Ok(out)
    }
}

/// Pad `M:SS` / `MM:SS` / `H:MM:SS` to `HH:MM:SS`; anything else is kept as-is
fn normalize_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    let parts: Vec<&str> = raw.split(':').collect();
    let numeric = parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if !numeric {
        return raw.to_string();
    }

    let nums: Vec<u32> = parts.iter().filter_map(|p| p.parse().ok()).collect();
    match nums.as_slice() {
        [m, s] => format!("00:{:02}:{:02}", m, s),
        [h, m, s] => format!("{:02}:{:02}:{:02}", h, m, s),
        _ => raw.to_string(),
    }
}
