use super::{ChatMessage, LLMConfig, LLMProvider, LLMResponse, LLM};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

fn http_client(config: &LLMConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()?)
}

/// Request body shared by LM Studio and OpenAI
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
    usage: Option<ChatCompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionUsage {
    total_tokens: u32,
}

/// POST an OpenAI-style chat completion and unwrap the first choice
async fn chat_completion(
    client: &reqwest::Client,
    url: &str,
    bearer: Option<&str>,
    config: &LLMConfig,
    messages: Vec<ChatMessage>,
    label: &str,
) -> Result<LLMResponse> {
    let request = ChatCompletionRequest {
        model: &config.model,
        messages,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };

    debug!("Sending chat request to {} at {}", label, url);

    let mut builder = client.post(url).json(&request);
    if let Some(key) = bearer {
        builder = builder.bearer_auth(key);
    }
    let response = builder.send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(anyhow!("{} API error {}: {}", label, status, text));
    }

    let body: ChatCompletionResponse = response.json().await?;
    let content = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No response from {}", label))?
        .message
        .content;

    Ok(LLMResponse {
        content,
        tokens_used: body.usage.map(|u| u.total_tokens),
    })
}

/// LMStudio provider implementation
pub struct LMStudioProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

impl LMStudioProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = http_client(&config)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LLM for LMStudioProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let endpoint = self
            .config
            .endpoint
            .as_deref()
            .ok_or_else(|| anyhow!("LMStudio endpoint not configured"))?;

        chat_completion(&self.client, endpoint, None, &self.config, messages, "LMStudio").await
    }

    async fn is_available(&self) -> bool {
        let Some(endpoint) = &self.config.endpoint else {
            return false;
        };
        let models_endpoint = endpoint.replace("/chat/completions", "/models");

        match self.client.get(&models_endpoint).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn provider_type(&self) -> LLMProvider {
        LLMProvider::LMStudio
    }
}

/// Gemini provider implementation
pub struct GeminiProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    total_token_count: u32,
}

impl GeminiProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        if config.api_key.is_none() {
            return Err(anyhow!("Gemini API key required"));
        }
        let client = http_client(&config)?;
        Ok(Self { config, client })
    }

    fn base_url(&self) -> &str {
        self.config
            .endpoint
            .as_deref()
            .unwrap_or(GEMINI_BASE_URL)
            .trim_end_matches('/')
    }
}

#[async_trait]
impl LLM for GeminiProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow!("Gemini API key not configured"))?;

        // Gemini takes the system prompt separately and calls the assistant "model"
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();
        for msg in messages {
            match msg.role.as_str() {
                "system" => system_parts.push(GeminiPart { text: msg.content }),
                role => contents.push(GeminiContent {
                    role: Some(if role == "assistant" { "model" } else { "user" }.to_string()),
                    parts: vec![GeminiPart { text: msg.content }],
                }),
            }
        }

        let request = GeminiRequest {
            system_instruction: (!system_parts.is_empty()).then(|| GeminiContent {
                role: None,
                parts: system_parts,
            }),
            contents,
            generation_config: GeminiGenerationConfig {
                max_output_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
                response_mime_type: "application/json",
            },
        };

        let url = format!("{}/{}:generateContent", self.base_url(), self.config.model);

        debug!("Sending request to Gemini model {}", self.config.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error {}: {}", status, text));
        }

        let gemini_response: GeminiResponse = response.json().await?;

        let content = gemini_response
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| anyhow!("No response from Gemini"))?;

        Ok(LLMResponse {
            content,
            tokens_used: gemini_response.usage_metadata.map(|u| u.total_token_count),
        })
    }

    async fn is_available(&self) -> bool {
        let Some(api_key) = &self.config.api_key else {
            return false;
        };
        match self
            .client
            .get(self.base_url())
            .header("x-goog-api-key", api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn provider_type(&self) -> LLMProvider {
        LLMProvider::Gemini
    }
}

/// OpenAI provider implementation
pub struct OpenAIProvider {
    config: LLMConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(config: LLMConfig) -> Result<Self> {
        if config.api_key.is_none() {
            return Err(anyhow!("OpenAI API key required"));
        }
        let client = http_client(&config)?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl LLM for OpenAIProvider {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("OpenAI API key not configured"))?;
        let url = self.config.endpoint.as_deref().unwrap_or(OPENAI_CHAT_URL);

        chat_completion(&self.client, url, Some(api_key), &self.config, messages, "OpenAI").await
    }

    async fn is_available(&self) -> bool {
        let Some(api_key) = &self.config.api_key else {
            return false;
        };
        match self
            .client
            .get("https://api.openai.com/v1/models")
            .bearer_auth(api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn provider_type(&self) -> LLMProvider {
        LLMProvider::OpenAI
    }
}
