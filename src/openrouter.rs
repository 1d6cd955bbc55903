use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::{BotError, Result};
use crate::llm::LanguageModel;
use crate::types::MessageRole;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

#[derive(Debug, Serialize)]
struct OpenRouterRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    #[serde(default)]
    pub content: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

pub struct OpenRouterClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
    generation: GenerationConfig,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: String, generation: GenerationConfig) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model,
            generation,
        }
    }

    fn build_request(&self, messages: Vec<Message>) -> OpenRouterRequest<'_> {
        OpenRouterRequest {
            model: &self.model,
            messages,
            max_tokens: self.generation.max_tokens,
            temperature: self.generation.temperature,
            top_p: self.generation.top_p,
            top_k: self.generation.top_k,
        }
    }

    /// Send a conversation and return the assistant's text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// response without choices.
    pub async fn chat(&self, messages: Vec<Message>) -> Result<String> {
        debug!(
            "Sending request to OpenRouter API with {} messages",
            messages.len()
        );

        let request = self.build_request(messages);

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(BotError::OpenRouterApi { status, message });
        }

        let api_response: OpenRouterResponse = response.json().await?;

        let reply = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BotError::OpenRouterResponse("No choices in response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        debug!("Received response from OpenRouter API");
        Ok(reply)
    }
}

impl LanguageModel for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(vec![Message::user(prompt)]).await
    }
}
