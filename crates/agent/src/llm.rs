use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use cupid_core::config::LlmConfig;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String>;
}

/// Client for OpenAI-compatible chat-completions APIs (Perplexity, OpenAI,
/// Ollama's compatibility endpoint).
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
}

impl ChatCompletionsClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building suggestion provider http client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.model,
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: String,
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system_prompt },
                ChatMessage { role: "user", content: user_message },
            ],
            temperature: 0.7,
        };

        let mut request = self.http.post(format!("{}/chat/completions", self.base_url)).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response =
            request.send().await.context("sending chat completions request")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("chat completions request failed with status {status}: {detail}");
        }

        let payload: ChatResponse =
            response.json().await.context("decoding chat completions response")?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("chat completions reply contained no choices"))
    }
}
