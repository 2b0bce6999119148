//! OpenAI-compatible chat completions client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scopelog_core::NarrativeConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::{NarrativeError, Result};
use super::{TextRewriter, REWRITE_REQUEST, ROLE_DEFINITION};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Serialize, Debug)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Rewrites bullet lists through an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAiRewriter {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiRewriter {
    /// Create a client; `timeout` bounds each HTTP request
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(NarrativeError::MissingCredential);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("scopelog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    /// Build from configuration, or `None` when no credential is available
    pub fn from_config(config: &NarrativeConfig) -> Result<Option<Self>> {
        match config.credential() {
            Some(token) => Self::new(
                token,
                config.model.clone(),
                config.base_url.clone(),
                config.timeout(),
            )
            .map(Some),
            None => Ok(None),
        }
    }

    fn api_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), COMPLETIONS_PATH)
    }

    fn system_prompt() -> String {
        format!("{}\n\n{}", ROLE_DEFINITION, REWRITE_REQUEST)
    }

    fn user_prompt(bullets: &[String]) -> String {
        let mut prompt = String::new();
        for bullet in bullets {
            prompt.push_str("* ");
            prompt.push_str(bullet);
            prompt.push('\n');
        }
        prompt
    }
}

#[async_trait]
impl TextRewriter for OpenAiRewriter {
    #[instrument(skip_all, fields(model = %self.model, bullets = bullets.len()))]
    async fn rewrite(&self, bullets: &[String]) -> Result<String> {
        let system_prompt = Self::system_prompt();
        let user_prompt = Self::user_prompt(bullets);
        let request = CompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &system_prompt,
                },
                Message {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: 0.2,
            stream: false,
        };

        let url = self.api_url();
        debug!(url = %url, "sending rewrite request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NarrativeError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::InvalidResponse(e.to_string()))?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| NarrativeError::InvalidResponse("no choices in response".to_string()))?;

        if text.is_empty() {
            return Err(NarrativeError::InvalidResponse(
                "empty completion".to_string(),
            ));
        }

        debug!(response_len = text.len(), "rewrite received");
        Ok(text)
    }
}
