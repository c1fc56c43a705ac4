//! OpenAI chat completion provider

use super::traits::*;
use super::endpoint;
use crate::config::ProviderSettings;
use crate::network::HttpClient;
use crate::results::{ChatMessage, CompletionResult, FunctionCall, Role};
use anyhow::Result as AnyhowResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

/// OpenAI chat completions adapter
pub struct OpenAiChat {
    client: HttpClient,
    endpoint: Url,
    api_key: Option<String>,
}

impl OpenAiChat {
    pub fn new(client: HttpClient, settings: &ProviderSettings) -> AnyhowResult<Self> {
        Ok(Self {
            client,
            endpoint: endpoint(&settings.base_url, "chat/completions")?,
            api_key: settings.api_key.clone(),
        })
    }

    async fn try_complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResult, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("OpenAI"))?;

        let request = ChatCompletionRequest {
            model: options.model(),
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            frequency_penalty: options.frequency_penalty,
            presence_penalty: options.presence_penalty,
            stop: options.stop.as_ref(),
        };

        let response = self
            .client
            .post_json(
                self.endpoint.clone(),
                &[("Authorization", format!("Bearer {}", api_key))],
                &request,
            )
            .await?;

        if !response.is_success() {
            return Err(ProviderError::Http {
                status: response.status,
                body: response.text,
            });
        }

        let completion: ChatCompletionResponse = response.json()?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::NoChoices)?;

        let created = DateTime::<Utc>::from_timestamp(completion.created, 0).ok_or_else(|| {
            ProviderError::Parse(format!("invalid creation timestamp {}", completion.created))
        })?;

        debug!(
            "Completion {} finished with {:?}",
            completion.id, choice.finish_reason
        );

        Ok(CompletionResult {
            id: completion.id,
            message: ChatMessage {
                role: choice.message.role,
                content: choice.message.content,
                name: None,
                function_call: choice.message.function_call,
            },
            finish_reason: choice.finish_reason,
            created,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiChat {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResult, ProviderError> {
        match self.try_complete(messages, options).await {
            Ok(completion) => Ok(completion),
            Err(e) => {
                error!("Error in chat completion: {}", e);
                Err(e)
            }
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a Stop>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    id: String,
    created: i64,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    role: Role,
    content: Option<String>,
    function_call: Option<FunctionCall>,
}
