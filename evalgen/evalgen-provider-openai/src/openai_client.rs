use async_trait::async_trait;
use evalgen_core::{BoxError, GenerateClient};
use evalgen_core::contracts::{
    ChatMessage, CompletionChoice, Content, GenerateRequest, ModelOutput, ModelUsage, OneOrMany,
    ResponseSchema, StopReason,
};
use crate::contracts::*;

/// Client for OpenAI chat completions and the servers that speak the same
/// protocol (Mistral, vLLM, SGLang).
pub struct EvalgenClientOpenAI {
    api_url: String,
    api_key: Option<String>,
    provider_name: String,
    client: reqwest::Client,
}

impl From<&ResponseSchema> for OpenAIResponseFormat {
    fn from(schema: &ResponseSchema) -> Self {
        OpenAIResponseFormat {
            r#type: "json_schema".to_string(),
            json_schema: OpenAIJsonSchema {
                name: schema.name.clone(),
                description: schema.description.clone(),
                schema: schema.schema.clone(),
                strict: schema.strict,
            },
        }
    }
}

impl From<ChatMessage> for OpenAIMessage {
    fn from(m: ChatMessage) -> Self {
        let content = m.content.map(|c| match c {
            OneOrMany::One(Content::Text { text }) => OpenAIContent::Text(text),
            OneOrMany::Many(items) => OpenAIContent::Parts(
                items
                    .into_iter()
                    .map(|Content::Text { text }| OpenAIContentPart::Text { text })
                    .collect(),
            ),
        });

        OpenAIMessage {
            role: m.role,
            content,
            refusal: None,
        }
    }
}

impl From<&GenerateRequest> for OpenAIChatRequest {
    fn from(request: &GenerateRequest) -> Self {
        let config = request.generation_config.as_ref();

        OpenAIChatRequest {
            model: request.model.clone(),
            messages: request.messages().into_iter().map(OpenAIMessage::from).collect(),
            stream: false,
            temperature: config.and_then(|c| c.temperature),
            top_p: config.and_then(|c| c.top_p),
            max_tokens: config.and_then(|c| c.max_tokens),
            seed: config.and_then(|c| c.seed),
            response_format: request.response_schema().map(OpenAIResponseFormat::from),
            extra_body: request.extra_body().cloned(),
        }
    }
}

impl EvalgenClientOpenAI {
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        Self {
            api_url,
            api_key,
            provider_name: "OpenAI".to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Name used in error messages, e.g. "vLLM".
    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    fn map_from_openai_message(msg: OpenAIMessage) -> ChatMessage {
        let content = msg.content.map(|c| match c {
            OpenAIContent::Text(text) => OneOrMany::One(Content::Text { text }),
            OpenAIContent::Parts(parts) => OneOrMany::Many(parts.into_iter().map(|p| match p {
                OpenAIContentPart::Text { text } => Content::Text { text },
            }).collect())
        });

        ChatMessage {
            role: msg.role,
            content,
        }
    }

    pub fn map_response(response: OpenAIChatResponse) -> ModelOutput {
        let error = response.choices.iter().find_map(|c| c.message.refusal.clone());

        let choices = response.choices.into_iter().map(|c| CompletionChoice {
            stop_reason: c.finish_reason.as_deref().map(StopReason::from_provider).unwrap_or_default(),
            message: Self::map_from_openai_message(c.message),
        }).collect();

        ModelOutput {
            model: response.model,
            choices,
            usage: response.usage.map(|u| ModelUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            external_id: Some(response.id),
            error,
        }
    }
}

#[async_trait]
impl GenerateClient for EvalgenClientOpenAI {
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelOutput, BoxError> {
        let url = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));

        let openai_request = OpenAIChatRequest::from(request);
        let body = openai_request.to_body()?;

        tracing::debug!(
            provider = %self.provider_name,
            model = %request.model,
            response_format = openai_request.response_format.is_some(),
            extra_keys = openai_request.extra_body.as_ref().map(|e| e.len()).unwrap_or(0),
            "sending chat completion"
        );

        let mut builder = self.client.post(url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let err_text = response.text().await?;
            return Err(format!("{} API error ({}): {}", self.provider_name, status, err_text).into());
        }

        let openai_response: OpenAIChatResponse = response.json().await?;
        Ok(Self::map_response(openai_response))
    }
}
