use async_trait::async_trait;
use evalgen_core::{BoxError, GenerateClient};
use evalgen_core::contracts::{
    ChatMessage, CompletionChoice, GenerateRequest, ModelOutput, ModelUsage, StopReason,
};
use crate::contracts::*;

pub struct EvalgenClientOllama {
    api_url: String,
    client: reqwest::Client,
}

impl From<&GenerateRequest> for OllamaChatRequest {
    fn from(request: &GenerateRequest) -> Self {
        let ollama_messages = request.messages().into_iter().map(|m| OllamaMessage {
            content: m.text(),
            role: m.role,
        }).collect();

        OllamaChatRequest {
            model: request.model.clone(),
            messages: ollama_messages,
            stream: false,
            options: request.generation_config.as_ref().map(|c| OllamaOptions {
                temperature: c.temperature,
                top_k: c.top_k,
                top_p: c.top_p,
                num_predict: c.max_tokens,
                seed: c.seed,
            }),
            format: request.response_schema().map(|s| s.schema.clone()),
        }
    }
}

impl EvalgenClientOllama {
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn map_response(response: OllamaChatResponse) -> ModelOutput {
        let stop_reason = response
            .done_reason
            .as_deref()
            .map(StopReason::from_provider)
            .unwrap_or(if response.done { StopReason::Stop } else { StopReason::Unknown });

        let input_tokens = response.prompt_eval_count.unwrap_or(0);
        let output_tokens = response.eval_count.unwrap_or(0);

        ModelOutput {
            model: response.model,
            choices: vec![CompletionChoice {
                message: ChatMessage::new(response.message.role, response.message.content),
                stop_reason,
            }],
            usage: Some(ModelUsage {
                input_tokens,
                output_tokens,
                total_tokens: input_tokens + output_tokens,
            }),
            external_id: None,
            error: None,
        }
    }
}

#[async_trait]
impl GenerateClient for EvalgenClientOllama {
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelOutput, BoxError> {
        let url = format!("{}/api/chat", self.api_url.trim_end_matches('/'));

        if request.response_schema().is_some_and(|s| s.strict.is_some() || s.description.is_some()) {
            tracing::debug!(model = %request.model, "ollama: only the response schema document is sent");
        }
        if request.extra_body().is_some() {
            tracing::debug!(model = %request.model, "ollama: ignoring extra_body");
        }

        let ollama_request = OllamaChatRequest::from(request);

        let response = self.client.post(url)
            .json(&ollama_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let err_text = response.text().await?;
            return Err(format!("Ollama API error ({}): {}", status, err_text).into());
        }

        let ollama_response: OllamaChatResponse = response.json().await?;
        Ok(Self::map_response(ollama_response))
    }
}
