use std::ops::Add;

use serde::{Deserialize, Serialize};

use super::ChatMessage;

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Stop,
    MaxTokens,
    ModelLength,
    ToolCalls,
    ContentFilter,
    #[default]
    Unknown,
}

impl StopReason {
    /// Maps the finish reason strings used by the supported providers.
    pub fn from_provider(reason: &str) -> Self {
        match reason {
            "stop" | "eos" | "STOP" => StopReason::Stop,
            "length" | "max_tokens" | "MAX_TOKENS" => StopReason::MaxTokens,
            "model_length" => StopReason::ModelLength,
            "tool_calls" | "function_call" => StopReason::ToolCalls,
            "content_filter" | "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
                StopReason::ContentFilter
            }
            _ => StopReason::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

impl Add for ModelUsage {
    type Output = ModelUsage;

    fn add(self, other: ModelUsage) -> ModelUsage {
        ModelUsage {
            input_tokens: self.input_tokens + other.input_tokens,
            output_tokens: self.output_tokens + other.output_tokens,
            total_tokens: self.total_tokens + other.total_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionChoice {
    pub message: ChatMessage,

    #[serde(default)]
    pub stop_reason: StopReason,
}

/// Output of a single generation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelOutput {
    pub model: String,

    #[serde(default)]
    pub choices: Vec<CompletionChoice>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<ModelUsage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Set when the provider refused the request (content moderation etc.).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModelOutput {
    pub fn from_content(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            choices: vec![CompletionChoice {
                message: ChatMessage::assistant(content),
                stop_reason: StopReason::Stop,
            }],
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Text of the first choice, or an empty string.
    pub fn completion(&self) -> String {
        self.choices
            .first()
            .map(|c| c.message.text())
            .unwrap_or_default()
    }

    pub fn stop_reason(&self) -> StopReason {
        self.choices
            .first()
            .map(|c| c.stop_reason)
            .unwrap_or_default()
    }
}
