use super::{ChatMessage, GenerationConfig, OneOrMany};

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
pub struct GenerateRequest {
    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,

    pub input: OneOrMany<ChatMessage>,
}

impl GenerateRequest {
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.input.clone().into_vec()
    }

    pub fn response_schema(&self) -> Option<&super::ResponseSchema> {
        self.generation_config.as_ref().and_then(|c| c.response_schema.as_ref())
    }

    pub fn extra_body(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.generation_config.as_ref().and_then(|c| c.extra_body.as_ref())
    }
}
