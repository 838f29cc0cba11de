use serde_json::{Map, Value};

use super::{GuidedBackend, GuidedDecoding, ResponseSchema};

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default, PartialEq)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Structured output constraint; support for its fields varies per provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<ResponseSchema>,

    /// Extra top-level request body entries for OpenAI-compatible backends.
    /// Forwarded verbatim, never validated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_body: Option<Map<String, Value>>,
}

impl GenerationConfig {
    pub fn with_response_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Adds one raw `extra_body` entry, replacing an existing key.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra_body
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    /// Adds a guided decoding directive under the backend's own key name.
    pub fn with_guided(self, guided: GuidedDecoding, backend: GuidedBackend) -> Self {
        let key = guided.key(backend);
        let value = guided.to_value();
        self.with_extra(key, value)
    }
}
