use evalgen_core::contracts::{
    ChatMessage, CompletionChoice, Content, GenerateRequest, ModelOutput, ModelUsage, OneOrMany,
    StopReason,
};
use serde::{Serialize, Deserialize};

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct GoogleInstructRequest {
    pub contents: Vec<GoogleContent>,

    #[serde(rename = "system_instruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GoogleContent>,

    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GoogleGenerationConfig>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct GoogleContent {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<GooglePart>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct GooglePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// `generationConfig`; the schema is carried as `responseSchema` and the
/// remaining [`evalgen_core::contracts::ResponseSchema`] fields have no
/// counterpart here.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoogleGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

impl GooglePart {
    pub fn from_content(content: &Content) -> GooglePart {
        GooglePart {
            text: Some(content.as_text().to_string()),
        }
    }
}

/// Keywords of the OpenAPI schema subset accepted by `responseSchema`.
const GOOGLE_SCHEMA_KEYS: &[&str] = &[
    "type", "format", "description", "nullable", "enum", "items",
    "minItems", "maxItems", "properties", "required", "minProperties",
    "maxProperties", "minLength", "maxLength", "pattern", "minimum", "maximum",
    "anyOf", "propertyOrdering", "default", "example",
];

/// Formats `responseSchema` understands; anything else is dropped.
const GOOGLE_SCHEMA_FORMATS: &[&str] = &["int32", "int64", "float", "double", "enum", "date-time"];

/// Rewrites a JSON Schema into the subset Gemini accepts.
///
/// Unsupported keywords (`$schema`, `additionalProperties`, `$defs`, ...) and
/// unknown formats are removed. Property names are kept as they are.
pub fn to_google_schema(schema: &serde_json::Value) -> serde_json::Value {
    use serde_json::{Map, Value};

    let Value::Object(obj) = schema else {
        return schema.clone();
    };

    let mut out = Map::new();
    for (key, value) in obj {
        if !GOOGLE_SCHEMA_KEYS.contains(&key.as_str()) {
            continue;
        }
        let value = match (key.as_str(), value) {
            ("format", Value::String(format)) if !GOOGLE_SCHEMA_FORMATS.contains(&format.as_str()) => continue,
            ("properties", Value::Object(props)) => Value::Object(
                props.iter().map(|(name, prop)| (name.clone(), to_google_schema(prop))).collect(),
            ),
            ("items", item) => to_google_schema(item),
            ("anyOf", Value::Array(variants)) => Value::Array(variants.iter().map(to_google_schema).collect()),
            (_, other) => other.clone(),
        };
        out.insert(key.clone(), value);
    }
    Value::Object(out)
}

impl GoogleInstructRequest {
    pub fn add_content(&mut self, msg: ChatMessage) {
        let parts: Vec<GooglePart> = msg
            .content
            .as_ref()
            .map(|c| c.iter().map(GooglePart::from_content).collect())
            .unwrap_or_default();

        if parts.is_empty() {
            return;
        }

        if msg.role == "system" {
            self.system_instruction = Some(GoogleContent {
                role: "system".to_owned(),
                parts,
            });
        } else {
            self.contents.push(GoogleContent {
                role: to_google_role(&msg.role),
                parts,
            });
        }
    }

    pub fn from(source: &GenerateRequest) -> GoogleInstructRequest {
        let schema = source.response_schema();

        let generation_config = source.generation_config.as_ref().map(|gc| GoogleGenerationConfig {
            temperature: gc.temperature,
            max_output_tokens: gc.max_tokens,
            top_p: gc.top_p,
            top_k: gc.top_k,
            seed: gc.seed,
            response_mime_type: schema.map(|_| "application/json".to_string()),
            response_schema: schema.map(|s| to_google_schema(&s.schema)),
        });

        let mut request = GoogleInstructRequest {
            contents: vec![],
            system_instruction: None,
            generation_config,
        };
        for msg in source.messages() {
            request.add_content(msg);
        }
        request
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GoogleGenerateResponse {
    #[serde(default)]
    pub candidates: Vec<GoogleCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<GoogleUsageMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<GooglePromptFeedback>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GooglePromptFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCandidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<GoogleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoogleUsageMetadata {
    #[serde(default)]
    pub prompt_token_count: usize,
    #[serde(default)]
    pub candidates_token_count: usize,
    #[serde(default)]
    pub total_token_count: usize,
}

impl GoogleGenerateResponse {
    pub fn to_view(self, model: &str) -> ModelOutput {
        let choices = self.candidates.into_iter().map(|candidate| {
            let text: String = candidate
                .content
                .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
                .unwrap_or_default();
            CompletionChoice {
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: Some(OneOrMany::One(Content::Text { text })),
                },
                stop_reason: candidate
                    .finish_reason
                    .as_deref()
                    .map(StopReason::from_provider)
                    .unwrap_or_default(),
            }
        }).collect();

        ModelOutput {
            model: self.model_version.unwrap_or_else(|| model.to_string()),
            choices,
            usage: self.usage_metadata.map(|u| ModelUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            external_id: self.response_id,
            error: self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|reason| format!("prompt blocked: {reason}")),
        }
    }
}

pub fn to_google_role(input: &str) -> String {
    match input {
        "assistant" => "model".to_owned(),
        _ => input.to_string(),
    }
}
