use evalgen_core::contracts::{
    ChatMessage, GenerateRequest, GenerationConfig, OneOrMany, ResponseSchema, StopReason,
};
use evalgen_provider_google::contracts::models::{GoogleGenerateResponse, GoogleInstructRequest};
use serde_json::json;

fn color_request(config: Option<GenerationConfig>) -> GenerateRequest {
    GenerateRequest {
        model: "gemini-2.0-flash".to_string(),
        input: OneOrMany::Many(vec![
            ChatMessage::system("Answer with an RGB color."),
            ChatMessage::user("What is the RGB value for white?"),
            ChatMessage::assistant("{\"red\":255,\"green\":255,\"blue\":255}"),
            ChatMessage::user("And black?"),
        ]),
        generation_config: config,
        ..Default::default()
    }
}

#[test]
fn test_mapping_roles_and_system_instruction() {
    let google_request = GoogleInstructRequest::from(&color_request(None));

    let system = google_request.system_instruction.expect("Missing system instruction");
    assert_eq!(system.parts[0].text.as_deref(), Some("Answer with an RGB color."));
    assert_eq!(google_request.contents.len(), 3);
    assert_eq!(google_request.contents[1].role, "model");
    assert!(google_request.generation_config.is_none());
}

#[test]
fn test_mapping_response_schema_sends_schema_only() {
    let schema = ResponseSchema::new("color", json!({
        "type": "object",
        "properties": {"red": {"type": "integer"}}
    }))
    .unwrap()
    .with_description("An RGB color")
    .with_strict(true);

    let config = GenerationConfig {
        temperature: Some(0.0),
        max_tokens: Some(64),
        ..Default::default()
    }
    .with_response_schema(schema)
    .with_extra("guided_choice", json!(["a"]));

    let google_request = GoogleInstructRequest::from(&color_request(Some(config)));
    let body = serde_json::to_value(&google_request).unwrap();
    let generation_config = &body["generationConfig"];

    assert_eq!(generation_config["responseMimeType"], json!("application/json"));
    assert_eq!(generation_config["responseSchema"]["properties"]["red"]["type"], json!("integer"));
    assert_eq!(generation_config["maxOutputTokens"], json!(64));
    assert!(generation_config.get("strict").is_none());
    assert!(!body.to_string().contains("An RGB color"));
    assert!(body.get("guided_choice").is_none());
}

#[test]
fn test_mapping_without_schema_has_no_mime_type() {
    let config = GenerationConfig { temperature: Some(0.5), ..Default::default() };
    let google_request = GoogleInstructRequest::from(&color_request(Some(config)));
    let generation_config = google_request.generation_config.expect("Missing generation config");

    assert!(generation_config.response_mime_type.is_none());
    assert!(generation_config.response_schema.is_none());
}

#[test]
fn test_mapping_response() {
    let response: GoogleGenerateResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "{\"red\":0,"}, {"text": "\"green\":0,\"blue\":0}"}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 8, "totalTokenCount": 18},
        "modelVersion": "gemini-2.0-flash-001"
    }))
    .unwrap();

    let output = response.to_view("gemini-2.0-flash");

    assert_eq!(output.model, "gemini-2.0-flash-001");
    assert_eq!(output.completion(), "{\"red\":0,\"green\":0,\"blue\":0}");
    assert_eq!(output.stop_reason(), StopReason::Stop);
    assert_eq!(output.usage.unwrap().output_tokens, 8);
}

#[test]
fn test_mapping_blocked_prompt() {
    let response: GoogleGenerateResponse = serde_json::from_value(json!({
        "promptFeedback": {"blockReason": "SAFETY"}
    }))
    .unwrap();

    let output = response.to_view("gemini-2.0-flash");

    assert!(output.is_empty());
    assert_eq!(output.model, "gemini-2.0-flash");
    assert_eq!(output.error.as_deref(), Some("prompt blocked: SAFETY"));
}

#[test]
fn test_mapping_schema_to_supported_subset() {
    let schema = ResponseSchema::new("color", json!({
        "title": "Color",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "red": {"type": "integer", "format": "uint8", "minimum": 0, "maximum": 255},
            "shades": {
                "type": "array",
                "items": {"type": "object", "additionalProperties": false, "properties": {"name": {"type": "string"}}}
            },
            "count": {"type": "integer", "format": "int32"}
        },
        "required": ["red"]
    }))
    .unwrap();

    let config = GenerationConfig::default().with_response_schema(schema);
    let google_request = GoogleInstructRequest::from(&color_request(Some(config)));
    let sent = google_request.generation_config.unwrap().response_schema.unwrap();

    assert!(sent.get("title").is_none());
    assert!(sent.get("additionalProperties").is_none());
    assert_eq!(sent["required"], json!(["red"]));
    assert_eq!(sent["properties"]["red"], json!({"type": "integer", "minimum": 0, "maximum": 255}));
    assert_eq!(sent["properties"]["count"]["format"], json!("int32"));
    let item = &sent["properties"]["shades"]["items"];
    assert!(item.get("additionalProperties").is_none());
    assert_eq!(item["properties"]["name"]["type"], json!("string"));
}
