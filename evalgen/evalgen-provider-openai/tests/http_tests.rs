use evalgen_core::GenerateClient;
use evalgen_core::contracts::{
    ChatMessage, GenerateRequest, GenerationConfig, GuidedBackend, GuidedDecoding, OneOrMany,
    ResponseSchema,
};
use evalgen_provider_openai::openai_client::EvalgenClientOpenAI;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(content: &str) -> Value {
    json!({
        "id": "cmpl-1",
        "object": "chat.completion",
        "created": 1,
        "model": "served-model",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
    })
}

#[tokio::test]
async fn test_sends_response_format_and_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "response_format": {"type": "json_schema", "json_schema": {"name": "color", "strict": true}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{\"red\":0,\"green\":0,\"blue\":0}")))
        .expect(1)
        .mount(&server)
        .await;

    let client = EvalgenClientOpenAI::new(server.uri(), Some("sk-test".to_string()));
    let schema = ResponseSchema::new("color", json!({"type": "object"})).unwrap().with_strict(true);
    let request = GenerateRequest {
        model: "gpt-4o".to_string(),
        input: OneOrMany::One(ChatMessage::user("black?")),
        generation_config: Some(GenerationConfig::default().with_response_schema(schema)),
        ..Default::default()
    };

    let output = client.generate(&request).await.unwrap();
    assert_eq!(output.completion(), "{\"red\":0,\"green\":0,\"blue\":0}");
}

#[tokio::test]
async fn test_extra_body_reaches_backend() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("255,255,255")))
        .mount(&server)
        .await;

    let client = EvalgenClientOpenAI::new(server.uri(), None).with_provider_name("SGLang");
    let config = GenerationConfig::default()
        .with_guided(GuidedDecoding::Regex(r"\d+,\d+,\d+".to_string()), GuidedBackend::Sglang);
    let request = GenerateRequest {
        model: "qwen".to_string(),
        input: OneOrMany::One(ChatMessage::user("white?")),
        generation_config: Some(config),
        ..Default::default()
    };

    client.generate(&request).await.unwrap();

    let received = server.received_requests().await.expect("recording enabled");
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("Authorization").is_none());
    let body: Value = received[0].body_json().unwrap();
    assert_eq!(body["regex"], json!(r"\d+,\d+,\d+"));
    assert!(body.get("guided_regex").is_none());
}

#[tokio::test]
async fn test_backend_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("unsupported grammar"))
        .mount(&server)
        .await;

    let client = EvalgenClientOpenAI::new(server.uri(), None).with_provider_name("vLLM");
    let request = GenerateRequest {
        model: "m".to_string(),
        input: OneOrMany::One(ChatMessage::user("x")),
        ..Default::default()
    };

    let err = client.generate(&request).await.unwrap_err().to_string();
    assert!(err.starts_with("vLLM API error (400"));
    assert!(err.contains("unsupported grammar"));
}
