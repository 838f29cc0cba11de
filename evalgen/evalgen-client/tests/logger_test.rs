use evalgen_client::{EvalgenClientConfig, EvalgenClientService};
use evalgen_core::{BoxError, GenerateClient, MockGenerateClient};
use evalgen_core::contracts::{ChatMessage, GenerateRequest, ModelOutput, OneOrMany};
use evalgen_core::logging::{RequestLogger, TracingRequestLogger};
use std::sync::{Arc, Mutex};
use serde_json::Value;
use tracing_test::traced_test;

#[derive(Debug, Default)]
struct TestLogger {
    logs: Arc<Mutex<Vec<String>>>,
}
impl RequestLogger for TestLogger {
    fn log_request(&self, cid: Option<&str>, model: &str, _json: Value) {
        let mut logs = self.logs.lock().unwrap();
        logs.push(format!("REQ: cid={:?}, model={}", cid, model));
    }
    fn log_response(&self, cid: Option<&str>, model: &str, _json: Value, _usage: Option<Value>) {
        let mut logs = self.logs.lock().unwrap();
        logs.push(format!("RES: cid={:?}, model={}", cid, model));
    }
    fn log_error(&self, cid: Option<&str>, model: &str, error: &str) {
        let mut logs = self.logs.lock().unwrap();
        logs.push(format!("ERR: cid={:?}, model={}, error={}", cid, model, error));
    }
}

fn request(model: &str) -> GenerateRequest {
    GenerateRequest {
        model: model.to_string(),
        correlation_id: Some("cid1".to_string()),
        input: OneOrMany::One(ChatMessage::user("white?")),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_logger_integration() {
    let logs = Arc::new(Mutex::new(Vec::new()));
    let logger = Arc::new(TestLogger { logs: logs.clone() });

    let config = EvalgenClientConfig {
        logger: Some(logger),
        ..Default::default()
    };
    let service = EvalgenClientService::new(config);

    let mut mock = MockGenerateClient::new();
    mock.expect_generate()
        .withf(|req| req.model == "model")
        .returning(|req| Ok(ModelOutput::from_content(req.model.clone(), "{}")));
    service.add_client("mock", Arc::new(mock)).await;

    let output = service.generate(&request("mock::model")).await.unwrap();
    assert_eq!(output.model, "model");

    let l = logs.lock().unwrap();
    assert!(l.contains(&"REQ: cid=Some(\"cid1\"), model=mock::model".to_string()));
    assert!(l.contains(&"RES: cid=Some(\"cid1\"), model=mock::model".to_string()));
}

#[tokio::test]
async fn test_logger_records_errors() {
    let logs = Arc::new(Mutex::new(Vec::new()));
    let service = EvalgenClientService::new(EvalgenClientConfig {
        logger: Some(Arc::new(TestLogger { logs: logs.clone() })),
        ..Default::default()
    });

    let mut mock = MockGenerateClient::new();
    mock.expect_generate()
        .returning(|_| Err::<ModelOutput, BoxError>("backend rejected grammar".into()));
    service.add_client("failing", Arc::new(mock)).await;

    assert!(service.generate(&request("failing::m")).await.is_err());

    let l = logs.lock().unwrap();
    assert!(l.contains(&"ERR: cid=Some(\"cid1\"), model=failing::m, error=backend rejected grammar".to_string()));
    assert!(!l.iter().any(|entry| entry.starts_with("RES:")));
}

#[tokio::test]
#[traced_test]
async fn test_tracing_logger_emits_events() {
    let service = EvalgenClientService::new(EvalgenClientConfig {
        logger: Some(Arc::new(TracingRequestLogger)),
        ..Default::default()
    });

    let mut mock = MockGenerateClient::new();
    mock.expect_generate()
        .returning(|_| Ok(ModelOutput::from_content("m", "ok")));
    service.add_client("mock", Arc::new(mock)).await;

    service.generate(&request("mock::m")).await.unwrap();

    assert!(logs_contain("generate request"));
    assert!(logs_contain("generate response"));
}
