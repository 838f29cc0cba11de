use serde_json::Value;
use std::fmt::Debug;

/// Hooks invoked around every routed generation request.
pub trait RequestLogger: Send + Sync + Debug {
    fn log_request(
        &self,
        correlation_id: Option<&str>,
        model: &str,
        request_json: Value,
    );
    fn log_response(
        &self,
        correlation_id: Option<&str>,
        model: &str,
        response_json: Value,
        usage: Option<Value>,
    );
    fn log_error(
        &self,
        correlation_id: Option<&str>,
        model: &str,
        error: &str,
    );
}

#[derive(Debug, Default)]
pub struct TracingRequestLogger;

impl RequestLogger for TracingRequestLogger {
    fn log_request(
        &self,
        correlation_id: Option<&str>,
        model: &str,
        request_json: Value,
    ) {
        let cid = correlation_id.unwrap_or("none");
        tracing::debug!(cid, model, request = %request_json, "generate request");
    }
    fn log_response(
        &self,
        correlation_id: Option<&str>,
        model: &str,
        response_json: Value,
        usage: Option<Value>,
    ) {
        let cid = correlation_id.unwrap_or("none");
        let usage_str = usage.map(|u| u.to_string()).unwrap_or_else(|| "none".to_string());
        tracing::debug!(cid, model, response = %response_json, usage = %usage_str, "generate response");
    }
    fn log_error(
        &self,
        correlation_id: Option<&str>,
        model: &str,
        error: &str,
    ) {
        let cid = correlation_id.unwrap_or("none");
        tracing::warn!(cid, model, error, "generate failed");
    }
}
