use evalgen_core::contracts::{ChatMessage, GenerateRequest, GenerationConfig, ModelOutput, OneOrMany};
use evalgen_core::{BoxError, GenerateClient};

use crate::dataset::Sample;

pub fn build_request(model: &str, sample: &Sample, config: &GenerationConfig) -> GenerateRequest {
    GenerateRequest {
        model: model.to_string(),
        correlation_id: Some(uuid::Uuid::new_v4().to_string()),
        generation_config: Some(config.clone()),
        input: OneOrMany::One(ChatMessage::user(sample.input.clone())),
    }
}

/// Single generate call for the sample; the config (with its response schema
/// and extra body) is shared read-only between samples.
pub async fn generate(
    client: &dyn GenerateClient,
    model: &str,
    sample: &Sample,
    config: &GenerationConfig,
) -> Result<ModelOutput, BoxError> {
    let request = build_request(model, sample, config);
    client.generate(&request).await
}
