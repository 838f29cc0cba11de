use async_trait::async_trait;

use crate::contracts::{GenerateRequest, ModelOutput};
pub mod contracts;
pub mod logging;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A model provider able to run a single generation request.
///
/// Implementations map the provider-neutral [`GenerateRequest`] (including its
/// `response_schema` and `extra_body`) onto their own wire format.
#[mockall::automock]
#[async_trait]
pub trait GenerateClient: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelOutput, BoxError>;
}
