use async_trait::async_trait;
use evalgen_core::{
    BoxError,
    GenerateClient,
    contracts::{GenerateRequest, ModelOutput},
};
use crate::contracts::{GoogleGenerateResponse, GoogleInstructRequest};

/// Gemini `generateContent` client authenticated with an API key.
///
/// Only the schema document of a `ResponseSchema` is sent; `name`,
/// `description` and `strict` are dropped, as is `extra_body`.
#[derive(Clone)]
pub struct EvalgenClientGoogle {
    pub api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl EvalgenClientGoogle {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            api_url,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_url.trim_end_matches('/'), model)
    }
}

#[async_trait]
impl GenerateClient for EvalgenClientGoogle {
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelOutput, BoxError> {
        if let Some(schema) = request.response_schema()
            && (schema.description.is_some() || schema.strict.is_some())
        {
            tracing::debug!(schema = %schema.name, "google: ignoring response schema description/strict");
        }
        if request.extra_body().is_some() {
            tracing::debug!(model = %request.model, "google: ignoring extra_body");
        }

        let google_request = GoogleInstructRequest::from(request);

        let res = self.client.post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&google_request)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let err_text = res.text().await.unwrap_or_default();
            return Err(format!("Google API error ({}): {}", status, err_text).into());
        }

        let response: GoogleGenerateResponse = res.json().await?;
        Ok(response.to_view(&request.model))
    }
}
