use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use async_trait::async_trait;

use evalgen_core::{
    BoxError,
    GenerateClient,
    contracts::{GenerateRequest, ModelOutput},
    logging::RequestLogger,
};
#[cfg(feature = "ollama")]
use evalgen_provider_ollama::ollama_client::EvalgenClientOllama;
#[cfg(feature = "google")]
use evalgen_provider_google::google_client::EvalgenClientGoogle;
#[cfg(feature = "openai")]
use evalgen_provider_openai::openai_client::EvalgenClientOpenAI;

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MISTRAL_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_VLLM_URL: &str = "http://localhost:8000/v1";
pub const DEFAULT_SGLANG_URL: &str = "http://localhost:30000/v1";
pub const DEFAULT_GOOGLE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Configuration for the evalgen client service.
/// Holds the endpoints and credentials of each provider; unset URLs fall back
/// to the public defaults.
#[derive(Debug, Clone, Default)]
pub struct EvalgenClientConfig {
    /// URL for the Ollama service (e.g., "http://localhost:11434").
    #[cfg(feature = "ollama")]
    pub ollama_url: Option<String>,
    /// Base URL for the Gemini API.
    #[cfg(feature = "google")]
    pub google_api_url: Option<String>,
    /// API key for the Gemini API.
    #[cfg(feature = "google")]
    pub google_api_key: Option<String>,
    /// API URL for OpenAI (e.g., "https://api.openai.com/v1").
    #[cfg(feature = "openai")]
    pub openai_api_url: Option<String>,
    /// API key for OpenAI.
    #[cfg(feature = "openai")]
    pub openai_api_key: Option<String>,
    #[cfg(feature = "openai")]
    pub mistral_api_url: Option<String>,
    #[cfg(feature = "openai")]
    pub mistral_api_key: Option<String>,
    /// OpenAI-compatible endpoint of a vLLM server.
    #[cfg(feature = "openai")]
    pub vllm_url: Option<String>,
    #[cfg(feature = "openai")]
    pub vllm_api_key: Option<String>,
    /// OpenAI-compatible endpoint of an SGLang server.
    #[cfg(feature = "openai")]
    pub sglang_url: Option<String>,
    #[cfg(feature = "openai")]
    pub sglang_api_key: Option<String>,
    /// Optional logger for requests and responses.
    pub logger: Option<Arc<dyn RequestLogger>>,
}

impl EvalgenClientConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    /// Empty values count as unset.
    #[allow(unused_variables, unused_mut)]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        #[cfg(feature = "ollama")]
        {
            config.ollama_url = var("OLLAMA_URL");
        }
        #[cfg(feature = "google")]
        {
            config.google_api_url = var("GOOGLE_API_URL");
            config.google_api_key = var("GOOGLE_API_KEY");
        }
        #[cfg(feature = "openai")]
        {
            config.openai_api_url = var("OPENAI_API_URL");
            config.openai_api_key = var("OPENAI_API_KEY");
            config.mistral_api_url = var("MISTRAL_API_URL");
            config.mistral_api_key = var("MISTRAL_API_KEY");
            config.vllm_url = var("VLLM_URL");
            config.vllm_api_key = var("VLLM_API_KEY");
            config.sglang_url = var("SGLANG_URL");
            config.sglang_api_key = var("SGLANG_API_KEY");
        }
        config
    }
}

/// A service that routes generation requests to multiple providers.
///
/// `EvalgenClientService` implements the `GenerateClient` trait and uses a
/// provider-prefix routing mechanism (e.g., "vllm::meta-llama/Llama-3.1-8B-Instruct")
/// to delegate calls to the appropriate provider implementation.
pub struct EvalgenClientService {
    config: EvalgenClientConfig,
    clients: RwLock<HashMap<String, Arc<dyn GenerateClient>>>,
    logger: Option<Arc<dyn RequestLogger>>,
}

impl EvalgenClientService {
    /// Creates a new `EvalgenClientService` with the given configuration.
    pub fn new(config: EvalgenClientConfig) -> Self {
        let logger = config.logger.clone();
        Self {
            config,
            clients: RwLock::new(HashMap::new()),
            logger,
        }
    }

    /// Retrieves an existing client for the specified provider or initializes a new one.
    ///
    /// Supported providers: "openai", "mistral", "vllm", "sglang", "google", "ollama".
    pub async fn get_client(&self, provider: &str) -> Result<Arc<dyn GenerateClient>, BoxError> {
        {
            let clients = self.clients.read().await;
            if let Some(client) = clients.get(provider) {
                return Ok(client.clone());
            }
        }

        let client: Arc<dyn GenerateClient> = match provider {
            #[cfg(feature = "ollama")]
            "ollama" => {
                let url = self.config.ollama_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL);
                Arc::new(EvalgenClientOllama::new(url.to_string()))
            }
            #[cfg(feature = "google")]
            "google" => {
                let url = self.config.google_api_url.as_deref().unwrap_or(DEFAULT_GOOGLE_URL);
                let key = self.config.google_api_key.as_deref().ok_or("Google API Key not configured")?;
                Arc::new(EvalgenClientGoogle::new(url.to_string(), key.to_string()))
            }
            #[cfg(feature = "openai")]
            "openai" => {
                let url = self.config.openai_api_url.as_deref().unwrap_or(DEFAULT_OPENAI_URL);
                let key = self.config.openai_api_key.as_deref().ok_or("OpenAI API Key not configured")?;
                Arc::new(EvalgenClientOpenAI::new(url.to_string(), Some(key.to_string())))
            }
            #[cfg(feature = "openai")]
            "mistral" => {
                let url = self.config.mistral_api_url.as_deref().unwrap_or(DEFAULT_MISTRAL_URL);
                let key = self.config.mistral_api_key.as_deref().ok_or("Mistral API Key not configured")?;
                Arc::new(EvalgenClientOpenAI::new(url.to_string(), Some(key.to_string())).with_provider_name("Mistral"))
            }
            #[cfg(feature = "openai")]
            "vllm" => {
                let url = self.config.vllm_url.as_deref().unwrap_or(DEFAULT_VLLM_URL);
                Arc::new(EvalgenClientOpenAI::new(url.to_string(), self.config.vllm_api_key.clone()).with_provider_name("vLLM"))
            }
            #[cfg(feature = "openai")]
            "sglang" => {
                let url = self.config.sglang_url.as_deref().unwrap_or(DEFAULT_SGLANG_URL);
                Arc::new(EvalgenClientOpenAI::new(url.to_string(), self.config.sglang_api_key.clone()).with_provider_name("SGLang"))
            }
            _ => return Err(format!("Unknown or disabled provider: {}", provider).into()),
        };

        tracing::debug!(provider, "initialized provider client");

        let mut clients = self.clients.write().await;
        let client = clients.entry(provider.to_string()).or_insert(client).clone();
        Ok(client)
    }

    /// Adds a client for a specific provider.
    pub async fn add_client(&self, provider: &str, client: Arc<dyn GenerateClient>) {
        let mut clients = self.clients.write().await;
        clients.insert(provider.to_string(), client);
    }

    /// Helper to parse a model string into (provider, model_name).
    /// The expected format is "provider::model_name".
    pub fn parse_model(model: &str) -> Result<(&str, &str), BoxError> {
        match model.split_once("::") {
            Some((provider, name)) if !provider.is_empty() && !name.is_empty() => Ok((provider, name)),
            _ => Err("Model name must be in the format 'provider::model'".into()),
        }
    }
}

#[async_trait]
impl GenerateClient for EvalgenClientService {
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelOutput, BoxError> {
        let (provider, actual_model) = Self::parse_model(&request.model)?;
        let client = self.get_client(provider).await?;

        if let Some(logger) = &self.logger {
            logger.log_request(
                request.correlation_id.as_deref(),
                &request.model,
                serde_json::to_value(request).unwrap_or(serde_json::Value::Null),
            );
        }

        let mut req = request.clone();
        req.model = actual_model.to_string();
        let response = match client.generate(&req).await {
            Ok(response) => response,
            Err(e) => {
                if let Some(logger) = &self.logger {
                    logger.log_error(request.correlation_id.as_deref(), &request.model, &e.to_string());
                }
                return Err(e);
            }
        };

        if let Some(logger) = &self.logger {
            logger.log_response(
                request.correlation_id.as_deref(),
                &request.model,
                serde_json::to_value(&response).unwrap_or(serde_json::Value::Null),
                response.usage.as_ref().and_then(|u| serde_json::to_value(u).ok()),
            );
        }

        Ok(response)
    }
}
