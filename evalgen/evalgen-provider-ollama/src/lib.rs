pub mod contracts;
pub mod ollama_client;
