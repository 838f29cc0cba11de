pub mod contracts;
pub mod openai_client;
