use serde::{Serialize, Deserialize};
use crate::contracts::OneOrMany;

use super::Content;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<OneOrMany<Content>>,
}

impl Default for ChatMessage {
    fn default() -> Self {
        Self {
            role: "user".to_string(),
            content: Some(OneOrMany::One(Content::default())),
        }
    }
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Some(OneOrMany::One(Content::text(text))),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new("system", text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new("user", text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new("assistant", text)
    }

    /// Concatenated text parts.
    pub fn text(&self) -> String {
        let mut text = String::new();
        if let Some(content) = &self.content {
            for item in content.iter() {
                text.push_str(item.as_text());
            }
        }
        text
    }
}
