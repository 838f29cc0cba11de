use serde::{Deserialize, Serialize};

/// A message part. Only text parts are exchanged with providers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

impl Default for Content {
    fn default() -> Self {
        Content::Text { text: String::new() }
    }
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        let Content::Text { text } = self;
        text
    }
}
