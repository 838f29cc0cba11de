use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of guided decoding directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidedFormat {
    Choice,
    Regex,
    Grammar,
}

/// Serving backend receiving the directive through `extra_body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidedBackend {
    Vllm,
    Sglang,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown guided decoding {kind}: '{value}'")]
pub struct UnknownGuidedOption {
    pub kind: &'static str,
    pub value: String,
}

/// Request body key each backend uses for a directive.
///
/// | Format  | vLLM           | SGLang |
/// |---------|----------------|--------|
/// | Choice  | guided_choice  | choice |
/// | Regex   | guided_regex   | regex  |
/// | Grammar | guided_grammar | ebnf   |
pub fn guided_key(format: GuidedFormat, backend: GuidedBackend) -> &'static str {
    match (format, backend) {
        (GuidedFormat::Choice, GuidedBackend::Vllm) => "guided_choice",
        (GuidedFormat::Regex, GuidedBackend::Vllm) => "guided_regex",
        (GuidedFormat::Grammar, GuidedBackend::Vllm) => "guided_grammar",
        (GuidedFormat::Choice, GuidedBackend::Sglang) => "choice",
        (GuidedFormat::Regex, GuidedBackend::Sglang) => "regex",
        (GuidedFormat::Grammar, GuidedBackend::Sglang) => "ebnf",
    }
}

impl FromStr for GuidedFormat {
    type Err = UnknownGuidedOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "choice" => Ok(GuidedFormat::Choice),
            "regex" => Ok(GuidedFormat::Regex),
            "grammar" => Ok(GuidedFormat::Grammar),
            _ => Err(UnknownGuidedOption { kind: "format", value: s.to_string() }),
        }
    }
}

impl FromStr for GuidedBackend {
    type Err = UnknownGuidedOption;

    // "a"/"b" follow the column names of the key table.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vllm" | "a" => Ok(GuidedBackend::Vllm),
            "sglang" | "b" => Ok(GuidedBackend::Sglang),
            _ => Err(UnknownGuidedOption { kind: "backend", value: s.to_string() }),
        }
    }
}

impl fmt::Display for GuidedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuidedFormat::Choice => f.write_str("choice"),
            GuidedFormat::Regex => f.write_str("regex"),
            GuidedFormat::Grammar => f.write_str("grammar"),
        }
    }
}

impl fmt::Display for GuidedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuidedBackend::Vllm => f.write_str("vllm"),
            GuidedBackend::Sglang => f.write_str("sglang"),
        }
    }
}

/// A guided decoding directive.
///
/// Values are forwarded untouched; the backend owns parsing of the regex or
/// grammar and rejects or ignores what it does not understand.
#[derive(Debug, Clone, PartialEq)]
pub enum GuidedDecoding {
    Choice(Vec<String>),
    Regex(String),
    Grammar(String),
}

impl GuidedDecoding {
    pub fn format(&self) -> GuidedFormat {
        match self {
            GuidedDecoding::Choice(_) => GuidedFormat::Choice,
            GuidedDecoding::Regex(_) => GuidedFormat::Regex,
            GuidedDecoding::Grammar(_) => GuidedFormat::Grammar,
        }
    }

    pub fn key(&self, backend: GuidedBackend) -> &'static str {
        guided_key(self.format(), backend)
    }

    pub fn to_value(&self) -> Value {
        match self {
            GuidedDecoding::Choice(choices) => {
                Value::Array(choices.iter().cloned().map(Value::String).collect())
            }
            GuidedDecoding::Regex(pattern) => Value::String(pattern.clone()),
            GuidedDecoding::Grammar(grammar) => Value::String(grammar.clone()),
        }
    }

    pub fn into_extra_body(self, backend: GuidedBackend) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert(self.key(backend).to_string(), self.to_value());
        body
    }
}
