use std::fmt;

use evalgen_core::contracts::{ModelOutput, ResponseSchema};
use serde::{Deserialize, Serialize};

use crate::dataset::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreValue {
    #[serde(rename = "C")]
    Correct,
    #[serde(rename = "I")]
    Incorrect,
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Correct => f.write_str("C"),
            ScoreValue::Incorrect => f.write_str("I"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub value: ScoreValue,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Score {
    pub fn correct(answer: impl Into<String>) -> Self {
        Self {
            value: ScoreValue::Correct,
            answer: Some(answer.into()),
            explanation: None,
        }
    }

    pub fn incorrect(answer: Option<String>, explanation: impl Into<String>) -> Self {
        Self {
            value: ScoreValue::Incorrect,
            answer,
            explanation: Some(explanation.into()),
        }
    }

    pub fn is_correct(&self) -> bool {
        self.value == ScoreValue::Correct
    }
}

/// Grades a model output against a sample.
///
/// Scorers never fail: output that cannot be interpreted is graded
/// `Incorrect` with an explanation.
pub trait Scorer: Send + Sync {
    fn score(&self, output: &ModelOutput, sample: &Sample) -> Score;
}

/// Correct when the completion is JSON conforming to the schema, regardless of
/// the target. Useful for checking whether a backend honoured the schema.
pub struct SchemaScorer {
    schema: ResponseSchema,
}

impl SchemaScorer {
    pub fn new(schema: ResponseSchema) -> Self {
        Self { schema }
    }
}

impl Scorer for SchemaScorer {
    fn score(&self, output: &ModelOutput, _sample: &Sample) -> Score {
        let completion = output.completion();
        let value: serde_json::Value = match serde_json::from_str(&completion) {
            Ok(value) => value,
            Err(e) => return Score::incorrect(None, format!("completion is not JSON: {e}")),
        };

        match self.schema.validate_instance(&value) {
            Ok(()) => Score::correct(completion),
            Err(e) => Score::incorrect(Some(completion), e.to_string()),
        }
    }
}
