//! RGB color task: the model answers with a JSON color object that is compared
//! to a `"red,green,blue"` target.

use evalgen_core::contracts::{ModelOutput, ResponseSchema, SchemaError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dataset::Sample;
use crate::scorer::{Score, Scorer};

/// Closed object: the generated schema carries `additionalProperties: false`,
/// which strict structured output requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Target format, e.g. `255,255,255`.
    pub fn to_target(&self) -> String {
        format!("{},{},{}", self.red, self.green, self.blue)
    }
}

pub fn color_schema() -> Result<ResponseSchema, SchemaError> {
    ResponseSchema::for_type::<Color>("color")
}

pub fn colors_dataset() -> Vec<Sample> {
    [
        ("white", "255,255,255"),
        ("black", "0,0,0"),
        ("red", "255,0,0"),
        ("blue", "0,0,255"),
        ("yellow", "255,255,0"),
        ("cyan", "0,255,255"),
        ("magenta", "255,0,255"),
    ]
    .into_iter()
    .map(|(name, target)| {
        Sample::new(name, format!("What is the RGB color for {name}?"), target)
    })
    .collect()
}

/// Parses the completion as a [`Color`] and compares it to the target.
#[derive(Debug, Default)]
pub struct RgbScorer;

impl Scorer for RgbScorer {
    fn score(&self, output: &ModelOutput, sample: &Sample) -> Score {
        let completion = output.completion();
        match serde_json::from_str::<Color>(&completion) {
            Ok(color) => {
                let answer = color.to_target();
                if answer == sample.target.trim() {
                    Score::correct(answer)
                } else {
                    Score::incorrect(
                        Some(answer.clone()),
                        format!("expected {}, got {}", sample.target.trim(), answer),
                    )
                }
            }
            Err(e) => {
                let mut explanation = format!("Error parsing response: {e}");
                if let Some(error) = &output.error {
                    explanation.push_str(&format!(" (provider error: {error})"));
                }
                Score::incorrect(None, explanation)
            }
        }
    }
}
