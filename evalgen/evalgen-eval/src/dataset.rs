use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid sample on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One evaluation sample: a prompt and the expected answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    #[serde(default)]
    pub id: String,
    pub input: String,
    pub target: String,
}

impl Sample {
    pub fn new(id: impl Into<String>, input: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            input: input.into(),
            target: target.into(),
        }
    }
}

/// Reads samples from JSON Lines, one object per line.
///
/// Blank lines are skipped. Samples without an `id` get their 1-based line
/// number.
pub fn read_jsonl(reader: impl BufRead) -> Result<Vec<Sample>, DatasetError> {
    let mut samples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut sample: Sample = serde_json::from_str(&line)
            .map_err(|source| DatasetError::Parse { line: idx + 1, source })?;
        if sample.id.is_empty() {
            sample.id = (idx + 1).to_string();
        }
        samples.push(sample);
    }
    Ok(samples)
}

pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Vec<Sample>, DatasetError> {
    let file = File::open(path.as_ref())?;
    let samples = read_jsonl(BufReader::new(file))?;
    tracing::debug!(path = %path.as_ref().display(), count = samples.len(), "loaded dataset");
    Ok(samples)
}
