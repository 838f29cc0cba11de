use std::sync::Arc;

use evalgen_core::GenerateClient;
use evalgen_core::contracts::{GenerationConfig, ModelUsage};
use futures_util::{StreamExt, stream};
use serde::{Deserialize, Serialize};

use crate::dataset::Sample;
use crate::scorer::{Score, Scorer};
use crate::solver;

pub struct Task {
    pub name: String,
    pub dataset: Vec<Sample>,
    pub config: GenerationConfig,
    pub scorer: Arc<dyn Scorer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleResult {
    pub sample_id: String,
    pub target: String,
    pub completion: String,
    pub score: Score,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalResults {
    pub task: String,
    pub model: String,
    pub samples: Vec<SampleResult>,
    pub usage: ModelUsage,
}

impl EvalResults {
    pub fn total(&self) -> usize {
        self.samples.len()
    }

    pub fn correct(&self) -> usize {
        self.samples.iter().filter(|s| s.score.is_correct()).count()
    }

    /// Fraction of correct samples; 0.0 for an empty run.
    pub fn accuracy(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.correct() as f64 / self.total() as f64
    }
}

/// Runs every sample of the task with at most `max_concurrency` requests in
/// flight. Results keep dataset order.
///
/// A failed generate call is graded `Incorrect` with the error as explanation
/// and does not stop the run.
pub async fn run_task(
    client: &dyn GenerateClient,
    model: &str,
    task: &Task,
    max_concurrency: usize,
) -> EvalResults {
    let max_concurrency = max_concurrency.max(1);
    tracing::info!(task = %task.name, model, samples = task.dataset.len(), max_concurrency, "running task");

    let mut scored: Vec<(usize, SampleResult, Option<ModelUsage>)> = stream::iter(task.dataset.iter().enumerate())
        .map(|(idx, sample)| async move {
            let (completion, score, usage) = match solver::generate(client, model, sample, &task.config).await {
                Ok(output) => {
                    let score = task.scorer.score(&output, sample);
                    (output.completion(), score, output.usage)
                }
                Err(e) => {
                    tracing::warn!(sample = %sample.id, error = %e, "generate failed");
                    (String::new(), Score::incorrect(None, format!("generate failed: {e}")), None)
                }
            };
            let result = SampleResult {
                sample_id: sample.id.clone(),
                target: sample.target.clone(),
                completion,
                score,
            };
            (idx, result, usage)
        })
        .buffer_unordered(max_concurrency)
        .collect()
        .await;

    scored.sort_by_key(|(idx, _, _)| *idx);

    let usage = scored
        .iter()
        .filter_map(|(_, _, usage)| *usage)
        .fold(ModelUsage::default(), |acc, u| acc + u);

    EvalResults {
        task: task.name.clone(),
        model: model.to_string(),
        samples: scored.into_iter().map(|(_, result, _)| result).collect(),
        usage,
    }
}
