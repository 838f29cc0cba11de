//! Evaluation helpers built around schema-constrained model output: datasets,
//! a generate solver, scorers and a concurrent task runner.

pub mod color;
pub mod dataset;
pub mod scorer;
pub mod solver;
pub mod task;

pub use dataset::{DatasetError, Sample};
pub use scorer::{Score, ScoreValue, Scorer, SchemaScorer};
pub use task::{EvalResults, SampleResult, Task, run_task};
