use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use evalgen_client::{EvalgenClientConfig, EvalgenClientService};
use evalgen_core::logging::TracingRequestLogger;
use evalgen_eval::color::{RgbScorer, colors_dataset};
use evalgen_eval::dataset::load_jsonl;
use evalgen_eval::{Task, run_task};
use evalgen_cli::options::{Args, build_config};
use evalgen_cli::report::render_table;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    EvalgenClientService::parse_model(&args.model).map_err(|e| anyhow!("{}", e))?;
    let config = build_config(&args)?;

    let dataset = match &args.dataset {
        Some(path) => load_jsonl(path)?,
        None => colors_dataset(),
    };
    if dataset.is_empty() {
        return Err(anyhow!("dataset has no samples"));
    }

    let task = Task {
        name: "rgb_color".to_string(),
        dataset,
        config,
        scorer: Arc::new(RgbScorer),
    };

    let mut client_config = EvalgenClientConfig::from_env();
    client_config.logger = Some(Arc::new(TracingRequestLogger));
    let client = EvalgenClientService::new(client_config);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Evaluating {} samples on {}...", task.dataset.len(), args.model));
    pb.enable_steady_tick(Duration::from_millis(100));

    let results = run_task(&client, &args.model, &task, args.max_connections).await;
    pb.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("{} {}\n", "Task:".green().bold(), results.task);
        print!("{}", render_table(&results));
    }

    Ok(())
}
