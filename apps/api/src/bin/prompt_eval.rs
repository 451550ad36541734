//! Prompt-strategy evaluation: baseline vs few-shot vs chain-of-thought on a
//! seeded synthetic review set. Live calls only when GEMINI_API_KEY is set.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use feedback_api::config::GenerationConfig;
use feedback_api::harness::{self, report, ExecutionMode};
use feedback_api::llm_client::LlmClient;
use feedback_api::telemetry;

#[derive(Debug, Parser)]
#[command(name = "prompt-eval", about = "Compare star-rating prompt strategies")]
struct Args {
    /// Number of synthetic reviews to generate.
    #[arg(long, default_value_t = 200)]
    samples: usize,

    /// Seed for the dataset and the simulator.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Where result tables and summary.json are written.
    #[arg(long, default_value = "task1_results")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    telemetry::init(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()));

    let generation = GenerationConfig::from_env()?;
    let llm = LlmClient::new(generation)?;
    let mode = ExecutionMode::for_generator(Arc::new(llm));
    match mode {
        ExecutionMode::Live(_) => {
            info!("GEMINI_API_KEY found: running real LLM calls (be aware of usage costs)")
        }
        ExecutionMode::Simulated => {
            info!("No GEMINI_API_KEY: running simulation, no external calls")
        }
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let samples = harness::generate_samples(args.samples, &mut rng)?;
    info!("Generated {} synthetic samples (seed {})", samples.len(), args.seed);

    let runs = harness::runner::run_all(&samples, &mode, &mut rng).await;
    for run in &runs {
        info!(
            "{}: accuracy={:.3} json_rate={:.3} n={}",
            run.strategy.name(),
            run.summary.accuracy,
            run.summary.json_rate,
            run.summary.n
        );
    }

    let summary_path = report::write_report(&args.out_dir, &runs)?;
    info!("Wrote results to {}", summary_path.display());
    Ok(())
}
