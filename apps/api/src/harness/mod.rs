// Prompt Strategy Harness: compares three star-classification prompts on a
// seeded synthetic dataset. Runs live through llm_client::TextGenerator when a
// credential is configured, otherwise through a deterministic simulator.

pub mod dataset;
pub mod prompts;
pub mod report;
pub mod runner;

pub use dataset::{generate_samples, SyntheticSample};
pub use prompts::Strategy;
pub use runner::{ExecutionMode, StrategyResult, StrategyRun, StrategySummary};
