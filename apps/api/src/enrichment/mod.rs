// Submission enrichment: three independent generations per submission, each
// with a deterministic rating-aware fallback, then persistence.
// All generation goes through llm_client::TextGenerator.

pub mod engine;
pub mod handlers;
pub mod prompts;

pub use engine::{Enricher, Enrichment};
