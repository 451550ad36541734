//! AI-enriched feedback collection plus a prompt-strategy evaluation harness.

pub mod config;
pub mod db;
pub mod enrichment;
pub mod errors;
pub mod harness;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod telemetry;
