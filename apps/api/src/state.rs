use crate::enrichment::Enricher;
use crate::store::SubmissionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: SubmissionStore,
    pub enricher: Enricher,
}
