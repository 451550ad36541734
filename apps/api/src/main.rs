use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use feedback_api::config::Config;
use feedback_api::db::create_pool;
use feedback_api::enrichment::Enricher;
use feedback_api::llm_client::LlmClient;
use feedback_api::routes::build_router;
use feedback_api::state::AppState;
use feedback_api::store::SubmissionStore;
use feedback_api::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    telemetry::init(&config.rust_log);

    info!("Starting Feedback API v{}", env!("CARGO_PKG_VERSION"));

    // Store handle is created once and shared by every request.
    let pool = create_pool(&config.database_url).await?;
    let store = SubmissionStore::open(pool).await?;
    info!("Submission store ready");

    let llm = LlmClient::new(config.generation.clone())?;
    if config.generation.is_live() {
        info!("LLM client initialized (model: {})", llm.model());
    } else {
        info!("No GEMINI_API_KEY set: AI fields use deterministic fallbacks");
    }

    let state = AppState {
        store,
        enricher: Enricher::new(Arc::new(llm)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // dashboards are served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
