use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes structured logging. `RUST_LOG` wins when it parses; otherwise
/// this crate's targets log at `default_level`.
pub fn init(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "feedback_api={default_level},prompt_eval={default_level},tower_http={default_level}"
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
