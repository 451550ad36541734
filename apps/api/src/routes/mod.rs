pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::enrichment::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        .route("/api/submit", post(handlers::handle_submit))
        .route("/api/submissions", get(handlers::handle_list_submissions))
        .route("/api/submissions/:id", get(handlers::handle_get_submission))
        .route("/api/analytics", get(handlers::handle_analytics))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::config::GenerationConfig;
    use crate::enrichment::Enricher;
    use crate::llm_client::LlmClient;
    use crate::store::SubmissionStore;

    async fn app() -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = SqlitePoolOptions::new()
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(dir.path().join("api.db"))
                    .create_if_missing(true),
            )
            .await
            .unwrap();
        let store = SubmissionStore::open(pool).await.unwrap();
        let llm = LlmClient::new(GenerationConfig::offline()).unwrap();
        let state = AppState {
            store,
            enricher: Enricher::new(Arc::new(llm)),
        };
        (build_router(state), dir)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn submit(body: Value) -> Request<Body> {
        Request::post("/api/submit")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_fallback_mode() {
        let (app, _dir) = app().await;
        let (status, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["generation_mode"], "fallback");
    }

    #[tokio::test]
    async fn test_submit_then_read_back() {
        let (app, _dir) = app().await;

        let (status, body) = send(&app, submit(json!({"rating": 2, "review": "Slow"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
        assert_eq!(
            body["ai_response"],
            "Thank you for your 2-star review! We appreciate your feedback."
        );

        send(&app, submit(json!({"rating": 5, "review": "Superb"}))).await;

        let (_, list) = send(&app, get("/api/submissions")).await;
        let submissions = list["submissions"].as_array().unwrap();
        assert_eq!(submissions.len(), 2);
        assert_eq!(submissions[0]["review"], "Superb");
        assert!(submissions[1]["ai_recommended_action"]
            .as_str()
            .unwrap()
            .starts_with("Priority follow-up"));

        let (status, one) = send(&app, get("/api/submissions/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(one["review"], "Slow");

        let (_, analytics) = send(&app, get("/api/analytics")).await;
        assert_eq!(analytics["total_submissions"], 2);
        assert_eq!(analytics["average_rating"], 3.5);
        assert_eq!(analytics["rating_distribution"]["2"], 1);
        assert_eq!(analytics["rating_distribution"]["5"], 1);
    }

    #[tokio::test]
    async fn test_invalid_submission_is_rejected_before_storage() {
        let (app, _dir) = app().await;

        let (status, body) = send(&app, submit(json!({"rating": 9, "review": "??"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (_, analytics) = send(&app, get("/api/analytics")).await;
        assert_eq!(analytics["total_submissions"], 0);
        assert_eq!(analytics["average_rating"], 0.0);
        assert_eq!(analytics["rating_distribution"], json!({}));
    }

    #[tokio::test]
    async fn test_malformed_body_gets_validation_error_envelope() {
        let (app, _dir) = app().await;

        for body in [
            json!({"rating": 3}),
            json!({"rating": 3.5, "review": "ok"}),
            json!({"rating": "five", "review": "ok"}),
        ] {
            let (status, error) = send(&app, submit(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
            assert!(!error["error"]["message"].as_str().unwrap().is_empty());
        }

        let not_json = Request::post("/api/submit")
            .header("content-type", "application/json")
            .body(Body::from("rating=3"))
            .unwrap();
        let (status, error) = send(&app, not_json).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["error"]["code"], "VALIDATION_ERROR");

        let (_, analytics) = send(&app, get("/api/analytics")).await;
        assert_eq!(analytics["total_submissions"], 0);
    }

    #[tokio::test]
    async fn test_unknown_submission_is_not_found() {
        let (app, _dir) = app().await;
        let (status, body) = send(&app, get("/api/submissions/99")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
