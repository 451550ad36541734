//! Axum route handlers for the submission and analytics API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::enrichment::engine::SubmissionReceipt;
use crate::errors::AppError;
use crate::models::submission::{Analytics, SubmissionRow};
use crate::state::AppState;

pub const MAX_REVIEW_CHARS: usize = 5000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub rating: i64,
    pub review: String,
}

#[derive(Debug, Serialize)]
pub struct SubmissionListResponse {
    pub submissions: Vec<SubmissionRow>,
}

/// Boundary validation: rating in 1..=5, review non-blank and bounded.
pub fn validate_submission(request: &SubmitRequest) -> Result<u8, AppError> {
    let rating = u8::try_from(request.rating)
        .ok()
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| {
            AppError::Validation(format!(
                "rating must be between 1 and 5, got {}",
                request.rating
            ))
        })?;

    if request.review.trim().is_empty() {
        return Err(AppError::Validation("review cannot be empty".to_string()));
    }
    if request.review.chars().count() > MAX_REVIEW_CHARS {
        return Err(AppError::Validation(format!(
            "review must be at most {MAX_REVIEW_CHARS} characters"
        )));
    }

    Ok(rating)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/submit
///
/// Enriches the review with the three AI artifacts, stores it, and returns the
/// customer-facing reply. Bodies that do not deserialize are validation errors.
pub async fn handle_submit(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmissionReceipt>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let rating = validate_submission(&request)?;

    let receipt = state
        .enricher
        .enrich_and_store(&state.store, rating, &request.review)
        .await?;

    Ok(Json(receipt))
}

/// GET /api/submissions
pub async fn handle_list_submissions(
    State(state): State<AppState>,
) -> Result<Json<SubmissionListResponse>, AppError> {
    let submissions = state.store.list_all().await?;
    Ok(Json(SubmissionListResponse { submissions }))
}

/// GET /api/submissions/:id
pub async fn handle_get_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SubmissionRow>, AppError> {
    let submission = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Submission {id} not found")))?;
    Ok(Json(submission))
}

/// GET /api/analytics
pub async fn handle_analytics(State(state): State<AppState>) -> Result<Json<Analytics>, AppError> {
    Ok(Json(state.store.aggregate().await?))
}
