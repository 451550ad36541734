use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One stored feedback submission. Rows are append-only: never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SubmissionRow {
    pub id: i64,
    pub rating: i64,
    pub review: String,
    pub ai_response: String,
    pub ai_summary: String,
    pub ai_recommended_action: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller; `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub rating: u8,
    pub review: String,
    pub ai_response: String,
    pub ai_summary: String,
    pub ai_recommended_action: String,
}

/// Aggregate view served to the analytics dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_submissions: i64,
    /// Rounded to 2 decimals; 0.0 when the table is empty.
    pub average_rating: f64,
    /// rating -> count, only ratings that occur.
    pub rating_distribution: BTreeMap<i64, i64>,
}
