//! Submission Store: append-only SQLite table of enriched submissions.
//!
//! Every operation runs under one async mutex held by the handle, so id
//! assignment and aggregate reads never interleave with another writer.

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::submission::{Analytics, NewSubmission, SubmissionRow};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS submissions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    rating INTEGER NOT NULL,
    review TEXT NOT NULL,
    ai_response TEXT NOT NULL,
    ai_summary TEXT NOT NULL,
    ai_recommended_action TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Handle to the submissions table. Cloning is cheap; clones share the pool and the lock.
#[derive(Clone)]
pub struct SubmissionStore {
    pool: SqlitePool,
    lock: Arc<Mutex<()>>,
}

impl SubmissionStore {
    /// Wraps a pool and creates the table if it does not exist yet.
    pub async fn open(pool: SqlitePool) -> sqlx::Result<Self> {
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self {
            pool,
            lock: Arc::new(Mutex::new(())),
        })
    }

    /// Inserts a submission and returns its newly assigned id.
    pub async fn insert(&self, submission: &NewSubmission) -> sqlx::Result<i64> {
        let _guard = self.lock.lock().await;

        let result = sqlx::query(
            r#"
            INSERT INTO submissions
                (rating, review, ai_response, ai_summary, ai_recommended_action, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(i64::from(submission.rating))
        .bind(&submission.review)
        .bind(&submission.ai_response)
        .bind(&submission.ai_summary)
        .bind(&submission.ai_recommended_action)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!("Stored submission {id} (rating {})", submission.rating);
        Ok(id)
    }

    /// All submissions, newest first.
    pub async fn list_all(&self) -> sqlx::Result<Vec<SubmissionRow>> {
        let _guard = self.lock.lock().await;

        sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT id, rating, review, ai_response, ai_summary, ai_recommended_action, created_at
            FROM submissions
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, id: i64) -> sqlx::Result<Option<SubmissionRow>> {
        let _guard = self.lock.lock().await;

        sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT id, rating, review, ai_response, ai_summary, ai_recommended_action, created_at
            FROM submissions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Total count, mean rating and rating histogram, read in one transaction.
    pub async fn aggregate(&self) -> sqlx::Result<Analytics> {
        let _guard = self.lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let (total, average): (i64, Option<f64>) =
            sqlx::query_as("SELECT COUNT(*), AVG(rating) FROM submissions")
                .fetch_one(&mut *tx)
                .await?;

        let distribution: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT rating, COUNT(*) FROM submissions GROUP BY rating ORDER BY rating",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Analytics {
            total_submissions: total,
            average_rating: round_2dp(average.unwrap_or(0.0)),
            rating_distribution: distribution.into_iter().collect(),
        })
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
