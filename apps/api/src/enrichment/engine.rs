//! Enrichment Engine: turns (rating, review) into the three stored artifacts.
//!
//! Flow: for each artifact kind → fill template → TextGenerator::generate →
//!       on failure substitute the kind's fallback → persist all three.
//!
//! The three generations share nothing and run concurrently. A failure in one
//! never affects the others. Generated text is accepted as-is (already trimmed
//! by the client); only structured harness output is validated.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::enrichment::prompts::{
    ACTION_PROMPT_TEMPLATE, RESPONSE_PROMPT_TEMPLATE, SUMMARY_PROMPT_TEMPLATE,
};
use crate::llm_client::{GenerationOutcome, GenerationParams, TextGenerator};
use crate::models::submission::NewSubmission;
use crate::store::SubmissionStore;

/// Characters of the review quoted by the summary fallback.
const SUMMARY_QUOTE_CHARS: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Artifact configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Customer-facing reply.
    Response,
    /// Internal summary.
    Summary,
    /// Internal recommended action.
    Action,
}

/// Deterministic text used when generation fails or is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    ThankReviewer,
    QuoteReview { max_chars: usize },
    /// ≤2 escalates, 3 monitors, ≥4 shares the praise. Independent of review text.
    TriageByRating,
}

impl FallbackPolicy {
    pub fn render(self, rating: u8, review: &str) -> String {
        match self {
            FallbackPolicy::ThankReviewer => {
                format!("Thank you for your {rating}-star review! We appreciate your feedback.")
            }
            FallbackPolicy::QuoteReview { max_chars } => {
                format!("User rated {rating} stars. Review: {}", truncate(review, max_chars))
            }
            FallbackPolicy::TriageByRating => match rating {
                0..=2 => "Priority follow-up required. Contact customer within 24 hours.",
                3 => "Monitor for patterns. Consider process improvements.",
                _ => "Positive feedback. Share with team.",
            }
            .to_string(),
        }
    }
}

/// Everything that distinguishes one artifact's generation from another's.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactSpec {
    pub template: &'static str,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub fallback: FallbackPolicy,
}

impl ArtifactKind {
    pub fn spec(self) -> ArtifactSpec {
        match self {
            ArtifactKind::Response => ArtifactSpec {
                template: RESPONSE_PROMPT_TEMPLATE,
                max_output_tokens: 150,
                temperature: 0.7,
                fallback: FallbackPolicy::ThankReviewer,
            },
            ArtifactKind::Summary => ArtifactSpec {
                template: SUMMARY_PROMPT_TEMPLATE,
                max_output_tokens: 80,
                temperature: 0.3,
                fallback: FallbackPolicy::QuoteReview {
                    max_chars: SUMMARY_QUOTE_CHARS,
                },
            },
            ArtifactKind::Action => ArtifactSpec {
                template: ACTION_PROMPT_TEMPLATE,
                max_output_tokens: 100,
                temperature: 0.5,
                fallback: FallbackPolicy::TriageByRating,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Response => "response",
            ArtifactKind::Summary => "summary",
            ArtifactKind::Action => "recommended_action",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub text: String,
    pub used_fallback: bool,
}

/// The three artifacts for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enrichment {
    pub response: String,
    pub summary: String,
    pub action: String,
}

/// What the submitter gets back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub id: i64,
    pub ai_response: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Enricher {
    generator: Arc<dyn TextGenerator>,
}

impl Enricher {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn is_live(&self) -> bool {
        self.generator.is_live()
    }

    /// Generates one artifact, substituting its fallback on any failure.
    pub async fn generate_artifact(
        &self,
        kind: ArtifactKind,
        rating: u8,
        review: &str,
    ) -> GeneratedArtifact {
        let spec = kind.spec();
        let prompt = build_prompt(spec.template, rating, review);
        let params = GenerationParams {
            max_output_tokens: spec.max_output_tokens,
            temperature: spec.temperature,
            timeout: None,
        };

        match self.generator.generate(&prompt, params).await {
            GenerationOutcome::Generated(text) => GeneratedArtifact {
                text,
                used_fallback: false,
            },
            GenerationOutcome::Failed(reason) => {
                if self.generator.is_live() {
                    warn!("{} generation failed, using fallback: {reason}", kind.label());
                } else {
                    debug!("{} generation disabled, using fallback", kind.label());
                }
                GeneratedArtifact {
                    text: spec.fallback.render(rating, review),
                    used_fallback: true,
                }
            }
        }
    }

    /// Produces all three artifacts. Never fails: each falls back independently.
    pub async fn enrich(&self, rating: u8, review: &str) -> Enrichment {
        let (response, summary, action) = tokio::join!(
            self.generate_artifact(ArtifactKind::Response, rating, review),
            self.generate_artifact(ArtifactKind::Summary, rating, review),
            self.generate_artifact(ArtifactKind::Action, rating, review),
        );

        let fallbacks = [&response, &summary, &action]
            .iter()
            .filter(|a| a.used_fallback)
            .count();
        debug!("Enriched {rating}-star review ({fallbacks}/3 fallbacks)");

        Enrichment {
            response: response.text,
            summary: summary.text,
            action: action.text,
        }
    }

    /// Enriches a validated submission and stores it. Storage errors propagate.
    pub async fn enrich_and_store(
        &self,
        store: &SubmissionStore,
        rating: u8,
        review: &str,
    ) -> sqlx::Result<SubmissionReceipt> {
        let enrichment = self.enrich(rating, review).await;

        let id = store
            .insert(&NewSubmission {
                rating,
                review: review.to_string(),
                ai_response: enrichment.response.clone(),
                ai_summary: enrichment.summary,
                ai_recommended_action: enrichment.action,
            })
            .await?;

        info!("Submission {id} enriched and stored");
        Ok(SubmissionReceipt {
            id,
            ai_response: enrichment.response,
        })
    }
}

fn build_prompt(template: &str, rating: u8, review: &str) -> String {
    template
        .replace("{rating}", &rating.to_string())
        .replace("{review}", review)
}

/// Keeps the first `max_chars` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
