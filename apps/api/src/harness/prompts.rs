//! The three prompting strategies under comparison.

use serde::Serialize;

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, STAR_JSON_SCHEMA};

/// Fixed labeled exemplars for the few-shot strategy: 5, 3 and 1 stars.
pub const FEW_SHOT_EXEMPLARS: [(&str, u8); 3] = [
    ("Absolutely loved it, will come again.", 5),
    ("It was okay, nothing special.", 3),
    ("Terrible experience, very disappointing.", 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Baseline,
    FewShot,
    ChainOfThought,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Baseline,
        Strategy::FewShot,
        Strategy::ChainOfThought,
    ];

    /// Stable name used in output file names and summaries.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Baseline => "baseline",
            Strategy::FewShot => "few_shot",
            Strategy::ChainOfThought => "chain_of_thought",
        }
    }

    pub fn build_prompt(self, review: &str) -> String {
        match self {
            Strategy::Baseline => format!(
                "Classify the following Yelp review into 1-5 stars. \
                 Return only {STAR_JSON_SCHEMA}. Review: \"{review}\"\n\n{JSON_ONLY_INSTRUCTION}"
            ),
            Strategy::FewShot => {
                let examples: String = FEW_SHOT_EXEMPLARS
                    .iter()
                    .map(|(text, stars)| format!("Review: \"{text}\" => {stars} stars\n"))
                    .collect();
                format!(
                    "You are given examples:\n{examples}\n\
                     Now classify the following review into 1-5 stars and return {STAR_JSON_SCHEMA}. \
                     Review: \"{review}\"\n{JSON_ONLY_INSTRUCTION}"
                )
            }
            Strategy::ChainOfThought => format!(
                "Read the review and think step-by-step about the sentiment, then output a JSON object. \
                 Review: \"{review}\"\n\
                 First give a short reasoning, then output {STAR_JSON_SCHEMA}."
            ),
        }
    }
}
