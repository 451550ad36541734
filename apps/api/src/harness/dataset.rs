//! Synthetic labeled reviews. No external data; a seed reproduces the set.

use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

const STAR_VALUES: [u8; 5] = [1, 2, 3, 4, 5];
const STAR_WEIGHTS: [u32; 5] = [10, 10, 20, 30, 30];

const POSITIVE_PHRASES: &[&str] = &[
    "absolutely loved it",
    "highly recommend",
    "five stars",
    "will come again",
    "perfect experience",
    "delicious",
    "superb service",
];

const NEUTRAL_PHRASES: &[&str] = &[
    "it was okay",
    "average",
    "nothing special",
    "decent for the price",
    "not bad",
    "could be better",
];

const NEGATIVE_PHRASES: &[&str] = &[
    "terrible experience",
    "do not recommend",
    "one star",
    "never coming back",
    "awful",
    "horrible service",
    "very disappointing",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticSample {
    /// 1-based, sequential within one run.
    pub id: usize,
    pub review: String,
    /// Ground truth.
    pub stars: u8,
}

/// Draws `n` samples. Stars follow the fixed 10/10/20/30/30 weighting; review
/// text is a canned phrase from the star's sentiment bucket plus that bucket's frame.
pub fn generate_samples<R: Rng + ?Sized>(
    n: usize,
    rng: &mut R,
) -> Result<Vec<SyntheticSample>, WeightedError> {
    let star_dist = WeightedIndex::new(STAR_WEIGHTS)?;

    let samples = (1..=n)
        .map(|id| {
            let stars = STAR_VALUES[star_dist.sample(rng)];
            SyntheticSample {
                id,
                review: synthesize_review(stars, rng),
                stars,
            }
        })
        .collect();
    Ok(samples)
}

fn synthesize_review<R: Rng + ?Sized>(stars: u8, rng: &mut R) -> String {
    let (phrases, frame) = match stars {
        s if s >= 4 => (
            POSITIVE_PHRASES,
            "the meal was great and staff were friendly.",
        ),
        3 => (NEUTRAL_PHRASES, "the food was okay but service slow."),
        _ => (NEGATIVE_PHRASES, "I had a bad time and won't recommend."),
    };
    let phrase = phrases[rng.gen_range(0..phrases.len())];
    format!("{phrase} - {frame}")
}
