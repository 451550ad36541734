// Shared prompt fragments.
// Each caller that needs generation defines its own prompts.rs alongside it;
// this file holds only the cross-cutting pieces.

/// Schema instruction appended to every star-classification prompt.
pub const STAR_JSON_SCHEMA: &str =
    "a JSON object with keys 'predicted_stars' (integer 1-5) and 'explanation' (short string)";

/// Closing line for prompts whose answer must be machine-readable.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with JSON only.";
