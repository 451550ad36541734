// Prompt templates for the three enrichment artifacts.
// Replace `{rating}` and `{review}` before sending.

/// Customer-facing reply.
pub const RESPONSE_PROMPT_TEMPLATE: &str = r#"You are a customer service representative. A user submitted a {rating}-star review with the following text:
"{review}"

Write a short, friendly response (2-3 sentences) thanking them and addressing their feedback appropriately."#;

/// Internal one-line summary for the analytics view.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Summarize this customer review in one concise sentence for internal use:
Rating: {rating} stars
Review: "{review}"

Keep it brief and factual."#;

/// Recommended next action for the business.
pub const ACTION_PROMPT_TEMPLATE: &str = r#"Based on this customer review, suggest one specific action for the business (1-2 sentences):
Rating: {rating} stars
Review: "{review}"

Focus on actionable next steps."#;
