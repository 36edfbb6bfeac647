//! Research analysis prompts.
//!
//! Contains the first-pass and corrective prompt templates for structured
//! research insights extraction.

/// JSON shape both prompts ask the model to return
const RESPONSE_SHAPE: &str = r#"{
    "summary": "...",
    "suggestions": ["...", "..."],
    "relatedTopics": ["...", "..."],
    "methodology": ["...", "..."],
    "gaps": ["...", "..."],
    "citations": ["...", "..."],
    "impact": "...",
    "limitations": ["...", "..."],
    "futureWork": ["...", "..."]
}"#;

/// First-pass analysis prompt
/// Placeholders: {text}, {shape}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the text and return a JSON object. IMPORTANT RULES:
1. Return ONLY a raw JSON object
2. DO NOT use any markdown formatting or code blocks
3. DO NOT add any explanatory text
4. Every field must be present and populated
5. Use "Not available" for empty string fields
6. Use empty arrays [] for empty array fields

Text to analyze: {text}

Return this exact structure (exclude these instructions):
{shape}"#;

/// Corrective prompt used after an incomplete first pass
/// Placeholders: {text}, {shape}
pub const RETRY_PROMPT_TEMPLATE: &str = r#"IMPORTANT: Previous response was incomplete. Analyze the text and return a JSON object with ALL fields populated. Every single field MUST have content:

Text: {text}

Return this exact structure with all fields populated (no instructions in response):
{shape}"#;

/// Build the first-pass analysis prompt
pub fn build_analysis_prompt(text: &str) -> String {
    render(ANALYSIS_PROMPT_TEMPLATE, text)
}

/// Build the corrective retry prompt
pub fn build_retry_prompt(text: &str) -> String {
    render(RETRY_PROMPT_TEMPLATE, text)
}

// Shape goes in first so text containing "{shape}" is left alone.
fn render(template: &str, text: &str) -> String {
    template
        .replace("{shape}", RESPONSE_SHAPE)
        .replacen("{text}", text, 1)
}
