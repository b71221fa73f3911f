// Cross-cutting prompt fragments. Each caller keeps its own prompts.rs alongside it.

/// Appended to every system prompt whose answer is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
