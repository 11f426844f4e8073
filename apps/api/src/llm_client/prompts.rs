// Shared prompt fragments used across gateway prompts.
// Mode-specific templates live in workflow/prompts.rs.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every prompt that rewrites an existing resume.
pub const FIDELITY_INSTRUCTION: &str = "\
    CRITICAL: Never invent employers, titles, dates, degrees, or metrics that are not \
    present in the input resume. Rephrase, reorder, and emphasise; do not fabricate. \
    Keep every section and item `id` and `visible` flag exactly as given.";
