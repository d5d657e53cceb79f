// Shared prompt fragments. Each feature module keeps its own prompts.rs;
// this file holds only cross-cutting instructions.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Persona shared by every résumé-facing prompt.
pub const CAREER_COACH_SYSTEM: &str =
    "You are an expert resume reviewer, recruiter and career coach.";
