// Shared prompt constants and prompt-building utilities.
// Each call in content::prompts builds on these cross-cutting fragments.

/// System instruction sent with every generation call: the interview-coach persona.
pub const COACH_SYSTEM: &str = "Eres PrepAI, un agente experto en preparación para \
    entrevistas técnicas para ingenieros de software. Tu tono es profesional, motivador \
    y alentador. Proporcionas información clara, concisa y precisa para ayudar a los \
    usuarios a tener éxito. Siempre respondes en español.";

/// Fragment appended to the system instruction to enforce JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "Responde únicamente con JSON válido que cumpla el \
    esquema solicitado. No incluyas texto fuera del JSON ni bloques de código markdown.";

/// Builds the full system instruction for a structured call.
pub fn coach_system() -> String {
    format!("{COACH_SYSTEM} {JSON_ONLY_INSTRUCTION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coach_system_contains_both_fragments() {
        let system = coach_system();
        assert!(system.starts_with(COACH_SYSTEM));
        assert!(system.ends_with(JSON_ONLY_INSTRUCTION));
    }
}
