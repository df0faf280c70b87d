// All prompt templates and response schemas for the content provider.
// Schemas follow the Gemini `responseSchema` subset (OBJECT / ARRAY / STRING / INTEGER).

use serde_json::{json, Value};

/// Topic list prompt. Replace `{role}` before sending.
pub const TOPICS_PROMPT_TEMPLATE: &str = "Dado el rol de ingeniería de software de '{role}', \
    genera una lista de 5 a 7 temas técnicos esenciales para la preparación de entrevistas. \
    Responde con un array JSON de strings.";

/// Concept explanation prompt. Replace `{topic}` and `{role}` before sending.
pub const EXPLANATION_PROMPT_TEMPLATE: &str = r#"Explica el concepto técnico de '{topic}' para una entrevista de '{role}'. Proporciona:
1. Una definición clara.
2. Una explicación detallada.
3. Una lista de 3 a 5 conceptos clave o ideas principales.
4. Una lista de 2 a 3 casos de uso prácticos o ejemplos del mundo real.
5. Un ejemplo de código conciso en un lenguaje relevante para el rol.
6. Una lista de 2 a 3 recursos (links) para un estudio más profundo."#;

/// Question generation prompt. Replace `{count}`, `{role}`, `{topics}`.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = "Crea {count} preguntas de entrevista de opción \
    múltiple para un '{role}' centrándote en los siguientes temas: {topics}. Cada pregunta \
    debe tener exactamente 4 opciones y una única respuesta correcta, indicada por su índice \
    (0 a 3).";

/// Feedback prompt. Replace `{role}`, `{score}`, `{incorrect}`.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = "Un usuario que se prepara para una entrevista de \
    '{role}' obtuvo una puntuación de {score}%. Sus respuestas incorrectas estaban relacionadas \
    con estas preguntas: {incorrect}. Proporciona retroalimentación personalizada. Identifica \
    sus posibles fortalezas basándote en la puntuación. Señala las áreas de mejora a partir de \
    las respuestas incorrectas. Sugiere recursos específicos para estudiar las áreas débiles.";

/// Career suggestion prompt. Replace `{role}`.
pub const CAREERS_PROMPT_TEMPLATE: &str = "Basado en las habilidades para un '{role}', sugiere \
    3 roles de trabajo relacionados y de alta demanda en el mercado actual. Para cada rol, \
    proporciona una breve descripción y explica por qué es una carrera relevante y bien \
    remunerada.";

pub fn topics_prompt(role: &str) -> String {
    TOPICS_PROMPT_TEMPLATE.replace("{role}", role)
}

pub fn explanation_prompt(topic: &str, role: &str) -> String {
    EXPLANATION_PROMPT_TEMPLATE
        .replace("{topic}", topic)
        .replace("{role}", role)
}

pub fn questions_prompt(role: &str, topics: &[String], count: u32) -> String {
    QUESTIONS_PROMPT_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{role}", role)
        .replace("{topics}", &topics.join(", "))
}

/// `incorrect` is the raw text of the missed questions; it stands in for the
/// topics the user should reinforce.
pub fn feedback_prompt(role: &str, score: u8, incorrect: &[&str]) -> String {
    FEEDBACK_PROMPT_TEMPLATE
        .replace("{role}", role)
        .replace("{score}", &score.to_string())
        .replace("{incorrect}", &incorrect.join(", "))
}

pub fn careers_prompt(role: &str) -> String {
    CAREERS_PROMPT_TEMPLATE.replace("{role}", role)
}

// ────────────────────────────────────────────────────────────────────────────
// Response schemas
// ────────────────────────────────────────────────────────────────────────────

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

pub fn topics_schema() -> Value {
    string_array()
}

pub fn explanation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "definition": { "type": "STRING" },
            "details": { "type": "STRING" },
            "keyConcepts": string_array(),
            "useCases": string_array(),
            "codeExample": { "type": "STRING" },
            "resources": string_array()
        },
        "required": ["definition", "details", "keyConcepts", "useCases", "resources"]
    })
}

pub fn questions_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "options": string_array(),
                "correctAnswerIndex": { "type": "INTEGER" }
            },
            "required": ["question", "options", "correctAnswerIndex"]
        }
    })
}

pub fn feedback_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "strengths": { "type": "STRING" },
            "areasToImprove": { "type": "STRING" },
            "suggestedResources": string_array()
        },
        "required": ["strengths", "areasToImprove", "suggestedResources"]
    })
}

pub fn careers_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "role": { "type": "STRING" },
                "description": { "type": "STRING" },
                "relevance": { "type": "STRING" }
            },
            "required": ["role", "description", "relevance"]
        }
    })
}
