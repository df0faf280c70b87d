// Content generation: topics, explanations, questions, feedback, career suggestions.
// All LLM calls go through llm_client; nothing here talks HTTP directly.

pub mod generator;
pub mod models;
pub mod prompts;
