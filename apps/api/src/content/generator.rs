//! Content Generation: pluggable, trait-based access to the generative model.
//!
//! Default: `GeminiContentGenerator` (all calls through `llm_client`).
//! Tests swap in scripted fakes.
//!
//! `WizardDriver` holds an `Arc<dyn ContentGenerator>`.

use async_trait::async_trait;
use tracing::info;

use crate::content::models::{CareerSuggestion, Explanation, Feedback, GeneratedQuestion, Question};
use crate::content::prompts;
use crate::llm_client::prompts::coach_system;
use crate::llm_client::{LlmClient, LlmError};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Everything the wizard asks of the generative model.
///
/// Every call may fail. Callers decide whether a failure blocks the screen or is
/// replaced by a placeholder; implementations never substitute on their own.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// 5–7 interview topics for the role.
    async fn list_topics(&self, role: &str) -> Result<Vec<String>, LlmError>;

    async fn explain_concept(&self, topic: &str, role: &str) -> Result<Explanation, LlmError>;

    /// Raw questions; the caller validates shape and truncates to `count`.
    async fn generate_questions(
        &self,
        role: &str,
        topics: &[String],
        count: u32,
    ) -> Result<Vec<GeneratedQuestion>, LlmError>;

    async fn generate_feedback(
        &self,
        role: &str,
        score: u8,
        incorrect: &[Question],
    ) -> Result<Feedback, LlmError>;

    async fn suggest_careers(&self, role: &str) -> Result<Vec<CareerSuggestion>, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiContentGenerator (production)
// ────────────────────────────────────────────────────────────────────────────

pub struct GeminiContentGenerator {
    llm: LlmClient,
    system: String,
}

impl GeminiContentGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            system: coach_system(),
        }
    }
}

#[async_trait]
impl ContentGenerator for GeminiContentGenerator {
    async fn list_topics(&self, role: &str) -> Result<Vec<String>, LlmError> {
        let raw: Vec<String> = self
            .llm
            .call_json(
                &prompts::topics_prompt(role),
                &self.system,
                &prompts::topics_schema(),
            )
            .await?;
        let topics = normalize_topics(raw);
        info!("Generated {} topics for role '{role}'", topics.len());
        Ok(topics)
    }

    async fn explain_concept(&self, topic: &str, role: &str) -> Result<Explanation, LlmError> {
        self.llm
            .call_json(
                &prompts::explanation_prompt(topic, role),
                &self.system,
                &prompts::explanation_schema(),
            )
            .await
    }

    async fn generate_questions(
        &self,
        role: &str,
        topics: &[String],
        count: u32,
    ) -> Result<Vec<GeneratedQuestion>, LlmError> {
        self.llm
            .call_json(
                &prompts::questions_prompt(role, topics, count),
                &self.system,
                &prompts::questions_schema(),
            )
            .await
    }

    async fn generate_feedback(
        &self,
        role: &str,
        score: u8,
        incorrect: &[Question],
    ) -> Result<Feedback, LlmError> {
        let missed = missed_question_texts(incorrect);
        self.llm
            .call_json(
                &prompts::feedback_prompt(role, score, &missed),
                &self.system,
                &prompts::feedback_schema(),
            )
            .await
    }

    async fn suggest_careers(&self, role: &str) -> Result<Vec<CareerSuggestion>, LlmError> {
        self.llm
            .call_json(
                &prompts::careers_prompt(role),
                &self.system,
                &prompts::careers_schema(),
            )
            .await
    }
}

/// Trims titles, drops blanks and collapses duplicates, keeping first-seen order.
fn normalize_topics(raw: Vec<String>) -> Vec<String> {
    let mut topics: Vec<String> = Vec::with_capacity(raw.len());
    for title in raw {
        let title = title.trim();
        if !title.is_empty() && !topics.iter().any(|t| t == title) {
            topics.push(title.to_string());
        }
    }
    topics
}

/// Distinct prompt texts of the missed questions, in interview order.
fn missed_question_texts(incorrect: &[Question]) -> Vec<&str> {
    let mut texts: Vec<&str> = Vec::with_capacity(incorrect.len());
    for question in incorrect {
        if !texts.contains(&question.prompt()) {
            texts.push(question.prompt());
        }
    }
    texts
}
