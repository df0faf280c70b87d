//! Scripted collaborators for driver and router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::content::generator::ContentGenerator;
use crate::content::models::{
    CareerSuggestion, Explanation, Feedback, GeneratedQuestion, Question,
};
use crate::llm_client::LlmError;
use crate::results::record::{ResultRecord, SaveOutcome};
use crate::results::webhook::ResultsStore;

fn scripted_failure() -> LlmError {
    LlmError::Api {
        status: 500,
        message: "scripted failure".to_string(),
    }
}

/// A question with `option_count` options whose correct answer is `correct`.
pub fn generated_question(prompt: &str, option_count: usize, correct: i64) -> GeneratedQuestion {
    GeneratedQuestion {
        question: prompt.to_string(),
        options: (0..option_count).map(|i| format!("option {i}")).collect(),
        correct_answer_index: correct,
    }
}

pub struct ScriptedContent {
    pub topics: Vec<String>,
    pub fail_topics: bool,
    /// Held until notified before `list_topics` answers.
    pub topics_gate: Option<Arc<Notify>>,
    pub failing_explanations: Vec<String>,
    pub questions: Vec<GeneratedQuestion>,
    pub fail_feedback: bool,
    /// `(score, missed prompts)` for every feedback call.
    pub feedback_requests: Mutex<Vec<(u8, Vec<String>)>>,
}

impl Default for ScriptedContent {
    fn default() -> Self {
        Self {
            topics: vec!["SQL".into(), "Spark".into(), "Airflow".into()],
            fail_topics: false,
            topics_gate: None,
            failing_explanations: vec![],
            questions: vec![
                generated_question("Q1", 4, 0),
                generated_question("Q2", 4, 0),
                generated_question("Q3", 4, 0),
            ],
            fail_feedback: false,
            feedback_requests: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl ContentGenerator for ScriptedContent {
    async fn list_topics(&self, _role: &str) -> Result<Vec<String>, LlmError> {
        if let Some(gate) = &self.topics_gate {
            gate.notified().await;
        }
        if self.fail_topics {
            return Err(scripted_failure());
        }
        Ok(self.topics.clone())
    }

    async fn explain_concept(&self, topic: &str, _role: &str) -> Result<Explanation, LlmError> {
        if self.failing_explanations.iter().any(|t| t == topic) {
            return Err(scripted_failure());
        }
        Ok(Explanation {
            definition: format!("About {topic}"),
            ..Explanation::placeholder()
        })
    }

    async fn generate_questions(
        &self,
        _role: &str,
        _topics: &[String],
        _count: u32,
    ) -> Result<Vec<GeneratedQuestion>, LlmError> {
        Ok(self.questions.clone())
    }

    async fn generate_feedback(
        &self,
        _role: &str,
        score: u8,
        incorrect: &[Question],
    ) -> Result<Feedback, LlmError> {
        let missed = incorrect.iter().map(|q| q.prompt().to_string()).collect();
        if let Ok(mut requests) = self.feedback_requests.lock() {
            requests.push((score, missed));
        }
        if self.fail_feedback {
            return Err(scripted_failure());
        }
        Ok(Feedback {
            strengths: "Solid SQL".into(),
            areas_to_improve: "Spark tuning".into(),
            suggested_resources: vec![],
        })
    }

    async fn suggest_careers(&self, _role: &str) -> Result<Vec<CareerSuggestion>, LlmError> {
        Ok(vec![CareerSuggestion {
            role: "Data Architect".into(),
            description: "Designs data platforms".into(),
            relevance: "Builds on pipelines".into(),
        }])
    }
}

pub struct RecordingStore {
    outcome: SaveOutcome,
    pub saved: Mutex<Vec<ResultRecord>>,
}

impl RecordingStore {
    pub fn succeeding() -> Self {
        Self {
            outcome: SaveOutcome::saved(),
            saved: Mutex::new(vec![]),
        }
    }

    pub fn failing(outcome: SaveOutcome) -> Self {
        Self {
            outcome,
            saved: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl ResultsStore for RecordingStore {
    async fn save_result(&self, record: &ResultRecord) -> SaveOutcome {
        if let Ok(mut saved) = self.saved.lock() {
            saved.push(record.clone());
        }
        self.outcome.clone()
    }
}
