use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Study material for one topic. Produced by the content provider and passed
/// through to the guided-review screen without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub definition: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_example: Option<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

impl Explanation {
    /// Substituted when the explanation fetch for a topic fails.
    pub fn placeholder() -> Self {
        Self {
            definition: "Explanation not available.".to_string(),
            details: String::new(),
            key_concepts: vec![],
            use_cases: vec![],
            code_example: None,
            resources: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    pub explanation: Explanation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub strengths: String,
    pub areas_to_improve: String,
    #[serde(default)]
    pub suggested_resources: Vec<String>,
}

impl Feedback {
    pub const NOT_AVAILABLE: &'static str = "not available";

    /// Substituted when feedback generation fails so the interview can still finish.
    pub fn placeholder() -> Self {
        Self {
            strengths: Self::NOT_AVAILABLE.to_string(),
            areas_to_improve: Self::NOT_AVAILABLE.to_string(),
            suggested_resources: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerSuggestion {
    pub role: String,
    pub description: String,
    pub relevance: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Questions
// ────────────────────────────────────────────────────────────────────────────

/// A question exactly as the model returned it. Nothing about its shape is trusted
/// until it has been converted into a [`Question`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer_index: i64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedQuestion {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("expected {expected} options, got {0}", expected = Question::OPTION_COUNT)]
    WrongOptionCount(usize),

    #[error("correct answer index {0} is out of range")]
    CorrectIndexOutOfRange(i64),
}

/// A multiple-choice question with exactly four options.
///
/// `user_answer_index` can only be set once; see [`Question::record_answer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    options: [String; 4],
    correct_answer_index: usize,
    user_answer_index: Option<usize>,
}

impl Question {
    pub const OPTION_COUNT: usize = 4;

    pub fn new(
        prompt: impl Into<String>,
        options: [String; 4],
        correct_answer_index: usize,
    ) -> Result<Self, MalformedQuestion> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(MalformedQuestion::EmptyPrompt);
        }
        if correct_answer_index >= Self::OPTION_COUNT {
            return Err(MalformedQuestion::CorrectIndexOutOfRange(
                correct_answer_index as i64,
            ));
        }
        Ok(Self {
            prompt,
            options,
            correct_answer_index,
            user_answer_index: None,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String; 4] {
        &self.options
    }

    pub fn correct_answer_index(&self) -> usize {
        self.correct_answer_index
    }

    pub fn user_answer_index(&self) -> Option<usize> {
        self.user_answer_index
    }

    pub fn is_answered(&self) -> bool {
        self.user_answer_index.is_some()
    }

    /// True only when an answer was recorded and it matches the correct option.
    pub fn is_correct(&self) -> bool {
        self.user_answer_index == Some(self.correct_answer_index)
    }

    /// Records the user's answer. First answer wins: returns `false` and leaves the
    /// question untouched when it was already answered. Callers validate the range.
    pub(crate) fn record_answer(&mut self, option_index: usize) -> bool {
        if self.user_answer_index.is_some() {
            return false;
        }
        self.user_answer_index = Some(option_index);
        true
    }
}

impl TryFrom<GeneratedQuestion> for Question {
    type Error = MalformedQuestion;

    fn try_from(raw: GeneratedQuestion) -> Result<Self, Self::Error> {
        let option_count = raw.options.len();
        let options: [String; 4] = raw
            .options
            .try_into()
            .map_err(|_| MalformedQuestion::WrongOptionCount(option_count))?;
        let correct = usize::try_from(raw.correct_answer_index)
            .map_err(|_| MalformedQuestion::CorrectIndexOutOfRange(raw.correct_answer_index))?;
        Question::new(raw.question, options, correct)
    }
}

/// Converts model output into validated questions, dropping malformed ones and
/// keeping at most `limit`.
pub fn accept_questions(raw: Vec<GeneratedQuestion>, limit: usize) -> Vec<Question> {
    let mut accepted = Vec::with_capacity(raw.len().min(limit));
    for (index, generated) in raw.into_iter().enumerate() {
        if accepted.len() == limit {
            break;
        }
        match Question::try_from(generated) {
            Ok(question) => accepted.push(question),
            Err(e) => warn!("Dropping generated question #{index}: {e}"),
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [String; 4] {
        ["A", "B", "C", "D"].map(String::from)
    }

    fn generated(options: &[&str], correct: i64) -> GeneratedQuestion {
        GeneratedQuestion {
            question: "What does an index speed up?".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer_index: correct,
        }
    }

    #[test]
    fn test_explanation_deserializes_without_optional_fields() {
        let json = r#"{
            "definition": "A B-tree keeps keys sorted",
            "details": "Nodes hold many keys",
            "keyConcepts": ["fan-out"],
            "useCases": ["database indexes"],
            "resources": ["https://example.com/btree"]
        }"#;
        let explanation: Explanation = serde_json::from_str(json).unwrap();
        assert_eq!(explanation.key_concepts, vec!["fan-out"]);
        assert!(explanation.code_example.is_none());
    }

    #[test]
    fn test_placeholder_explanation_is_empty_beyond_definition() {
        let placeholder = Explanation::placeholder();
        assert!(!placeholder.definition.is_empty());
        assert!(placeholder.key_concepts.is_empty());
        assert!(placeholder.resources.is_empty());
    }

    #[test]
    fn test_feedback_uses_camel_case_contract() {
        let json = r#"{"strengths": "Solid basics", "areasToImprove": "Caching", "suggestedResources": ["book"]}"#;
        let feedback: Feedback = serde_json::from_str(json).unwrap();
        assert_eq!(feedback.areas_to_improve, "Caching");
        assert_eq!(feedback.suggested_resources.len(), 1);
    }

    #[test]
    fn test_placeholder_feedback() {
        let feedback = Feedback::placeholder();
        assert_eq!(feedback.strengths, "not available");
        assert_eq!(feedback.areas_to_improve, "not available");
        assert!(feedback.suggested_resources.is_empty());
    }

    #[test]
    fn test_question_rejects_out_of_range_correct_index() {
        assert_eq!(
            Question::new("Q", options(), 4),
            Err(MalformedQuestion::CorrectIndexOutOfRange(4))
        );
    }

    #[test]
    fn test_question_rejects_blank_prompt() {
        assert_eq!(
            Question::new("  ", options(), 0),
            Err(MalformedQuestion::EmptyPrompt)
        );
    }

    #[test]
    fn test_first_answer_wins() {
        let mut q = Question::new("Q", options(), 2).unwrap();
        assert!(q.record_answer(1));
        assert!(!q.record_answer(2));
        assert_eq!(q.user_answer_index(), Some(1));
        assert!(!q.is_correct());
    }

    #[test]
    fn test_unanswered_question_is_never_correct() {
        let q = Question::new("Q", options(), 0).unwrap();
        assert!(!q.is_answered());
        assert!(!q.is_correct());
    }

    #[test]
    fn test_generated_question_with_three_options_is_malformed() {
        let result = Question::try_from(generated(&["a", "b", "c"], 0));
        assert_eq!(result, Err(MalformedQuestion::WrongOptionCount(3)));
    }

    #[test]
    fn test_generated_question_with_negative_index_is_malformed() {
        let result = Question::try_from(generated(&["a", "b", "c", "d"], -1));
        assert_eq!(result, Err(MalformedQuestion::CorrectIndexOutOfRange(-1)));
    }

    #[test]
    fn test_generated_question_from_model_json() {
        let json = r#"{"question": "Which is O(1)?", "options": ["hash lookup", "sort", "scan", "bfs"], "correctAnswerIndex": 0}"#;
        let raw: GeneratedQuestion = serde_json::from_str(json).unwrap();
        let q = Question::try_from(raw).unwrap();
        assert_eq!(q.prompt(), "Which is O(1)?");
        assert_eq!(q.options()[0], "hash lookup");
        assert_eq!(q.correct_answer_index(), 0);
        assert_eq!(q.user_answer_index(), None);
    }

    #[test]
    fn test_accept_questions_drops_malformed_and_truncates() {
        let raw = vec![
            generated(&["a", "b", "c", "d"], 1),
            generated(&["a", "b"], 0),
            generated(&["a", "b", "c", "d"], 9),
            generated(&["a", "b", "c", "d"], 3),
            generated(&["a", "b", "c", "d"], 0),
        ];
        let accepted = accept_questions(raw, 2);
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].correct_answer_index(), 1);
        assert_eq!(accepted[1].correct_answer_index(), 3);
    }
}
