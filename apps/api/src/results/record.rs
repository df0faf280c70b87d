use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::content::models::Topic;
use crate::wizard::interview::InterviewResult;

/// Minimum score (percentage) that counts as passing.
pub const PASSING_SCORE: u8 = 80;

/// Pass/fail label written to the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Aprobado")]
    Passed,
    #[serde(rename = "No Aprobado")]
    NotPassed,
}

impl Verdict {
    pub fn from_score(score: u8) -> Self {
        if score >= PASSING_SCORE {
            Verdict::Passed
        } else {
            Verdict::NotPassed
        }
    }
}

/// One spreadsheet row. Field names are the webhook's contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub timestamp: String,
    pub user_name: String,
    pub email: String,
    pub role: String,
    /// Topic titles joined by ", ".
    pub topics: String,
    pub score: u8,
    pub result: Verdict,
    pub areas_to_reinforce: String,
}

impl ResultRecord {
    pub fn new(
        user_name: &str,
        email: &str,
        role: &str,
        topics: &[Topic],
        interview: &InterviewResult,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            user_name: user_name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            topics: topics
                .iter()
                .map(|t| t.title.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            score: interview.score(),
            result: Verdict::from_score(interview.score()),
            areas_to_reinforce: interview.feedback().areas_to_improve.clone(),
        }
    }
}

/// What the persistence collaborator reports back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SaveOutcome {
    pub fn saved() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
