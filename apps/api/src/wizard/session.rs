//! Session data model.
//!
//! The session is a `Stage` enum whose variants carry exactly the data their screen
//! needs, so a screen can never be reached with a required field unset.
//! `SessionSnapshot` is the flat view of the same data.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::models::{CareerSuggestion, Topic};
use crate::wizard::error::WizardError;
use crate::wizard::interview::{InterviewResult, InterviewRun};

/// Roles offered on the role-selection screen. Free text is accepted as well.
pub const PREDEFINED_ROLES: [&str; 7] = [
    "Desarrollador Backend (Python)",
    "Ingeniero de Machine Learning",
    "Desarrollador Web Full Stack",
    "Ingeniero de Datos",
    "Ingeniero DevOps",
    "Desarrollador Frontend (React, Angular, Vue)",
    "Ingeniero de Software Generalista (estructuras de datos y algoritmos)",
];

/// Interview lengths the user may pick from. The first one is the default.
pub const QUESTION_COUNTS: [u32; 4] = [5, 10, 15, 20];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreenKind {
    Welcome,
    RoleSelection,
    TopicSelection,
    GuidedReview,
    Interview,
    Results,
    CareerSuggestions,
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScreenKind::Welcome => "WELCOME",
            ScreenKind::RoleSelection => "ROLE_SELECTION",
            ScreenKind::TopicSelection => "TOPIC_SELECTION",
            ScreenKind::GuidedReview => "GUIDED_REVIEW",
            ScreenKind::Interview => "INTERVIEW",
            ScreenKind::Results => "RESULTS",
            ScreenKind::CareerSuggestions => "CAREER_SUGGESTIONS",
        };
        f.write_str(name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validated values
// ────────────────────────────────────────────────────────────────────────────

/// Target job role. Surrounding whitespace is trimmed; inner whitespace is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn parse(raw: &str) -> Result<Self, WizardError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WizardError::Validation("role must not be empty".to_string()));
        }
        Ok(Role(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of interview questions, restricted to [`QUESTION_COUNTS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionCount(u32);

impl QuestionCount {
    pub fn new(count: u32) -> Result<Self, WizardError> {
        if QUESTION_COUNTS.contains(&count) {
            Ok(QuestionCount(count))
        } else {
            Err(WizardError::Validation(format!(
                "question count must be one of {QUESTION_COUNTS:?}, got {count}"
            )))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for QuestionCount {
    fn default() -> Self {
        QuestionCount(QUESTION_COUNTS[0])
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stages
// ────────────────────────────────────────────────────────────────────────────

/// Role plus the reviewed topics. Everything from GUIDED_REVIEW onward carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct Briefing {
    pub role: Role,
    pub topics: Vec<Topic>,
}

impl Briefing {
    pub fn topic_titles(&self) -> Vec<String> {
        self.topics.iter().map(|t| t.title.clone()).collect()
    }
}

/// A finished interview. RESULTS and CAREER_SUGGESTIONS carry it.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub briefing: Briefing,
    pub question_count: QuestionCount,
    pub result: InterviewResult,
}

/// Topic list state on TOPIC_SELECTION.
#[derive(Debug, Clone, PartialEq)]
pub enum TopicCatalog {
    Loading,
    Failed(String),
    Offered(Vec<String>),
    /// Explanations for `chosen` are being fetched.
    Explaining {
        offered: Vec<String>,
        chosen: Vec<String>,
    },
}

/// Question state on INTERVIEW.
#[derive(Debug, Clone, PartialEq)]
pub enum InterviewProgress {
    Loading,
    Failed(String),
    Answering(InterviewRun),
    /// All questions are done; feedback is being generated.
    Scoring(InterviewRun),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Unsaved { last_error: Option<String> },
    Saving,
    Saved,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CareerPanel {
    Offered,
    Loading,
    Shown(Vec<CareerSuggestion>),
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Stage {
    #[default]
    Welcome,
    RoleSelection,
    TopicSelection {
        role: Role,
        catalog: TopicCatalog,
    },
    GuidedReview {
        briefing: Briefing,
    },
    Interview {
        briefing: Briefing,
        question_count: QuestionCount,
        progress: InterviewProgress,
    },
    Results {
        assessment: Assessment,
        save: SaveStatus,
    },
    CareerSuggestions {
        assessment: Assessment,
        careers: CareerPanel,
    },
}

impl Stage {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Stage::Welcome => ScreenKind::Welcome,
            Stage::RoleSelection => ScreenKind::RoleSelection,
            Stage::TopicSelection { .. } => ScreenKind::TopicSelection,
            Stage::GuidedReview { .. } => ScreenKind::GuidedReview,
            Stage::Interview { .. } => ScreenKind::Interview,
            Stage::Results { .. } => ScreenKind::Results,
            Stage::CareerSuggestions { .. } => ScreenKind::CareerSuggestions,
        }
    }

    /// True while the screen waits on a collaborator.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Stage::TopicSelection {
                catalog: TopicCatalog::Loading | TopicCatalog::Explaining { .. },
                ..
            } | Stage::Interview {
                progress: InterviewProgress::Loading | InterviewProgress::Scoring(_),
                ..
            } | Stage::Results {
                save: SaveStatus::Saving,
                ..
            } | Stage::CareerSuggestions {
                careers: CareerPanel::Loading,
                ..
            }
        )
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut snapshot = SessionSnapshot::empty(self.kind());
        match self {
            Stage::Welcome | Stage::RoleSelection => {}
            Stage::TopicSelection { role, .. } => {
                snapshot.role = Some(role.to_string());
            }
            Stage::GuidedReview { briefing } => {
                snapshot.fill_briefing(briefing);
            }
            Stage::Interview {
                briefing,
                question_count,
                ..
            } => {
                snapshot.fill_briefing(briefing);
                snapshot.question_count = Some(question_count.get());
            }
            Stage::Results { assessment, .. } | Stage::CareerSuggestions { assessment, .. } => {
                snapshot.fill_briefing(&assessment.briefing);
                snapshot.question_count = Some(assessment.question_count.get());
                snapshot.interview_result = Some(assessment.result.clone());
            }
        }
        snapshot
    }
}

/// Flat view of the session: which fields are populated at this point of the flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub screen: ScreenKind,
    pub role: Option<String>,
    pub topics: Option<Vec<Topic>>,
    pub question_count: Option<u32>,
    pub interview_result: Option<InterviewResult>,
}

impl SessionSnapshot {
    fn empty(screen: ScreenKind) -> Self {
        Self {
            screen,
            role: None,
            topics: None,
            question_count: None,
            interview_result: None,
        }
    }

    fn fill_briefing(&mut self, briefing: &Briefing) {
        self.role = Some(briefing.role.to_string());
        self.topics = Some(briefing.topics.clone());
    }
}
