//! Per-screen view models returned to the client.
//!
//! Correct answers stay hidden during the interview until the question has been
//! answered.

use serde::Serialize;

use crate::content::models::{CareerSuggestion, Feedback, Question, Topic};
use crate::results::record::Verdict;
use crate::wizard::interview::InterviewRun;
use crate::wizard::machine::Wizard;
use crate::wizard::session::{
    CareerPanel, InterviewProgress, QuestionCount, SaveStatus, SessionSnapshot, Stage,
    TopicCatalog, PREDEFINED_ROLES, QUESTION_COUNTS,
};

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub generation: u64,
    pub screen: ScreenView,
    pub session: SessionSnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreenView {
    Welcome,
    RoleSelection {
        predefined_roles: Vec<&'static str>,
    },
    TopicSelection {
        role: String,
        topics: TopicsView,
    },
    GuidedReview {
        role: String,
        topics: Vec<Topic>,
        question_counts: Vec<u32>,
        default_question_count: u32,
    },
    Interview {
        role: String,
        question_count: u32,
        progress: InterviewView,
    },
    Results {
        role: String,
        topics: Vec<String>,
        score: u8,
        passed: bool,
        verdict: Verdict,
        feedback: Feedback,
        review: Vec<QuestionView>,
        save: SaveView,
    },
    CareerSuggestions {
        role: String,
        careers: CareersView,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TopicsView {
    Loading,
    Failed { message: String },
    Offered { topics: Vec<String> },
    Explaining { topics: Vec<String>, chosen: Vec<String> },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InterviewView {
    Loading,
    Failed {
        message: String,
    },
    Answering {
        current_index: usize,
        answered_count: usize,
        total: usize,
        questions: Vec<QuestionView>,
    },
    Scoring {
        answered_count: usize,
        total: usize,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub user_answer_index: Option<usize>,
    /// `None` until the question is answered.
    pub correct_answer_index: Option<usize>,
    pub is_correct: Option<bool>,
}

impl QuestionView {
    fn new(index: usize, question: &Question) -> Self {
        let answered = question.is_answered();
        Self {
            index,
            prompt: question.prompt().to_string(),
            options: question.options().to_vec(),
            user_answer_index: question.user_answer_index(),
            correct_answer_index: answered.then(|| question.correct_answer_index()),
            is_correct: answered.then(|| question.is_correct()),
        }
    }

    /// Review rows always show the correct option, answered or not.
    fn review(index: usize, question: &Question) -> Self {
        Self {
            correct_answer_index: Some(question.correct_answer_index()),
            is_correct: Some(question.is_correct()),
            ..Self::new(index, question)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveView {
    Unsaved { last_error: Option<String> },
    Saving,
    Saved,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CareersView {
    Offered,
    Loading,
    Shown { suggestions: Vec<CareerSuggestion> },
    Unavailable { message: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

pub fn render(wizard: &Wizard) -> SessionView {
    SessionView {
        generation: wizard.generation(),
        screen: render_stage(wizard.stage()),
        session: wizard.snapshot(),
    }
}

fn render_stage(stage: &Stage) -> ScreenView {
    match stage {
        Stage::Welcome => ScreenView::Welcome,
        Stage::RoleSelection => ScreenView::RoleSelection {
            predefined_roles: PREDEFINED_ROLES.to_vec(),
        },
        Stage::TopicSelection { role, catalog } => ScreenView::TopicSelection {
            role: role.to_string(),
            topics: match catalog {
                TopicCatalog::Loading => TopicsView::Loading,
                TopicCatalog::Failed(message) => TopicsView::Failed {
                    message: message.clone(),
                },
                TopicCatalog::Offered(topics) => TopicsView::Offered {
                    topics: topics.clone(),
                },
                TopicCatalog::Explaining { offered, chosen } => TopicsView::Explaining {
                    topics: offered.clone(),
                    chosen: chosen.clone(),
                },
            },
        },
        Stage::GuidedReview { briefing } => ScreenView::GuidedReview {
            role: briefing.role.to_string(),
            topics: briefing.topics.clone(),
            question_counts: QUESTION_COUNTS.to_vec(),
            default_question_count: QuestionCount::default().get(),
        },
        Stage::Interview {
            briefing,
            question_count,
            progress,
        } => ScreenView::Interview {
            role: briefing.role.to_string(),
            question_count: question_count.get(),
            progress: match progress {
                InterviewProgress::Loading => InterviewView::Loading,
                InterviewProgress::Failed(message) => InterviewView::Failed {
                    message: message.clone(),
                },
                InterviewProgress::Answering(run) => answering(run),
                InterviewProgress::Scoring(run) => InterviewView::Scoring {
                    answered_count: run.answered_count(),
                    total: run.questions().len(),
                },
            },
        },
        Stage::Results { assessment, save } => {
            let result = &assessment.result;
            let verdict = Verdict::from_score(result.score());
            ScreenView::Results {
                role: assessment.briefing.role.to_string(),
                topics: assessment.briefing.topic_titles(),
                score: result.score(),
                passed: verdict == Verdict::Passed,
                verdict,
                feedback: result.feedback().clone(),
                review: result
                    .questions()
                    .iter()
                    .enumerate()
                    .map(|(i, q)| QuestionView::review(i, q))
                    .collect(),
                save: match save {
                    SaveStatus::Unsaved { last_error } => SaveView::Unsaved {
                        last_error: last_error.clone(),
                    },
                    SaveStatus::Saving => SaveView::Saving,
                    SaveStatus::Saved => SaveView::Saved,
                },
            }
        }
        Stage::CareerSuggestions {
            assessment,
            careers,
        } => ScreenView::CareerSuggestions {
            role: assessment.briefing.role.to_string(),
            careers: match careers {
                CareerPanel::Offered => CareersView::Offered,
                CareerPanel::Loading => CareersView::Loading,
                CareerPanel::Shown(suggestions) => CareersView::Shown {
                    suggestions: suggestions.clone(),
                },
                CareerPanel::Unavailable(message) => CareersView::Unavailable {
                    message: message.clone(),
                },
            },
        },
    }
}

fn answering(run: &InterviewRun) -> InterviewView {
    InterviewView::Answering {
        current_index: run.current_index(),
        answered_count: run.answered_count(),
        total: run.questions().len(),
        questions: run
            .questions()
            .iter()
            .enumerate()
            .map(|(i, q)| QuestionView::new(i, q))
            .collect(),
    }
}
