//! Wizard state machine.
//!
//! `transition` is a pure function `(stage, event) -> (stage, effects)`. `Wizard`
//! owns the single live session, numbers it with a generation, and discards
//! completions that were issued under an older generation.

use chrono::Utc;
use tracing::{debug, info};

use crate::content::models::{CareerSuggestion, Question, Topic};
use crate::results::record::{ResultRecord, SaveOutcome};
use crate::wizard::error::WizardError;
use crate::wizard::interview::{Advance, InterviewResult, InterviewRun};
use crate::wizard::session::{
    Assessment, Briefing, CareerPanel, InterviewProgress, QuestionCount, Role, SaveStatus,
    SessionSnapshot, Stage, TopicCatalog,
};
use crate::wizard::validation::{choose_topics, validate_contact};

// ────────────────────────────────────────────────────────────────────────────
// Events and effects
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // User actions
    Start,
    SelectRole { role: String },
    RetryTopics,
    ChooseTopics { titles: Vec<String> },
    StartInterview { question_count: u32 },
    RetryQuestions,
    RecordAnswer { question_index: usize, option_index: usize },
    Advance,
    SaveProgress { name: String, email: String },
    Proceed,
    ShowCareers,
    Restart,

    // Collaborator completions
    TopicsLoaded(Result<Vec<String>, String>),
    SelectTopics { topics: Vec<Topic> },
    QuestionsLoaded(Result<Vec<Question>, String>),
    Complete { result: InterviewResult },
    SaveCompleted(SaveOutcome),
    CareersLoaded(Result<Vec<CareerSuggestion>, String>),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::SelectRole { .. } => "select_role",
            Event::RetryTopics => "retry_topics",
            Event::ChooseTopics { .. } => "choose_topics",
            Event::StartInterview { .. } => "start_interview",
            Event::RetryQuestions => "retry_questions",
            Event::RecordAnswer { .. } => "record_answer",
            Event::Advance => "advance",
            Event::SaveProgress { .. } => "save_progress",
            Event::Proceed => "proceed",
            Event::ShowCareers => "show_careers",
            Event::Restart => "restart",
            Event::TopicsLoaded(_) => "topics_loaded",
            Event::SelectTopics { .. } => "select_topics",
            Event::QuestionsLoaded(_) => "questions_loaded",
            Event::Complete { .. } => "complete",
            Event::SaveCompleted(_) => "save_completed",
            Event::CareersLoaded(_) => "careers_loaded",
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Event::TopicsLoaded(_)
                | Event::SelectTopics { .. }
                | Event::QuestionsLoaded(_)
                | Event::Complete { .. }
                | Event::SaveCompleted(_)
                | Event::CareersLoaded(_)
        )
    }
}

/// A request the driver must perform. Its completion comes back as an `Event`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ListTopics {
        role: String,
    },
    /// Fan-out: one explanation fetch per title, answered by a single `SelectTopics`.
    ExplainTopics {
        role: String,
        titles: Vec<String>,
    },
    GenerateQuestions {
        role: String,
        topics: Vec<String>,
        count: u32,
    },
    /// Answered by `Complete`.
    GenerateFeedback {
        role: String,
        questions: Vec<Question>,
    },
    SaveResult {
        record: ResultRecord,
    },
    SuggestCareers {
        role: String,
    },
}

/// An effect stamped with the session generation that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub generation: u64,
    pub effect: Effect,
}

/// A refused event. `stage` is the unchanged stage handed back to the caller.
#[derive(Debug)]
pub struct Rejected {
    pub stage: Stage,
    pub error: WizardError,
}

impl Rejected {
    fn new(stage: Stage, error: WizardError) -> Self {
        Self { stage, error }
    }

    /// Busy screens refuse user actions with `RequestInFlight`; anything else that
    /// does not fit the stage is an invalid transition.
    fn unexpected(stage: Stage, event: &Event) -> Self {
        let error = if stage.is_busy() && !event.is_completion() {
            WizardError::RequestInFlight
        } else {
            WizardError::InvalidTransition {
                screen: stage.kind(),
                event: event.name(),
            }
        };
        Self { stage, error }
    }
}

pub type Transition = Result<(Stage, Vec<Effect>), Rejected>;

// ────────────────────────────────────────────────────────────────────────────
// Transition function
// ────────────────────────────────────────────────────────────────────────────

pub fn transition(stage: Stage, event: Event) -> Transition {
    match (stage, event) {
        (_, Event::Restart) => Ok((Stage::Welcome, vec![])),

        (Stage::Welcome, Event::Start) => Ok((Stage::RoleSelection, vec![])),

        (Stage::RoleSelection, Event::SelectRole { role }) => match Role::parse(&role) {
            Ok(role) => {
                let effect = Effect::ListTopics {
                    role: role.to_string(),
                };
                let stage = Stage::TopicSelection {
                    role,
                    catalog: TopicCatalog::Loading,
                };
                Ok((stage, vec![effect]))
            }
            Err(error) => Err(Rejected::new(Stage::RoleSelection, error)),
        },

        (Stage::TopicSelection { role, catalog }, event) => topic_selection(role, catalog, event),

        (Stage::GuidedReview { briefing }, Event::StartInterview { question_count }) => {
            match QuestionCount::new(question_count) {
                Ok(question_count) => {
                    let effect = questions_effect(&briefing, question_count);
                    let stage = Stage::Interview {
                        briefing,
                        question_count,
                        progress: InterviewProgress::Loading,
                    };
                    Ok((stage, vec![effect]))
                }
                Err(error) => Err(Rejected::new(Stage::GuidedReview { briefing }, error)),
            }
        }

        (
            Stage::Interview {
                briefing,
                question_count,
                progress,
            },
            event,
        ) => interview(briefing, question_count, progress, event),

        (Stage::Results { assessment, save }, event) => results(assessment, save, event),

        (
            Stage::CareerSuggestions {
                assessment,
                careers,
            },
            event,
        ) => career_suggestions(assessment, careers, event),

        (stage, event) => Err(Rejected::unexpected(stage, &event)),
    }
}

fn topic_selection(role: Role, catalog: TopicCatalog, event: Event) -> Transition {
    match (catalog, event) {
        (TopicCatalog::Loading, Event::TopicsLoaded(Ok(topics))) if !topics.is_empty() => Ok((
            Stage::TopicSelection {
                role,
                catalog: TopicCatalog::Offered(topics),
            },
            vec![],
        )),
        (TopicCatalog::Loading, Event::TopicsLoaded(loaded)) => {
            let message = loaded
                .err()
                .unwrap_or_else(|| "no topics were generated for this role".to_string());
            Ok((
                Stage::TopicSelection {
                    role,
                    catalog: TopicCatalog::Failed(message),
                },
                vec![],
            ))
        }
        (TopicCatalog::Failed(_), Event::RetryTopics) => {
            let effect = Effect::ListTopics {
                role: role.to_string(),
            };
            Ok((
                Stage::TopicSelection {
                    role,
                    catalog: TopicCatalog::Loading,
                },
                vec![effect],
            ))
        }
        (TopicCatalog::Offered(offered), Event::ChooseTopics { titles }) => {
            match choose_topics(&offered, &titles) {
                Ok(chosen) => {
                    let effect = Effect::ExplainTopics {
                        role: role.to_string(),
                        titles: chosen.clone(),
                    };
                    let stage = Stage::TopicSelection {
                        role,
                        catalog: TopicCatalog::Explaining { offered, chosen },
                    };
                    Ok((stage, vec![effect]))
                }
                Err(error) => Err(Rejected::new(
                    Stage::TopicSelection {
                        role,
                        catalog: TopicCatalog::Offered(offered),
                    },
                    error,
                )),
            }
        }
        (TopicCatalog::Explaining { .. }, Event::SelectTopics { topics }) if !topics.is_empty() => {
            Ok((
                Stage::GuidedReview {
                    briefing: Briefing { role, topics },
                },
                vec![],
            ))
        }
        (catalog @ TopicCatalog::Explaining { .. }, Event::SelectTopics { .. }) => Err(Rejected::new(
            Stage::TopicSelection { role, catalog },
            WizardError::Validation("at least one topic is required".to_string()),
        )),
        (catalog, event) => Err(Rejected::unexpected(
            Stage::TopicSelection { role, catalog },
            &event,
        )),
    }
}

fn interview(
    briefing: Briefing,
    question_count: QuestionCount,
    progress: InterviewProgress,
    event: Event,
) -> Transition {
    let stay = |briefing, progress| Stage::Interview {
        briefing,
        question_count,
        progress,
    };

    match (progress, event) {
        (InterviewProgress::Loading, Event::QuestionsLoaded(loaded)) => {
            let progress = match loaded {
                Ok(questions) => match InterviewRun::new(questions) {
                    Some(run) => InterviewProgress::Answering(run),
                    None => InterviewProgress::Failed(
                        "no questions could be generated; please try again".to_string(),
                    ),
                },
                Err(message) => InterviewProgress::Failed(message),
            };
            Ok((stay(briefing, progress), vec![]))
        }
        (InterviewProgress::Failed(_), Event::RetryQuestions) => {
            let effect = questions_effect(&briefing, question_count);
            Ok((stay(briefing, InterviewProgress::Loading), vec![effect]))
        }
        (
            InterviewProgress::Answering(mut run),
            Event::RecordAnswer {
                question_index,
                option_index,
            },
        ) => match run.record_answer(question_index, option_index) {
            Ok(_) => Ok((stay(briefing, InterviewProgress::Answering(run)), vec![])),
            Err(error) => Err(Rejected::new(
                stay(briefing, InterviewProgress::Answering(run)),
                error,
            )),
        },
        (InterviewProgress::Answering(mut run), Event::Advance) => match run.advance() {
            Ok(Advance::Moved(_)) => Ok((stay(briefing, InterviewProgress::Answering(run)), vec![])),
            Ok(Advance::Finished) => {
                let effect = Effect::GenerateFeedback {
                    role: briefing.role.to_string(),
                    questions: run.questions().to_vec(),
                };
                Ok((stay(briefing, InterviewProgress::Scoring(run)), vec![effect]))
            }
            Err(error) => Err(Rejected::new(
                stay(briefing, InterviewProgress::Answering(run)),
                error,
            )),
        },
        (InterviewProgress::Scoring(_), Event::Complete { result }) => Ok((
            Stage::Results {
                assessment: Assessment {
                    briefing,
                    question_count,
                    result,
                },
                save: SaveStatus::Unsaved { last_error: None },
            },
            vec![],
        )),
        (progress, event) => Err(Rejected::unexpected(stay(briefing, progress), &event)),
    }
}

fn results(assessment: Assessment, save: SaveStatus, event: Event) -> Transition {
    match (save, event) {
        (SaveStatus::Unsaved { last_error }, Event::SaveProgress { name, email }) => {
            match validate_contact(&name, &email) {
                Ok(contact) => {
                    let record = ResultRecord::new(
                        &contact.name,
                        &contact.email,
                        assessment.briefing.role.as_str(),
                        &assessment.briefing.topics,
                        &assessment.result,
                        Utc::now(),
                    );
                    Ok((
                        Stage::Results {
                            assessment,
                            save: SaveStatus::Saving,
                        },
                        vec![Effect::SaveResult { record }],
                    ))
                }
                Err(error) => Err(Rejected::new(
                    Stage::Results {
                        assessment,
                        save: SaveStatus::Unsaved { last_error },
                    },
                    error,
                )),
            }
        }
        (SaveStatus::Saving, Event::SaveCompleted(outcome)) => {
            let save = if outcome.success {
                SaveStatus::Saved
            } else {
                SaveStatus::Unsaved {
                    last_error: Some(
                        outcome
                            .message
                            .unwrap_or_else(|| "unknown error while saving".to_string()),
                    ),
                }
            };
            Ok((Stage::Results { assessment, save }, vec![]))
        }
        (SaveStatus::Saved, Event::Proceed) => Ok((
            Stage::CareerSuggestions {
                assessment,
                careers: CareerPanel::Offered,
            },
            vec![],
        )),
        (save @ SaveStatus::Saved, Event::SaveProgress { .. }) => Err(Rejected::new(
            Stage::Results { assessment, save },
            WizardError::AlreadySaved,
        )),
        (save @ SaveStatus::Unsaved { .. }, Event::Proceed) => Err(Rejected::new(
            Stage::Results { assessment, save },
            WizardError::SaveRequired,
        )),
        (save, event) => Err(Rejected::unexpected(
            Stage::Results { assessment, save },
            &event,
        )),
    }
}

fn career_suggestions(assessment: Assessment, careers: CareerPanel, event: Event) -> Transition {
    match (careers, event) {
        (CareerPanel::Offered | CareerPanel::Unavailable(_), Event::ShowCareers) => {
            let effect = Effect::SuggestCareers {
                role: assessment.briefing.role.to_string(),
            };
            Ok((
                Stage::CareerSuggestions {
                    assessment,
                    careers: CareerPanel::Loading,
                },
                vec![effect],
            ))
        }
        (CareerPanel::Loading, Event::CareersLoaded(loaded)) => {
            let careers = match loaded {
                Ok(suggestions) => CareerPanel::Shown(suggestions),
                Err(message) => CareerPanel::Unavailable(message),
            };
            Ok((
                Stage::CareerSuggestions {
                    assessment,
                    careers,
                },
                vec![],
            ))
        }
        (careers, event) => Err(Rejected::unexpected(
            Stage::CareerSuggestions {
                assessment,
                careers,
            },
            &event,
        )),
    }
}

fn questions_effect(briefing: &Briefing, question_count: QuestionCount) -> Effect {
    Effect::GenerateQuestions {
        role: briefing.role.to_string(),
        topics: briefing.topic_titles(),
        count: question_count.get(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wizard
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The completion belonged to a session that has since been restarted.
    Stale,
}

/// Owner of the one live session.
#[derive(Debug, Default)]
pub struct Wizard {
    generation: u64,
    stage: Stage,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.stage.snapshot()
    }

    /// Applies a user action. On success returns the requests to perform, stamped
    /// with the current generation; on failure the session is unchanged.
    pub fn handle(&mut self, event: Event) -> Result<Vec<Command>, WizardError> {
        let restart = matches!(event, Event::Restart);
        let name = event.name();
        let from = self.stage.kind();

        match transition(std::mem::take(&mut self.stage), event) {
            Ok((stage, effects)) => {
                if restart {
                    self.generation += 1;
                    info!("Wizard restarted; session generation {}", self.generation);
                } else if stage.kind() != from {
                    info!(
                        "Wizard moved {} -> {} on '{}' (generation {})",
                        from,
                        stage.kind(),
                        name,
                        self.generation
                    );
                }
                self.stage = stage;
                Ok(effects
                    .into_iter()
                    .map(|effect| Command {
                        generation: self.generation,
                        effect,
                    })
                    .collect())
            }
            Err(Rejected { stage, error }) => {
                self.stage = stage;
                debug!("Rejected '{name}' on {from}: {error}");
                Err(error)
            }
        }
    }

    /// Applies a collaborator completion issued under `generation`. Completions
    /// from an older session are dropped without touching the current one.
    pub fn resolve(&mut self, generation: u64, event: Event) -> Result<Resolution, WizardError> {
        if generation != self.generation {
            debug!(
                "Discarding stale '{}' from generation {} (current {})",
                event.name(),
                generation,
                self.generation
            );
            return Ok(Resolution::Stale);
        }
        let commands = self.handle(event)?;
        debug_assert!(commands.is_empty(), "completions never issue effects");
        Ok(Resolution::Applied)
    }
}
